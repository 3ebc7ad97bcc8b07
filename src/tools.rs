//! External tool invocations
//!
//! Builds argument lists for vcftools and SnpSift and runs them. Commands are
//! never passed through a shell: each argument is handed to the process as is.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::debug;

use crate::config::FilterSettings;
use crate::error::{FilterError, Result};
use crate::output::{recoded, OutputLayout};
use crate::progress::{create_spinner, print_bullet};

/// A fully specified external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<OsString>,
    /// File that receives the command's standard output
    pub stdout: Option<PathBuf>,
    /// File the command must have produced for the run to count as a success
    pub expected_output: Option<PathBuf>,
}

impl ToolInvocation {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            stdout: None,
            expected_output: None,
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    pub fn stdout_to(mut self, path: &Path) -> Self {
        self.stdout = Some(path.to_path_buf());
        self
    }

    pub fn expect_output(mut self, path: &Path) -> Self {
        self.expected_output = Some(path.to_path_buf());
        self
    }

    /// Arguments as strings, for display and inspection
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// True if `window` appears as consecutive arguments
    pub fn has_args(&self, window: &[&str]) -> bool {
        let args = self.args_lossy();
        args.windows(window.len())
            .any(|w| w.iter().zip(window).all(|(a, b)| a == b))
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in self.args_lossy() {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        if let Some(ref out) = self.stdout {
            write!(f, " > {}", out.display())?;
        }
        Ok(())
    }
}

/// vcftools call applying the quality, allele and chromosome filters
pub fn quality_filter(settings: &FilterSettings, layout: &OutputLayout) -> ToolInvocation {
    let input_flag = if settings.input_is_gzipped() {
        "--gzvcf"
    } else {
        "--vcf"
    };

    let mut inv = ToolInvocation::new(&settings.vcftools)
        .arg(input_flag)
        .arg(&settings.input)
        .arg("--remove-filtered-all");

    for chrom in &settings.chroms {
        inv = inv.arg("--chr").arg(chrom);
    }
    if settings.only_snv {
        inv = inv.arg("--remove-indels");
    }
    if settings.only_indel {
        inv = inv.arg("--keep-only-indels");
    }
    if let Some(ref qual) = settings.qual {
        inv = inv.arg("--minQ").arg(qual);
    }
    if let Some(ref max_alleles) = settings.max_alleles {
        inv = inv.arg("--max-alleles").arg(max_alleles);
    }

    let prefix = layout.quality_prefix();
    inv.args(["--recode", "--recode-INFO-all", "--out"])
        .arg(&prefix)
        .expect_output(&recoded(&prefix))
}

/// vcftools call removing the positions listed in one blacklist
pub fn exclude_positions(
    vcftools: &str,
    input: &Path,
    blacklist: &Path,
    prefix: &Path,
) -> ToolInvocation {
    ToolInvocation::new(vcftools)
        .arg("--vcf")
        .arg(input)
        .arg("--exclude-positions")
        .arg(blacklist)
        .args(["--recode", "--recode-INFO-all", "--out"])
        .arg(prefix)
        .expect_output(&recoded(prefix))
}

/// SnpSift expression keeping records with MQ at or above the threshold
pub fn mq_expression(mq: &str) -> String {
    format!("(MQ >= {})", mq)
}

/// SnpSift call keeping records with sufficient mapping quality
pub fn mq_filter(
    settings: &FilterSettings,
    snpsift: &Path,
    mq: &str,
    input: &Path,
    output: &Path,
) -> ToolInvocation {
    ToolInvocation::new(&settings.java)
        .arg(format!("-Xmx{}", settings.java_heap))
        .arg("-jar")
        .arg(snpsift)
        .arg("filter")
        .arg(mq_expression(mq))
        .arg(input)
        .stdout_to(output)
        .expect_output(output)
}

/// Something that can carry out a [`ToolInvocation`]
pub trait ToolRunner {
    fn run(&mut self, invocation: &ToolInvocation) -> Result<()>;

    /// False if the runner only reports commands, so the pipeline must not
    /// touch the files they would have produced
    fn executes(&self) -> bool {
        true
    }
}

/// Runs tools as child processes and checks their exit status
#[derive(Debug, Default)]
pub struct ProcessRunner {
    quiet: bool,
}

impl ProcessRunner {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&mut self, invocation: &ToolInvocation) -> Result<()> {
        let command = invocation.to_string();
        debug!("Running: {}", command);

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);

        if let Some(ref out) = invocation.stdout {
            let file = File::create(out)
                .map_err(|e| FilterError::io(format!("Could not create {:?}", out), e))?;
            cmd.stdout(Stdio::from(file));
        }

        let spinner = if self.quiet {
            indicatif::ProgressBar::hidden()
        } else {
            create_spinner(&format!("Running {}...", invocation.program))
        };
        let status = cmd.status();
        spinner.finish_and_clear();

        let result = match status {
            Err(source) => Err(FilterError::Spawn {
                program: invocation.program.clone(),
                source,
            }),
            Ok(status) if !status.success() => Err(FilterError::ToolFailed {
                command: command.clone(),
                status,
            }),
            Ok(_) => match invocation.expected_output {
                Some(ref path) if !path.exists() => Err(FilterError::MissingOutput {
                    command: command.clone(),
                    path: path.clone(),
                }),
                _ => Ok(()),
            },
        };

        // A partial redirect target must not look like a finished stage
        if result.is_err() {
            if let Some(ref out) = invocation.stdout {
                let _ = fs::remove_file(out);
            }
        }

        result
    }
}

/// Prints commands instead of running them
#[derive(Debug, Default)]
pub struct DryRunner {
    commands: Vec<String>,
}

impl DryRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

impl ToolRunner for DryRunner {
    fn run(&mut self, invocation: &ToolInvocation) -> Result<()> {
        let command = invocation.to_string();
        print_bullet(&command);
        self.commands.push(command);
        Ok(())
    }

    fn executes(&self) -> bool {
        false
    }
}
