//! Stage runner
//!
//! Runs the quality, blacklist and MQ filters in order. Each stage checks its
//! own completion marker and hands its effective output to the next stage.

use std::path::{Path, PathBuf};

use log::info;

use crate::config::FilterSettings;
use crate::error::Result;
use crate::output::{ensure_output_dir, promote, recoded, remove_temp_files, OutputLayout};
use crate::progress::{print_header, print_info, print_success, RunSummary};
use crate::stage::{Stage, StageReport, StageState};
use crate::tools::{exclude_positions, mq_filter, quality_filter, ToolRunner};

/// Runs the filter stages for one sample
pub struct Pipeline<R: ToolRunner> {
    settings: FilterSettings,
    layout: OutputLayout,
    runner: R,
    quiet: bool,
}

impl<R: ToolRunner> Pipeline<R> {
    pub fn new(settings: FilterSettings, runner: R) -> Self {
        let layout = OutputLayout::new(&settings.out_dir, &settings.sample_name);
        Self {
            settings,
            layout,
            runner,
            quiet: false,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run all stages in sequence, stopping at the first failure
    pub fn run(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::new(&self.settings.sample_name);

        if self.runner.executes() {
            ensure_output_dir(self.layout.out_dir())?;
        }

        let quality_vcf = self.layout.quality_vcf();
        summary.add(self.quality_stage(&quality_vcf)?);

        let blacklist = self.blacklist_stage(&quality_vcf)?;
        // Without blacklists the quality output goes straight to the MQ filter
        let mq_input = blacklist.output.clone().unwrap_or(quality_vcf);
        summary.add(blacklist);

        summary.add(self.mq_stage(&mq_input)?);

        Ok(summary)
    }

    fn quality_stage(&mut self, output: &Path) -> Result<StageReport> {
        let sample = self.settings.sample_name.clone();
        let mut state = StageState::check(output, self.settings.overwrite);

        if state.is_pending() {
            self.header("Filtering on quality...");
            let invocation = quality_filter(&self.settings, &self.layout);
            self.runner.run(&invocation)?;
            state = StageState::Executed;
            info!("Quality filter finished for {}", sample);
            self.success(&format!(
                "Filtered the somatic vcf for sample: {} on quality",
                sample
            ));
        } else {
            self.info(&format!(
                "Quality filtering on the somatic vcf for sample: {} already performed",
                sample
            ));
        }

        Ok(StageReport::new(Stage::Quality, state, Some(output.to_path_buf())))
    }

    fn blacklist_stage(&mut self, input: &Path) -> Result<StageReport> {
        let sample = self.settings.sample_name.clone();

        if self.settings.blacklists.is_empty() {
            self.info(&format!("No blacklist was given for sample: {}", sample));
            return Ok(StageReport::new(Stage::Blacklist, StageState::NotConfigured, None));
        }

        let output = self.layout.blacklist_vcf();
        let state = StageState::check(&output, self.settings.overwrite);
        if !state.is_pending() {
            self.info(&format!(
                "Sample: {} was already filtered on blacklists",
                sample
            ));
            return Ok(StageReport::new(Stage::Blacklist, state, Some(output)));
        }

        self.header(&format!(
            "Filtering on {} blacklist(s)...",
            self.settings.blacklists.len()
        ));

        let result = self.exclude_all(input, &output);
        if self.runner.executes() {
            let removed = remove_temp_files(self.layout.out_dir())?;
            info!("Removed {} temporary files", removed.len());
        }
        result?;

        self.success(&format!(
            "Filtered the somatic vcf on the blacklists for sample: {}",
            sample
        ));
        Ok(StageReport::new(Stage::Blacklist, StageState::Executed, Some(output)))
    }

    /// Chain the input through one temp file per blacklist, then promote the last
    fn exclude_all(&mut self, input: &Path, output: &Path) -> Result<()> {
        let mut current: PathBuf = input.to_path_buf();

        for (i, blacklist) in self.settings.blacklists.iter().enumerate() {
            let prefix = self.layout.temp_prefix(i + 1);
            let invocation =
                exclude_positions(&self.settings.vcftools, &current, blacklist, &prefix);
            self.runner.run(&invocation)?;
            current = recoded(&prefix);
        }

        if self.runner.executes() {
            promote(&current, output)?;
        }
        Ok(())
    }

    fn mq_stage(&mut self, input: &Path) -> Result<StageReport> {
        let sample = self.settings.sample_name.clone();

        let (mq, snpsift) = match (&self.settings.mq, &self.settings.snpsift) {
            (Some(mq), Some(snpsift)) => (mq.clone(), snpsift.clone()),
            _ => {
                self.info(&format!("No MQ filter was requested for sample: {}", sample));
                return Ok(StageReport::new(Stage::MappingQuality, StageState::NotConfigured, None));
            }
        };

        let output = self.layout.mq_vcf();
        let mut state = StageState::check(&output, self.settings.overwrite);

        if state.is_pending() {
            self.header(&format!("Filtering on MQ >= {}...", mq));
            let invocation = mq_filter(&self.settings, &snpsift, &mq, input, &output);
            self.runner.run(&invocation)?;
            state = StageState::Executed;
            self.success(&format!(
                "Filtered the somatic vcf on MQ for sample: {}",
                sample
            ));
        } else {
            self.info(&format!(
                "MQ filtering on the somatic vcf for sample: {} already performed",
                sample
            ));
        }

        Ok(StageReport::new(Stage::MappingQuality, state, Some(output)))
    }

    fn header(&self, text: &str) {
        if !self.quiet {
            print_header(text);
        }
    }

    fn info(&self, text: &str) {
        info!("{}", text);
        if !self.quiet {
            print_info(text);
        }
    }

    fn success(&self, text: &str) {
        if !self.quiet {
            print_success(text);
        }
    }
}
