//! Command-line interface definition for somatic-filter

use clap::Parser;
use std::path::PathBuf;

/// Filter a somatic VCF on quality, blacklists and mapping quality
///
/// All filter settings come from an ini file with one `key<TAB>value` pair per
/// line. vcftools must be on the PATH (or set with the `vcftools` key); MQ
/// filtering additionally needs java and the SnpSift jar (`snpsift` key).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "somatic-filter",
    version,
    about = "Filter a somatic VCF on quality, allele count, blacklists and MQ",
    long_about = r#"
Filter a somatic VCF created by the hmf-pipeline (or the IAP) in three stages:

    1. quality / allele count / chromosome filter   (vcftools)
    2. exclusion of blacklisted positions           (vcftools)
    3. mapping quality filter                       (SnpSift)

Stages whose output already exists are skipped unless OVERWRITE is set in the
ini file or --overwrite is given.

INI FILE KEYS:
    FILE          Input VCF (.vcf or .vcf.gz)                       required
    OUT_DIR       Output directory (created if missing)             required
    OVERWRITE     Re-run stages whose output exists                 required
    only_snv      Remove indels                                     required
    only_indel    Keep only indels                                  required
    chroms        Comma separated chromosomes to keep (may be empty) required
    sample_name   Prefix for output files                           required
    qual          Minimum QUAL (false/0 to disable)                 required
    max_alleles   Maximum number of alleles (false/0 to disable)
    blacklists    Comma separated files of positions to exclude
    MQ            Minimum MQ (false/0 to disable)
    snpsift       Path to SnpSift.jar (needed for MQ)
    vcftools      vcftools executable (default: vcftools)
    java          java executable (default: java)
    java_heap     JVM heap size for SnpSift (default: 4G)
"#
)]
pub struct Args {
    /// The ini file containing the settings of the script
    #[arg(short, long, required = true, value_name = "INI")]
    pub ini: PathBuf,

    /// Re-run every stage even if its output exists
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Show the commands that would be run without running them
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Warn
        } else {
            log::LevelFilter::Info
        }
    }
}
