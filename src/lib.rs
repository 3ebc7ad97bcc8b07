//! # Somatic Filter
//!
//! Post-processing of somatic VCF files produced by the hmf-pipeline or the IAP.
//!
//! ## Stages
//!
//! - **Quality**: vcftools filter on QUAL, allele count, chromosomes and
//!   variant type, dropping records that already failed a filter
//! - **Blacklist**: vcftools exclusion of the positions in one or more
//!   blacklist files
//! - **MQ**: SnpSift filter on mapping quality
//!
//! A stage whose output file already exists is skipped unless overwrite is
//! requested, so an interrupted run can simply be started again.
//!
//! ## Usage
//!
//! ```bash
//! somatic-filter -i filter.ini
//!
//! # Show the commands without running them
//! somatic-filter -i filter.ini --dry-run
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use somatic_filter::config::FilterSettings;
//! use somatic_filter::pipeline::Pipeline;
//! use somatic_filter::tools::ProcessRunner;
//! use std::path::Path;
//!
//! let settings = FilterSettings::load(Path::new("filter.ini")).unwrap();
//! let mut pipeline = Pipeline::new(settings, ProcessRunner::new(false));
//! let summary = pipeline.run().unwrap();
//! summary.print_summary();
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod flags;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stage;
pub mod tools;

pub use cli::Args;
pub use config::FilterSettings;
pub use error::FilterError;
pub use pipeline::Pipeline;
