//! Somatic Filter - quality, blacklist and MQ filtering of somatic VCFs
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;

use somatic_filter::cli::Args;
use somatic_filter::config::FilterSettings;
use somatic_filter::pipeline::Pipeline;
use somatic_filter::progress::{
    print_banner, print_bullet, print_error, print_header, print_info, print_warning,
};
use somatic_filter::tools::{DryRunner, ProcessRunner};

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging, RUST_LOG still wins if set
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    // Run the application
    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if !args.quiet {
        print_banner();
    }

    let settings = FilterSettings::load(&args.ini)?.with_overwrite(args.overwrite);

    if args.verbose && !args.quiet {
        print_config(&args, &settings);
    }

    if args.dry_run {
        print_warning("DRY RUN - no tools will be run and no files written");
        let mut pipeline = Pipeline::new(settings, DryRunner::new()).quiet(args.quiet);
        pipeline.run()?;
        return Ok(());
    }

    let mut pipeline = Pipeline::new(settings, ProcessRunner::new(args.quiet)).quiet(args.quiet);
    let summary = pipeline.run()?;

    if !args.quiet {
        if summary.executed() == 0 {
            print_info("Nothing to do, all configured stages were already performed");
        }
        summary.print_summary();
    }

    Ok(())
}

/// Print configuration summary
fn print_config(args: &Args, settings: &FilterSettings) {
    print_header("Configuration");

    print_bullet(&format!("Ini file:     {:?}", args.ini));
    print_bullet(&format!("Input:        {:?}", settings.input));
    print_bullet(&format!("Output dir:   {:?}", settings.out_dir));
    print_bullet(&format!("Sample:       {}", settings.sample_name));
    print_bullet(&format!("Overwrite:    {}", settings.overwrite));
    print_bullet(&format!("Chromosomes:  {:?}", settings.chroms));
    print_bullet(&format!("Only SNVs:    {}", settings.only_snv));
    print_bullet(&format!("Only indels:  {}", settings.only_indel));
    print_bullet(&format!("Min QUAL:     {}", settings.qual.as_deref().unwrap_or("off")));
    print_bullet(&format!("Max alleles:  {}", settings.max_alleles.as_deref().unwrap_or("off")));
    print_bullet(&format!("Blacklists:   {:?}", settings.blacklists));
    print_bullet(&format!("Min MQ:       {}", settings.mq.as_deref().unwrap_or("off")));
}
