//! efm-rules CLI entry point

use clap::Parser;
use efm_rules::cli::check_dei::CheckDeiArgs;
use efm_rules::cli::{Command, OutputOptions, args::Cli};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let options = OutputOptions {
        format: cli.format,
        color: cli.color,
    };

    let exit_code = match &cli.command {
        Command::Classify { namespaces } => {
            efm_rules::cli::classify::run_classify(namespaces, config, options)
        }
        Command::BuildSignwarnings => {
            efm_rules::cli::build::run_build_signwarnings(config, options)
        }
        Command::BuildDeprecations => {
            efm_rules::cli::build::run_build_deprecations(config, options)
        }
        Command::CheckDei {
            filing,
            inline,
            form,
        } => efm_rules::cli::check_dei::run_check_dei(
            CheckDeiArgs {
                filing,
                inline: *inline,
                form: form.as_deref(),
            },
            config,
            options,
        ),
        Command::NonNegative { filing } => {
            efm_rules::cli::non_negative::run_non_negative(filing, config, options)
        }
        Command::CustomAxis { names } => {
            efm_rules::cli::custom_axis::run_custom_axis(names, config, options)
        }
    };

    process::exit(exit_code);
}
