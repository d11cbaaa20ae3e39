//! Construction material tracker CLI.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cmm_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use cmm_cli::commands::{run_check, run_detect, run_elements, run_record, run_summary};
use cmm_cli::logging::{LogConfig, LogFormat, init_logging};
use cmm_cli::summary::print_summary;
use cmm_normalization::AssemblyError;
use cmm_report::render_confirmation;
use cmm_services::{MemoryStore, ServiceConfig, ServiceError, SupabaseStore};
use tracing::level_filters::LevelFilter;

/// Exit code for a record rejected by normalization.
const EXIT_REJECTED: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("error: failed to start async runtime: {error}");
            std::process::exit(1);
        }
    };

    let exit_code = match runtime.block_on(run(&cli)) {
        Ok(()) => 0,
        Err(error) => report_error(&error),
    };
    std::process::exit(exit_code);
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Record(args) => {
            let config = load_config(cli)?;
            let record = if args.dry_run {
                run_record(args, &config, &MemoryStore::new()).await?
            } else {
                let store = SupabaseStore::new(&config.store, config.request_timeout())?;
                run_record(args, &config, &store).await?
            };
            println!("{}", render_confirmation(&record));
            if args.dry_run {
                println!("(dry run: record not stored)");
            }
        }
        Command::Detect(args) => {
            let config = load_config(cli)?;
            let outcome = run_detect(args, &config).await?;
            println!("Sections detected: {}", outcome.count);
            println!("Annotated image: {}", outcome.output.display());
        }
        Command::Summary => {
            let config = load_config(cli)?;
            let store = SupabaseStore::new(&config.store, config.request_timeout())?;
            let summary = run_summary(&store).await?;
            print_summary(&summary);
        }
        Command::Check(args) => {
            println!("{}", run_check(args.field.into(), &args.value)?);
        }
        Command::Elements => run_elements(),
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ServiceConfig> {
    ServiceConfig::load(cli.config.as_deref()).context("load service configuration")
}

/// Print the error and pick the exit code.
fn report_error(error: &anyhow::Error) -> i32 {
    if let Some(rejected) = error.downcast_ref::<AssemblyError>() {
        eprintln!("error: the record was not stored; please correct these values:");
        for rejection in &rejected.rejections {
            eprintln!("- {rejection}");
        }
        return EXIT_REJECTED;
    }
    if let Some(rejection) = error.downcast_ref::<cmm_normalization::FieldRejection>() {
        eprintln!("error: {rejection}");
        return EXIT_REJECTED;
    }
    if let Some(service) = error.downcast_ref::<ServiceError>() {
        eprintln!("error: {}", service.user_message());
        tracing::error!("{error:#}");
        return 1;
    }
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
