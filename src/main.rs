use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use slog::Logger;

use turbo::config::{self, PACKAGE_VERSION};
use turbo::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "turbo", version, about = "Bootstrap of the turbo chat bot")]
struct Cli {
    /// INI configuration file
    #[arg(short, long, default_value = "config/config.ini")]
    config: PathBuf,

    /// Log file, truncated on every start
    #[arg(short, long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Write log records from a background thread
    #[arg(long)]
    async_log: bool,

    /// Write a configuration template to the --config path and exit
    #[arg(long)]
    init: bool,
}

fn introduce_self(logger: &Logger) {
    info!(logger, "Starting turbo";
        "version" => PACKAGE_VERSION,
    );
}

fn create_template(cli: &Cli) -> ExitCode {
    match config::write_template(&cli.config) {
        Ok(()) => {
            println!("Wrote configuration template to {}", cli.config.display());
            ExitCode::SUCCESS
        }
        Err(why) => {
            eprintln!(
                "Could not write configuration template to {}: {}",
                cli.config.display(),
                why
            );
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.init {
        return create_template(&cli);
    }

    let context = LoggingContext::new()
        .log_file(&cli.log_file)
        .asynchronous(cli.async_log)
        .build();
    let context = match context {
        Ok(context) => context,
        Err(why) => {
            eprintln!("Could not create {}: {}", cli.log_file.display(), why);
            return ExitCode::FAILURE;
        }
    };
    let logger = context.logger().clone();
    introduce_self(&logger);

    // The loader already reported the failure on the critical level
    let Ok(config) = Config::load(&cli.config, &logger) else {
        return ExitCode::FAILURE;
    };

    info!(logger, "Configuration ready";
        "prefix" => config.prefix.as_str(),
        "selfbot" => config.selfbot,
        "database" => !config.no_database,
    );
    debug!(logger, "Settings"; "config" => ?config);

    ExitCode::SUCCESS
}
