use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use donut_utils::cli::Args;
use donut_utils::config::Environment;
use donut_utils::installer::Installer;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr; stdout is the conversation with the user
    let filter = if args.verbose {
        EnvFilter::new("donut_utils=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if args.verbose {
        tracing::info!("Running donut-utils with verbose output");
    }

    let installer = match Installer::new(args.settings(), Environment::detect()) {
        Ok(installer) => installer,
        Err(e) => {
            println!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    match installer.run(stdin.lock(), &mut stdout).await {
        Ok(summary) => {
            tracing::info!(
                "{} available, {} installed",
                summary.available.len(),
                summary.installed.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            println!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
