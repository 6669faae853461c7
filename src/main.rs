use clap::Parser;
use lablens_lib::{cli, config};

fn main() -> std::process::ExitCode {
    let args = cli::Cli::parse();
    config::init_tracing(args.verbose);
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    match cli::run(args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "lablens failed");
            eprintln!("error: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}
