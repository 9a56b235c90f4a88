use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use userboard::cli::{Cli, Commands};
use userboard::commands;
use userboard::config::Config;
use userboard::dispatch::Dispatcher;
use userboard::error::Result;
use userboard::notify::{ClearPolicy, Notifier, TerminalSink};
use userboard::output::Renderer;
use userboard::transport::Transport;

const LOG_ENV: &str = "USERBOARD_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_tracing(verbose);

    if let Err(e) = run(cli).await {
        // Reported errors were already shown on the status line.
        if !e.is_reported() {
            eprintln!("Error: {e}");
        }

        if verbose {
            let mut source = e.unreported().source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "userboard=debug" } else { "warn" })
    });

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = cli.output_format();

    match cli.command {
        // Commands that don't require config/dispatcher
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "userboard", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run().await?;
        }
        command => {
            let config = Config::load()?.with_overrides(cli.base_url, cli.timeout_ms);
            let base_url = config.base_url();
            debug!(%base_url, timeout = ?config.timeout(), "configured");

            let notifier = Notifier::new(
                ClearPolicy::from_config(&config),
                Box::new(TerminalSink::new(cli.quiet)),
            );
            let dispatcher =
                Dispatcher::new(Transport::standard(config.timeout()), base_url, notifier);
            let renderer = Renderer::new(format);

            match command {
                Commands::Users(args) => {
                    commands::load::users(&dispatcher, &renderer, args).await?;
                }
                Commands::User { id } => {
                    commands::load::user(&dispatcher, &renderer, id).await?;
                }
                Commands::Get { endpoint } => {
                    commands::load::show(&dispatcher, &renderer, &endpoint).await?;
                }
                Commands::Health => {
                    commands::health::run(&dispatcher, format).await?;
                }
                Commands::Export(args) => {
                    commands::export::run(&dispatcher, args).await?;
                }
                Commands::Completions { .. } | Commands::Init => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
