use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devtools_release_notifier::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            output,
            no_notify,
            markdown_dir,
        } => {
            let summary = commands::check(
                &cli.config,
                output.as_deref(),
                no_notify,
                markdown_dir.as_deref(),
            )
            .await?;
            let code = summary.exit_code();
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Send {
            releases,
            translated,
            markdown_dir,
        } => {
            let summary =
                commands::send(&releases, &translated, markdown_dir.as_deref()).await?;
            let code = summary.exit_code();
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Validate => {
            commands::validate(&cli.config)?;
        }
        Commands::Init => {
            commands::init(&cli.config)?;
        }
    }

    Ok(())
}
