mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build {
            source,
            output,
            report,
            deny_warnings,
        } => {
            commands::build::build(
                &config,
                source.as_deref(),
                output.as_deref(),
                report.as_deref(),
                deny_warnings,
            )?;
        }

        Commands::Check { source, output } => {
            commands::build::check(&config, source.as_deref(), output.as_deref())?;
        }

        Commands::Tidy { source, write } => {
            commands::tidy::handle(&config, source.as_deref(), write)?;
        }

        Commands::Allocate {
            placement,
            subtype,
            category,
            item,
            variant,
            table,
        } => {
            let id = commands::allocate::handle(
                &config, &placement, &subtype, &category, &item, &variant, table,
            )?;
            println!("{}", id);
        }

        Commands::AddPlant {
            draft,
            source,
            dry_run,
        } => {
            commands::author::add_plant(&config, &draft, source.as_deref(), dry_run)?;
        }

        Commands::AddDecoration {
            draft,
            source,
            dry_run,
        } => {
            commands::author::add_decoration(&config, &draft, source.as_deref(), dry_run)?;
        }

        Commands::Configure {
            source_dir,
            output,
            show,
        } => {
            commands::configure::handle(source_dir, output, show)?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for command output
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
