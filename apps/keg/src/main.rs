//! keg - formula-driven installer for standalone Python CLI tools
//!
//! The CLI loads a formula descriptor, then drives the install pipeline
//! (fetch, verify, delegate to pip, write the launcher) and the
//! post-install smoke test, rendering progress events as they arrive.

mod cli;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use keg_config::{ColorChoice, Config};
use keg_formula::FormulaStore;
use keg_install::{InstallOptions, Installer, Layout};
use keg_net::{NetClient, NetConfig};
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("starting keg v{}", env!("CARGO_PKG_VERSION"));

    // Configuration precedence: file, then environment, then CLI flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    if let Some(prefix) = &cli.global.prefix {
        config.paths.prefix = Some(prefix.clone());
    }
    if let Some(color) = cli.global.color {
        config.general.color = color;
    }

    let colors = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
    };
    let handler = EventHandler::new(colors);

    let (event_sender, mut event_receiver) = keg_events::channel();
    let store = FormulaStore::new(config.formulae_dir());
    let net = NetClient::new(NetConfig::from_config(&config.network))?;
    let installer =
        Installer::new(Layout::new(config.prefix()), net).with_events(event_sender.clone());
    drop(event_sender);

    // Execute the command while draining events concurrently
    let op = execute_command(cli.command, &store, &installer);
    tokio::pin!(op);

    let result = loop {
        tokio::select! {
            result = &mut op => break result,
            Some(event) = event_receiver.recv() => handler.handle(&event),
        }
    };

    // Render anything still queued
    while let Ok(event) = event_receiver.try_recv() {
        handler.handle(&event);
    }

    result
}

/// Dispatch a parsed command
async fn execute_command(
    command: Commands,
    store: &FormulaStore,
    installer: &Installer,
) -> Result<(), CliError> {
    match command {
        Commands::Install {
            formula,
            head,
            force,
            no_test,
        } => {
            let formula = store.load(&formula).await?;
            let report = installer
                .install(&formula, &InstallOptions { head, force })
                .await?;
            info!(formula = %report.formula, libexec = %report.libexec.display(), "install complete");

            if !no_test {
                installer.smoke_test(&formula).await?;
            }
            Ok(())
        }

        Commands::Test { formula } => {
            let formula = store.load(&formula).await?;
            installer.smoke_test(&formula).await?;
            Ok(())
        }

        Commands::Info { formula } => {
            let formula = store.load(&formula).await?;
            let installed = installer.is_installed(&formula);

            println!("{}: {}", formula.name(), formula.formula.desc);
            println!("homepage: {}", formula.formula.homepage);
            println!("license: {}", formula.formula.license);
            println!("source: {}", formula.source.url);
            println!("sha256: {}", formula.source.sha256);
            if let Some(head) = &formula.head {
                println!("head: {} (branch {})", head.url, head.branch);
            }
            if !formula.install.dependencies.is_empty() {
                println!("dependencies: {}", formula.install.dependencies.join(", "));
            }
            println!(
                "command: {} -> {}",
                formula.install.command,
                installer
                    .layout()
                    .libexec(formula.name())
                    .join("bin")
                    .join(&formula.install.entry_point)
                    .display()
            );
            println!("installed: {}", if installed { "yes" } else { "no" });
            Ok(())
        }

        Commands::List => {
            for name in installer.list_installed().await? {
                println!("{name}");
            }
            Ok(())
        }

        Commands::Uninstall { formula } => {
            let formula = store.load(&formula).await?;
            installer.uninstall(&formula).await?;
            Ok(())
        }
    }
}
