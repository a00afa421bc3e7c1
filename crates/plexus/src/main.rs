mod cli;
mod diagnostics;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};

use plexus_core::kernel::bootstrap::Application;
use plexus_core::kernel::constants;
use plexus_core::plugin_system::loader::StaticPluginLoader;
use plexus_core::plugin_system::unit::DepsBag;

use cli::{CliArgs, Commands};
use diagnostics::DiagnosticsPlugin;

/// Builds the loader with every compiled-in plugin registered.
fn static_loader() -> Arc<StaticPluginLoader> {
    let mut loader = StaticPluginLoader::new();
    loader.register("diagnostics", || Arc::new(DiagnosticsPlugin));
    Arc::new(loader)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    println!("Initializing application...");
    let mut app = match Application::new(static_loader()) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to initialize application: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.plugin_dirs.is_empty() {
        app.add_search_path(constants::DEFAULT_PLUGINS_DIR);
    } else {
        for dir in &args.plugin_dirs {
            app.add_search_path(dir);
        }
    }
    for id in &args.disabled {
        app.config_mut().disable(id);
    }

    match args.command {
        Some(Commands::List {}) => {
            let discovered = app.discover().await;
            println!("Discovered plugins:");
            if discovered.definitions.is_empty() {
                println!("  No plugins found.");
            }
            for definition in &discovered.definitions {
                let status = if args.disabled.iter().any(|id| id == definition.id()) {
                    "Disabled"
                } else {
                    "Enabled"
                };
                println!(
                    "  - Id: {}, Version: {}, Status: {}",
                    definition.id(),
                    definition.manifest.version,
                    status
                );
            }
            for err in &discovered.errors {
                eprintln!("  ! {}", err);
            }
            ExitCode::SUCCESS
        }
        None => {
            let deps: DepsBag = Arc::new(());

            let setup = match app.initialize(deps.clone()).await {
                Ok(setup) => setup,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            info!("Set up {} plugin(s)", setup.enabled_ids.len());

            if let Err(e) = app.start(deps).await {
                error!("Failed to start plugins: {}", e);
                app.shutdown().await;
                return ExitCode::FAILURE;
            }
            info!("All plugins started");

            println!("Shutting down application...");
            app.shutdown().await;
            ExitCode::SUCCESS
        }
    }
}
