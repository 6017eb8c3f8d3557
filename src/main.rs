//! haproxy-control: control plane of an HAProxy sidecar.
//!
//! # Architecture Overview
//!
//! ```text
//!   admin API / CLI
//!        │ add/remove service, add cert
//!        ▼
//!   ┌──────────────┐  snapshot   ┌──────────────┐  haproxy.cfg  ┌──────────────┐
//!   │   registry   │────────────▶│   compiler   │──────────────▶│    reload    │
//!   │ services,    │             │ template +   │               │ haproxy -sf  │
//!   │ cert names   │             │ rules +      │               │ <old pid>    │
//!   └──────────────┘             │ fragments    │               └──────────────┘
//!                                └──────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use haproxy_control::admin::{setup_admin_router, AdminState};
use haproxy_control::config::loader::load_config;
use haproxy_control::lifecycle::{signals, Shutdown};
use haproxy_control::observability::{logging, metrics};
use haproxy_control::reload::SystemRunner;
use haproxy_control::ControlPlane;

#[derive(Parser)]
#[command(name = "haproxy-control")]
#[command(about = "Compile HAProxy configuration from registered services and reload it seamlessly", long_about = None)]
struct Cli {
    /// TOML settings file. Template options are also read from the environment.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the admin API, compiling and (re)starting the proxy at boot
    Serve,
    /// Compile the configuration file once
    Compile,
    /// Reload the running proxy with the current configuration file
    Reload,
    /// Print the compiled configuration file
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!(
        templates_dir = %config.paths.templates_dir.display(),
        configs_dir = %config.paths.configs_dir.display(),
        certs_dir = %config.paths.certs_dir.display(),
        "Configuration loaded"
    );

    let plane = Arc::new(ControlPlane::new(&config, Arc::new(SystemRunner)));

    match cli.command {
        Commands::Compile => {
            let compiled = plane.compiler().compile()?;
            println!("{}", compiled.path.display());
        }
        Commands::Reload => {
            plane.reloader().reload()?;
        }
        Commands::ShowConfig => {
            print!("{}", plane.reader().read_config()?);
        }
        Commands::Serve => {
            if config.observability.metrics_enabled {
                let addr: SocketAddr = config.observability.metrics_address.parse()?;
                metrics::init_metrics(addr);
            }

            let boot_plane = plane.clone();
            let start_on_boot = config.proxy.start_on_boot;
            tokio::task::spawn_blocking(move || {
                if start_on_boot {
                    boot_plane.boot()
                } else {
                    boot_plane.compiler().compile()
                }
            })
            .await??;

            let shutdown = Shutdown::new();
            let shutdown_rx = shutdown.subscribe();
            signals::spawn_signal_listener(&shutdown);

            let listener = TcpListener::bind(&config.admin.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Admin API listening");

            let app = setup_admin_router(AdminState::new(plane, config.admin.api_key.clone()));
            axum::serve(listener, app)
                .with_graceful_shutdown(Shutdown::wait(shutdown_rx))
                .await?;

            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}
