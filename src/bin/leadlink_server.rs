//! Leadlink HTTP Server
//!
//! A standalone server binary exposing the resolver over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use leadlink::bootstrap::load_or_bootstrap;
use leadlink::http::router;
use leadlink::Resolver;

/// Server configuration
struct Config {
    /// Address to bind to
    addr: SocketAddr,
    /// Path to the canonical CSV snapshot
    source: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".parse().unwrap(),
            source: PathBuf::from("./crm_database.csv"),
        }
    }
}

fn parse_args() -> Config {
    let args: Vec<String> = std::env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    let port: u16 = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("error: invalid port number: {}", args[i + 1]);
                        std::process::exit(1);
                    });
                    config.addr.set_port(port);
                    i += 2;
                } else {
                    eprintln!("error: --port requires a value");
                    std::process::exit(1);
                }
            }
            "--source" | "-s" => {
                if i + 1 < args.len() {
                    config.source = PathBuf::from(&args[i + 1]);
                    i += 2;
                } else {
                    eprintln!("error: --source requires a value");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                println!("leadlink-server - Leadlink HTTP Server");
                println!();
                println!("USAGE:");
                println!("    leadlink-server [OPTIONS]");
                println!();
                println!("OPTIONS:");
                println!("    -p, --port <PORT>         Port to listen on [default: 8000]");
                println!("    -s, --source <FILE>       Canonical CSV snapshot [default: ./crm_database.csv]");
                println!("                              A synthetic snapshot is generated if the file is missing.");
                println!("    -h, --help                Print help information");
                std::process::exit(0);
            }
            arg => {
                eprintln!("error: unknown argument: {}", arg);
                std::process::exit(1);
            }
        }
    }

    config
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        eprintln!("error: failed to install ctrl-c handler: {e}");
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = parse_args();

    let store = load_or_bootstrap(&config.source).unwrap_or_else(|e| {
        eprintln!("error: failed to initialize canonical store: {e}");
        std::process::exit(1);
    });
    let resolver = Arc::new(Resolver::new(store));

    let app = router(resolver);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("error: failed to bind {}: {e}", config.addr);
            std::process::exit(1);
        });

    info!(addr = %config.addr, "leadlink server listening");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("error: server exited abnormally: {e}");
        std::process::exit(1);
    }
}
