mod app;
mod config;
mod dto;
mod error;
mod handlers;
mod models;
mod repository;
mod service;

use clap::Parser;
use tokio::signal;

use std::sync::Arc;

use repository::Repository;
use service::NoteService;

#[derive(Parser, Debug)]
#[command(version, about = "Notes CRUD service")]
struct Cli {
    /// Seed the database with welcome notes and exit
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });
    tracing::info!("Successfully loaded notes service config");

    // Repository creation and migration
    let mut repo = Repository::open(&cfg.database_file).unwrap_or_else(|e| {
        tracing::error!("Failed to open database: {e}");
        panic!("failed to open database: {e}");
    });

    repo.migrate().unwrap_or_else(|e| {
        tracing::error!("Failed to migrate database: {e}");
        panic!("failed to migrate database: {e}");
    });

    if cli.init {
        let seeded = repo.seed().unwrap_or_else(|e| {
            tracing::error!("Failed to seed database: {e}");
            panic!("failed to seed database: {e}");
        });
        tracing::info!(
            "Seeded {} notes into {}. Run the server normally now.",
            seeded.len(),
            repo.path().display()
        );
        return;
    }

    let repo_ptr = Arc::new(tokio::sync::Mutex::new(repo));

    // Service creation
    let service = Arc::new(NoteService::new(repo_ptr.clone()));

    // Router config
    let router = app::create_router(service, app::cors_layer(&cfg.cors_origins));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind port {}: {e}", cfg.port);
            panic!("failed to bind port {}: {e}", cfg.port);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("API listening on {}", addr),
        Err(e) => tracing::warn!("Listening, but local address is unknown: {e}"),
    }

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to run HTTP server: {e}");
    }

    // Closes the database connection
    drop(repo_ptr);
    tracing::info!("Server shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::warn!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::warn!("Received SIGTERM, shutting down"),
    }
}
