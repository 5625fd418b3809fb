//! OrderDesk notifier
//!
//! Small terminal client that connects an authenticated session to the live
//! notification channel and prints alerts as they arrive. Useful for
//! verifying a deployment end to end without the storefront UI.

use anyhow::Context;
use tokio::signal;

use orderdesk_client::config::ClientConfig;
use orderdesk_client::notifications::{ConnectionState, NotificationChannel};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match ClientConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    if config.session_token.is_none() {
        eprintln!("ORDERDESK_SESSION_TOKEN is not set; nothing to subscribe to");
        std::process::exit(1);
    }

    tracing::info!(
        api = %config.api_base_url,
        ws = %config.ws_url,
        token = %config.session_token_masked(),
        "Starting OrderDesk notifier"
    );

    let (channel, mut alerts) =
        NotificationChannel::new(config).context("Failed to build notification channel")?;

    channel
        .connect()
        .await
        .context("Failed to open notification channel")?;

    // Report connectivity changes as they happen
    let mut connection = channel.watch_connection();
    let connectivity = tokio::spawn(async move {
        while connection.changed().await.is_ok() {
            let state = *connection.borrow();
            match state {
                ConnectionState::Connected => tracing::info!("Live notifications connected"),
                ConnectionState::Connecting => tracing::info!("Reconnecting..."),
                ConnectionState::Disconnected => {
                    tracing::warn!("Live notifications disconnected; display may be stale")
                }
            }
        }
    });

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            alert = alerts.recv() => {
                match alert {
                    Some(alert) => {
                        println!("{} {} - {}", alert.kind.icon(), alert.title, alert.message);
                        println!("   unread: {}", channel.unread_count().await);
                    }
                    None => break,
                }
            }
            _ = &mut shutdown => {
                break;
            }
        }
    }

    channel.shutdown().await;
    connectivity.abort();
    tracing::info!("Notifier shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
