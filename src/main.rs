use std::sync::Arc;

use notification_relay::config::RelayConfig;
use notification_relay::directory::{DirectorySeed, EntityLookup, InMemoryDirectory};
use notification_relay::notifications::ws::relay_routes;
use notification_relay::notifications::{NotificationDispatcher, RecipientQueue};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = RelayConfig::from_env()?;

    eprintln!("📣 Notification Relay v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Push WS: ws://{}/ws/{{user_id}}", config.listen_addr());
    eprintln!("   Notifications API: http://{}/api/notifications", config.listen_addr());
    eprintln!("   Reply check: http://{}/api/responses/validate\n", config.listen_addr());

    // ── Queue + dispatch ─────────────────────────────────────────────────
    let queue = RecipientQueue::with_capacity(config.broadcast_capacity);
    let seed = match &config.directory_seed {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path).await?;
            let seed: DirectorySeed = serde_json::from_str(&raw)?;
            eprintln!(
                "   Directory: {} ({} users, {} events, {} questions, {} quizzes)",
                path.display(),
                seed.users.len(),
                seed.events.len(),
                seed.questions.len(),
                seed.quizzes.len()
            );
            seed
        }
        None => {
            eprintln!("   Directory: empty (set RELAY_DIRECTORY_SEED to load one)");
            DirectorySeed::default()
        }
    };
    let directory: Arc<dyn EntityLookup> = Arc::new(InMemoryDirectory::from_seed(seed));
    let dispatcher = Arc::new(NotificationDispatcher::new(directory, queue));

    // ── Server ───────────────────────────────────────────────────────────
    let app = relay_routes(dispatcher);
    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    tracing::info!(addr = %config.listen_addr(), "Notification relay started");
    axum::serve(listener, app).await?;

    Ok(())
}
