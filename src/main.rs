use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use taskdeck::{api, auth::AppState, db::Db};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskdeck-server", about = "Task-tracking REST server")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:3000")]
    listen: SocketAddr,

    /// Path to the redb store file
    #[arg(long, default_value = "tasks.redb")]
    db: String,

    /// Secret used to sign session tokens
    #[arg(long, default_value = "change-me-in-production")]
    jwt_secret: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Open the store ─────────────────────────────────────────
    let db = Db::open(&args.db).expect("Failed to open task store");

    if db.ensure_default_user().expect("Failed to seed user") {
        tracing::info!("created default admin user (admin / admin)");
    }

    // ── Shared state ───────────────────────────────────────────
    let state = Arc::new(AppState {
        db,
        jwt_secret: args.jwt_secret,
    });

    // ── Router + serve ─────────────────────────────────────────
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(addr = %args.listen, "server running");

    axum::serve(listener, app).await.expect("server error");
}
