use std::net::SocketAddr;
use std::sync::Arc;

use estate_backend::audit::DieselAuditSink;
use estate_backend::config::AppConfig;
use estate_backend::db;
use estate_backend::handlers;
use estate_backend::state::AppState;
use estate_backend::uploads::DiskImageStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = AppConfig::load()?;

    let pool = db::init_pool(&config.database_url)?;
    db::ping(&pool)?;

    let images = Arc::new(DiskImageStore::new(&config.upload_dir)?);
    let audit = Arc::new(DieselAuditSink::new(pool.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!("starting server on {}", addr);

    let state = AppState {
        pool,
        config,
        images,
        audit,
    };
    let app = handlers::api_router(state);

    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
