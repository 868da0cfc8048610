//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use coleta::{
    config::{AppState, Config},
    db, routes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("coleta=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração ou o banco falharem, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let addr = config.bind_addr.clone();
    let app_state = AppState::new(config).await?;

    db::run_migrations(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = routes::router(app_state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
