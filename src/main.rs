use tokio::net::TcpListener;

use ticket_desk::{
    api::{self, links::RouteTable},
    config::{Config, StorageConfig},
    persisters::{in_memory::InMemoryPersister, persister::TicketPersister},
    services::ticket::TicketService,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        log::error!("ticket-desk stopped: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoxError> {
    let config = Config::from_env()?;
    match &config.storage {
        StorageConfig::Memory => {
            log::warn!("using in-memory storage, tickets are lost on shutdown");
            serve(InMemoryPersister::new(), &config).await
        }
        #[cfg(feature = "postgres")]
        StorageConfig::Postgres {
            url,
            max_connections,
        } => {
            let persister =
                ticket_desk::persisters::postgres::SqlxPersister::connect(url, *max_connections)
                    .await?;
            persister.migrate().await?;
            serve(persister, &config).await
        }
        #[cfg(not(feature = "postgres"))]
        StorageConfig::Postgres { .. } => {
            Err("postgres storage requires building with the `postgres` feature".into())
        }
    }
}

async fn serve<P>(persister: P, config: &Config) -> Result<(), BoxError>
where
    P: TicketPersister + 'static,
{
    let routes = RouteTable::new(&config.server.public_url, api::TICKETS_PATH);
    let app = api::router(TicketService::new(persister), routes);

    let listener = TcpListener::bind(config.bind_address()).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
