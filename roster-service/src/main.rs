use roster_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config);

    tracing::info!(
        service = %config.service.name,
        environment = %config.service.environment,
        "Starting service"
    );

    let state = SeedData::load(&config.data)
        .await?
        .into_state(config.clone());

    let result = Server::new(config).serve(routes(state)).await;

    shutdown_tracing();
    result
}
