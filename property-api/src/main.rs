use std::sync::Arc;

use property_api::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let store = PropertyStore::open(&config.storage).await?;

    if let Some(path) = &config.storage.seed_path {
        let properties = load_seed(path).await?;
        seed_repository(&store, properties).await?;
    }

    let service = Arc::new(PropertyService::new(store.clone(), config.pagination));
    let served = Server::new(config).serve(router(service)).await;

    store.close().await;
    shutdown_tracing();

    served
}
