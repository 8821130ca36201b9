use std::error::Error;

use clap::Parser;
use workshop_server::{Config, router};
use workshopdb::StoreBuilder;
use workshopdb::entity::product;
use workshopdb::seed::seed_products;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    let mut builder = StoreBuilder::new(&config.database_url);
    if let Some(n) = config.max_connections {
        builder = builder.with_max_connections(n);
    }
    let store = builder.build().await?;

    if config.no_seed {
        log::info!("product seeding disabled");
    } else {
        seed_products(&store.repo::<product::Entity>()).await?;
    }

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    log::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(store)).await?;
    Ok(())
}
