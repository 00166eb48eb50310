use std::sync::Arc;

use anyhow::Context;

use storefront_catalog::filter::ALL;
use storefront_catalog::{CatalogView, FilterConfig};
use storefront_client::{ClientConfig, StorefrontClient};
use storefront_session::SessionProvider;

fn env_or_all(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| ALL.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = ClientConfig::from_env()?;
    tracing::info!(api_url = %config.api_url, "starting storefront client");
    let client = Arc::new(StorefrontClient::new(config)?);

    let session = SessionProvider::start(client.clone()).await;
    match session.user() {
        Some(user) => tracing::info!(user = ?user.display_name(), "signed in"),
        None => tracing::info!("browsing anonymously"),
    }

    let filter = FilterConfig::parse(
        &env_or_all("STOREFRONT_CATEGORY"),
        &env_or_all("STOREFRONT_PRICE_RANGE"),
        &std::env::var("STOREFRONT_SORT").unwrap_or_else(|_| "featured".to_string()),
    )
    .context("invalid catalog filter")?;

    let mut view = CatalogView::with_config(filter);
    let ticket = view.begin_load();
    view.complete_load(ticket, client.fetch_products().await);

    if let Some(message) = view.error_message() {
        session.shutdown();
        anyhow::bail!("{message}");
    }

    tracing::info!(
        total = view.products().len(),
        visible = view.visible().len(),
        categories = ?view.categories(),
        "catalog loaded"
    );
    for product in view.visible() {
        tracing::info!(
            id = %product.id,
            name = %product.name,
            price = %product.price,
            badge = ?product.badge().map(|b| b.to_string()),
            "product"
        );
    }

    session.shutdown();
    Ok(())
}
