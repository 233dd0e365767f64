mod actor_framework;
mod app_system;
mod cart;
mod catalog;
mod clients;
mod domain;
mod repository;

#[cfg(test)]
mod mock_framework;

use serde_json::json;
use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, AppConfig, CatalogSystem};
use crate::catalog::{QueryParams, RawQueryParams, SortField, SortOrder};
use crate::domain::{ProductCreate, ProductPatch};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Setup tracing once for the entire application
    setup_tracing(&config.log_filter);
    info!(?config, "Starting catalog system");

    let system = CatalogSystem::new(&config);

    // Seed an empty catalog so the demo has something to query
    let span = tracing::info_span!("catalog_seed");
    async {
        if !system.product_client.list_products().await?.is_empty() {
            return Ok(());
        }
        info!("Seeding empty catalog");
        for (name, description, category, price, quantity) in [
            ("Chair", "Oak dining chair", "Furniture", 50.0, 10),
            ("Desk", "Standing desk", "Furniture", 150.0, 4),
            ("Lamp", "Brass desk lamp", "Lighting", 20.0, 8),
        ] {
            let params = ProductCreate::new(name, description, price, quantity).with_category(category);
            system.product_client.create_product(params).await?;
        }
        Ok::<_, catalog::CatalogError>(())
    }
    .instrument(span)
    .await?;

    let categories = system.product_client.categories().await?;
    info!(?categories, "Catalog categories");

    // Restock the first product the way a PATCH handler would
    let first_id = system.product_client.list_products().await?.first().map_or(1, |p| p.id);
    let first = system.product_client.require_product(first_id).await?;
    let patch: ProductPatch = serde_json::from_value(json!({ "quantity": first.quantity + 5 }))?;
    let restocked = system.product_client.update_product(first.id, patch).await?;
    info!(product_id = restocked.id, quantity = restocked.quantity, "Product restocked");

    // Query the way a request handler would, with loosely typed parameters
    let span = tracing::info_span!("catalog_query");
    let raw: RawQueryParams = serde_json::from_value(json!({
        "page": "1",
        "limit": 2,
        "search": "desk",
        "sort": "price",
        "order": "desc",
    }))?;
    let page = system.product_client.query_products(raw).instrument(span).await?;
    info!(
        total_items = page.total_items,
        total_pages = page.total_pages,
        page = %serde_json::to_string(&page)?,
        "Query result"
    );

    // Typed query for callers inside the process
    let params = QueryParams::default()
        .category("Furniture")
        .search("oak")
        .sort(SortField::Quantity, SortOrder::Asc)
        .page(1)
        .limit(5);
    let furniture = system.product_client.query(&params).await?;
    info!(total_items = furniture.total_items, "Oak furniture");

    // Drive the cart and watch the badge count follow along
    let span = tracing::info_span!("cart_session");
    let cart_result = async {
        let mut updates = system.cart_client.subscribe().await?;
        for product in &page.products {
            system.cart_client.add_to_cart(product.clone()).await?;
        }
        if let Some(first) = page.products.first() {
            system.cart_client.increase_quantity(first.id).await?;
        }
        if let Some(last) = page.products.last() {
            system.cart_client.decrease_quantity(last.id).await?;
            system.cart_client.remove_from_cart(last.id).await?;
        }

        while let Ok(snapshot) = updates.try_recv() {
            info!(badge = snapshot.total_quantity, total_price = snapshot.total_price, "Cart updated");
        }
        system.cart_client.snapshot().await
    }
    .instrument(span)
    .await;

    match cart_result {
        Ok(snapshot) => info!(cart = %serde_json::to_string(&snapshot)?, "Final cart"),
        Err(e) => error!(error = %e, "Cart session failed"),
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
