use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::catalog::{self, CatalogError, QueryParams, QueryResult, RawQueryParams};
use crate::domain::{Product, ProductCreate, ProductPatch};

/// Client for interacting with the Product actor.
///
/// Writes go through the actor; queries take a point-in-time copy of the collection
/// from the actor and run the pure query engine on the caller's task.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, CatalogError, product);

impl ProductClient {
    #[instrument(skip(self, params), fields(product_name = %params.name))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, CatalogError> {
        debug!("Sending request");
        let product = self.inner.create(params).await?;
        info!(product_id = product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_product(&self, id: u64, patch: ProductPatch) -> Result<Product, CatalogError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?)
    }

    /// Like `get_product`, but an unknown id is a [`CatalogError::NotFound`].
    #[instrument(skip(self))]
    pub async fn require_product(&self, id: u64) -> Result<Product, CatalogError> {
        self.get_product(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Normalizes loosely typed request parameters, then runs [`Self::query`].
    #[instrument(skip(self))]
    pub async fn query_products(&self, raw: RawQueryParams) -> Result<QueryResult, CatalogError> {
        let params = QueryParams::try_from(raw).inspect_err(|e| warn!(error = %e, "Rejected query parameters"))?;
        self.query(&params).await
    }

    #[instrument(skip(self, params), fields(page = params.page, limit = params.limit, sort = %params.sort))]
    pub async fn query(&self, params: &QueryParams) -> Result<QueryResult, CatalogError> {
        debug!("Sending request");
        let products = self.inner.list().await?;
        let result = catalog::query(&products, params)?;
        info!(
            total_items = result.total_items,
            total_pages = result.total_pages,
            returned = result.products.len(),
            "Catalog query completed"
        );
        Ok(result)
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        debug!("Sending request");
        let products = self.inner.list().await?;
        Ok(catalog::categories(&products))
    }
}
