//! Catalog access with caching.
//!
//! Caches products and variation lists using `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use sell_restrict_core::ProductId;

use crate::db::{ProductRecord, ProductRepository, RepositoryError};

#[derive(Clone)]
enum CacheValue {
    Product(Option<Arc<ProductRecord>>),
    Variations(Arc<[ProductId]>),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum CacheKey {
    Product(ProductId),
    Variations(ProductId),
}

/// Read-through cache over the product catalog.
#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(Duration::from_secs(300))
                .build(),
        }
    }

    /// A published product or variation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog cannot be read.
    pub async fn product(
        &self,
        id: ProductId,
    ) -> Result<Option<Arc<ProductRecord>>, RepositoryError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            debug!(product_id = %id, "Cache hit for product");
            return Ok(product);
        }

        let product = ProductRepository::new(&self.pool)
            .get(id)
            .await?
            .map(Arc::new);
        self.cache
            .insert(key, CacheValue::Product(product.clone()))
            .await;
        Ok(product)
    }

    /// Published variation ids of a product (empty for non-variable products).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog cannot be read.
    pub async fn variation_ids(&self, id: ProductId) -> Result<Arc<[ProductId]>, RepositoryError> {
        let key = CacheKey::Variations(id);
        if let Some(CacheValue::Variations(ids)) = self.cache.get(&key).await {
            return Ok(ids);
        }

        let ids: Arc<[ProductId]> = ProductRepository::new(&self.pool)
            .variation_ids(id)
            .await?
            .into();
        self.cache
            .insert(key, CacheValue::Variations(Arc::clone(&ids)))
            .await;
        Ok(ids)
    }

    /// Seed the cache with a product and its variations.
    pub async fn prime(&self, product: ProductRecord, variations: Vec<ProductRecord>) {
        let variation_ids: Arc<[ProductId]> = variations.iter().map(|v| v.id).collect();
        self.cache
            .insert(
                CacheKey::Variations(product.id),
                CacheValue::Variations(variation_ids),
            )
            .await;
        for record in std::iter::once(product).chain(variations) {
            self.cache
                .insert(
                    CacheKey::Product(record.id),
                    CacheValue::Product(Some(Arc::new(record))),
                )
                .await;
        }
    }
}
