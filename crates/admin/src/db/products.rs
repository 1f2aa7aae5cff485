//! Catalog search for the restricted-products picker.

use sqlx::PgPool;

use sell_restrict_core::ProductId;

use super::RepositoryError;

/// Search results per page.
pub const PRODUCTS_PER_PAGE: i64 = 20;

/// A product or variation offered by the picker.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProductMatch {
    pub id: ProductId,
    pub name: String,
    pub sku: Option<String>,
}

impl ProductMatch {
    /// `"Name (#sku)"`, or just the name when there is no SKU.
    #[must_use]
    pub fn formatted_name(&self) -> String {
        match self.sku.as_deref().map(str::trim) {
            Some(sku) if !sku.is_empty() => format!("{} (#{sku})", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Published simple products, variable products and variations whose
    /// name or SKU contains `term`, case-insensitively. `page` is 1-based.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, term: &str, page: u32) -> Result<Vec<ProductMatch>, RepositoryError> {
        let pattern = format!("%{}%", escape_like(term));
        let offset = i64::from(page.saturating_sub(1)) * PRODUCTS_PER_PAGE;

        let matches = sqlx::query_as::<_, ProductMatch>(
            r"
            SELECT id, name, sku
            FROM product
            WHERE status = 'publish'
              AND kind IN ('simple', 'variable', 'variation')
              AND (name ILIKE $1 ESCAPE '\' OR sku ILIKE $1 ESCAPE '\')
            ORDER BY name, id
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(pattern)
        .bind(PRODUCTS_PER_PAGE)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(matches)
    }

    /// Look up the given ids, in any status. Missing ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<ProductMatch>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = ids.iter().map(ProductId::as_i64).collect();
        let matches = sqlx::query_as::<_, ProductMatch>(
            "SELECT id, name, sku FROM product WHERE id = ANY($1)",
        )
        .bind(raw)
        .fetch_all(self.pool)
        .await?;

        Ok(matches)
    }
}

/// Escape `LIKE` wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
