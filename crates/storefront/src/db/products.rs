//! Catalog lookups.

use rust_decimal::Decimal;
use sqlx::PgPool;

use sell_restrict_core::ProductId;

use super::RepositoryError;

/// Product type as stored in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    Simple,
    Variable,
    Variation,
    Grouped,
}

impl ProductKind {
    fn parse(kind: &str) -> Result<Self, RepositoryError> {
        match kind {
            "simple" => Ok(Self::Simple),
            "variable" => Ok(Self::Variable),
            "variation" => Ok(Self::Variation),
            "grouped" => Ok(Self::Grouped),
            other => Err(RepositoryError::DataCorruption(format!(
                "unknown product kind: {other}"
            ))),
        }
    }

    /// Whether a line can point directly at this product.
    #[must_use]
    pub const fn is_purchasable(self) -> bool {
        matches!(self, Self::Simple | Self::Variation)
    }
}

/// A published catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub id: ProductId,
    /// Set for variations.
    pub parent_id: Option<ProductId>,
    pub kind: ProductKind,
    pub name: String,
    pub sku: Option<String>,
    pub price: Decimal,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    parent_id: Option<i64>,
    kind: String,
    name: String,
    sku: Option<String>,
    price: Decimal,
}

impl TryFrom<ProductRow> for ProductRecord {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::new(row.id),
            parent_id: row.parent_id.map(ProductId::new),
            kind: ProductKind::parse(&row.kind)?,
            name: row.name,
            sku: row.sku.filter(|s| !s.is_empty()),
            price: row.price,
        })
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

    /// Get a published product or variation by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` for an unknown product kind.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, parent_id, kind, name, sku, price
            FROM product
            WHERE id = $1 AND status = 'publish'
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRecord::try_from).transpose()
    }

    /// Ids of the published variations of a product, in id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn variation_ids(&self, parent: ProductId) -> Result<Vec<ProductId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM product
            WHERE parent_id = $1 AND kind = 'variation' AND status = 'publish'
            ORDER BY id
            ",
        )
        .bind(parent)
        .fetch_all(self.pool)
        .await?;

        Ok(ids.into_iter().map(ProductId::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!(ProductKind::parse("variation").ok(), Some(ProductKind::Variation));
        assert!(matches!(
            ProductKind::parse("bundle"),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_only_simple_and_variations_are_purchasable() {
        assert!(ProductKind::Simple.is_purchasable());
        assert!(ProductKind::Variation.is_purchasable());
        assert!(!ProductKind::Variable.is_purchasable());
        assert!(!ProductKind::Grouped.is_purchasable());
    }
}
