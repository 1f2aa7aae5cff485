//! Customer accounts and saved address countries.

use sqlx::PgPool;

use sell_restrict_core::{CountryCandidates, CustomerId};

use super::RepositoryError;

/// Login lookup result.
#[derive(Debug, Clone)]
pub struct CustomerCredentials {
    pub id: CustomerId,
    pub email: String,
    pub password_hash: String,
}

/// Repository for customer accounts.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer's id and password hash by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credentials(
        &self,
        email: &str,
    ) -> Result<Option<CustomerCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, email, password_hash FROM customer WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, email, password_hash)| CustomerCredentials {
            id: CustomerId::new(id),
            email,
            password_hash,
        }))
    }

    /// Billing and shipping countries saved against a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn saved_countries(
        &self,
        customer_id: CustomerId,
    ) -> Result<CountryCandidates, RepositoryError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT kind, country FROM customer_address WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        let mut candidates = CountryCandidates::default();
        for (kind, country) in rows {
            match kind.as_str() {
                "billing" => candidates.billing = Some(country),
                "shipping" => candidates.shipping = Some(country),
                other => {
                    return Err(RepositoryError::DataCorruption(format!(
                        "unknown address kind: {other}"
                    )));
                }
            }
        }

        Ok(candidates)
    }

    /// Insert a customer and return the new id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<CustomerId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO customer (email, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await?;

        Ok(CustomerId::new(id))
    }

    /// Upsert the saved billing and shipping countries that are present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a write fails.
    pub async fn save_countries(
        &self,
        customer_id: CustomerId,
        countries: &CountryCandidates,
    ) -> Result<(), RepositoryError> {
        for (kind, country) in [
            ("billing", countries.billing.as_deref()),
            ("shipping", countries.shipping.as_deref()),
        ] {
            let Some(country) = country else { continue };
            sqlx::query(
                r"
                INSERT INTO customer_address (customer_id, kind, country)
                VALUES ($1, $2, $3)
                ON CONFLICT (customer_id, kind) DO UPDATE SET country = EXCLUDED.country, updated_at = NOW()
                ",
            )
            .bind(customer_id)
            .bind(kind)
            .bind(country)
            .execute(self.pool)
            .await?;
        }

        Ok(())
    }
}
