//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use sell_restrict_core::define_id;
/// define_id!(OrderId);
/// define_id!(CouponId);
///
/// let order_id = OrderId::new(1);
/// let coupon_id = CouponId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = coupon_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i64 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i64 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i64 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i64 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Products and variations share one id space, like the catalog they come from.
define_id!(ProductId);
define_id!(CustomerId);

impl ProductId {
    /// Interpret arbitrary user input as a product id.
    ///
    /// Mirrors the catalog's "absolute integer" coercion: surrounding
    /// whitespace is ignored and a leading minus sign is dropped. Returns
    /// `None` for anything that is not an integer or has no positive
    /// counterpart (`i64::MIN`).
    #[must_use]
    pub fn parse_absolute(input: &str) -> Option<Self> {
        input.trim().parse::<i64>().ok()?.checked_abs().map(Self)
    }

    /// Whether this id can refer to a real catalog entry.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_accepts_integers() {
        assert_eq!(ProductId::parse_absolute("42"), Some(ProductId::new(42)));
        assert_eq!(ProductId::parse_absolute(" 7 "), Some(ProductId::new(7)));
        assert_eq!(ProductId::parse_absolute("-13"), Some(ProductId::new(13)));
    }

    #[test]
    fn test_parse_absolute_rejects_non_numeric() {
        assert_eq!(ProductId::parse_absolute(""), None);
        assert_eq!(ProductId::parse_absolute("abc"), None);
        assert_eq!(ProductId::parse_absolute("12abc"), None);
        assert_eq!(ProductId::parse_absolute("1.5"), None);
    }

    #[test]
    fn test_parse_absolute_rejects_min() {
        assert_eq!(ProductId::parse_absolute(&i64::MIN.to_string()), None);
        assert_eq!(
            ProductId::parse_absolute(&(i64::MIN + 1).to_string()),
            Some(ProductId::new(i64::MAX))
        );
    }

    #[test]
    fn test_zero_is_not_valid() {
        assert!(!ProductId::new(0).is_valid());
        assert!(ProductId::new(1).is_valid());
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&ProductId::new(42)).expect("serialize");
        assert_eq!(json, "42");
        let id: ProductId = serde_json::from_str("42").expect("deserialize");
        assert_eq!(id, ProductId::new(42));
    }
}
