//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_u64()`
/// - `From<u64>` and `Into<u64>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `mysql` feature)
///
/// All identifier columns are `BIGINT UNSIGNED`, so the wrappers uniformly
/// carry `u64`.
///
/// # Example
///
/// ```rust
/// # use storekeep_core::define_id;
/// define_id!(AdminId);
/// define_id!(OrderId);
///
/// let admin_id = AdminId::new(1);
/// let order_id = OrderId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: AdminId = order_id;
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
        pub struct $name(u64);

        impl $name {
            /// Create a new ID from a u64 value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying u64 value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "mysql")]
        impl ::sqlx::Type<::sqlx::MySql> for $name {
            fn type_info() -> ::sqlx::mysql::MySqlTypeInfo {
                <u64 as ::sqlx::Type<::sqlx::MySql>>::type_info()
            }

            fn compatible(ty: &::sqlx::mysql::MySqlTypeInfo) -> bool {
                <u64 as ::sqlx::Type<::sqlx::MySql>>::compatible(ty)
            }
        }

        #[cfg(feature = "mysql")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::MySql> for $name {
            fn decode(
                value: ::sqlx::mysql::MySqlValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <u64 as ::sqlx::Decode<::sqlx::MySql>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "mysql")]
        impl<'q> ::sqlx::Encode<'q, ::sqlx::MySql> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <::sqlx::MySql as ::sqlx::Database>::ArgumentBuffer<'q>,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <u64 as ::sqlx::Encode<'q, ::sqlx::MySql>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Define standard entity IDs
define_id!(AdminId);
define_id!(UserId);
define_id!(RoleId);
define_id!(OrderId);
define_id!(ProductId);
define_id!(BannerId);
define_id!(CategoryId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = AdminId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(u64::from(id), 42);
        assert_eq!(AdminId::from(42), id);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(OrderId::new(10_000).to_string(), "10000");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = RoleId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let parsed: RoleId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
