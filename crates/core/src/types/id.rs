//! Newtype IDs for type-safe entity references.
//!
//! Every table uses a `SERIAL` primary key, so IDs wrap an `i32`. Use the
//! `define_id!` macro to declare a new one; the generated types cannot be
//! mixed up with each other at compile time.

/// Errors that can occur when parsing an ID from text (path segments, CLI args).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is not a number.
    #[error("invalid id: {0}")]
    NotANumber(String),
    /// IDs start at 1.
    #[error("id must be positive (got {0})")]
    NotPositive(i32),
}

/// Define a type-safe ID wrapper around `i32`.
///
/// The generated type is `Copy`, serializes transparently, parses from a
/// decimal string (rejecting zero and negatives) and, with the `postgres`
/// feature, encodes as a Postgres `INT4`.
///
/// # Example
///
/// ```rust
/// # use arycar_core::define_id;
/// define_id!(BayId);
///
/// let bay: BayId = "7".parse().unwrap();
/// assert_eq!(bay.as_i32(), 7);
/// assert!("0".parse::<BayId>().is_err());
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
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database id.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// The raw database id.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                let id = s
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| $crate::types::id::IdError::NotANumber(s.to_owned()))?;
                if id < 1 {
                    return Err($crate::types::id::IdError::NotPositive(id));
                }
                Ok(Self(id))
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(CustomerId);
define_id!(VehicleId);
define_id!(ServiceId);
define_id!(OrderId);
define_id!(EmployeeId);
define_id!(ChecklistId);

impl OrderId {
    /// Short code shown on the queue board and in notifications: the last
    /// four digits of the id, zero-padded (`OS #0042`).
    #[must_use]
    pub fn short_code(&self) -> String {
        let padded = format!("{:04}", self.0);
        let start = padded.len().saturating_sub(4);
        padded.get(start..).unwrap_or(&padded).to_owned()
    }
}
