//! Brazilian license plate type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Plate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlateError {
    /// Fewer than seven letters/digits after normalization.
    #[error("invalid plate, use the format ABC1D23 or ABC1234 (got {0:?})")]
    TooShort(String),
    /// Seven characters, but not in the old or the Mercosul layout.
    #[error("invalid plate, use the format ABC1D23 or ABC1234 (got {0:?})")]
    BadLayout(String),
}

/// A normalized license plate.
///
/// Input is upper-cased, everything except `A-Z0-9` is dropped and only the
/// first seven characters are kept, so `"abc-1d23"` and `"ABC 1D23"` are the
/// same plate. Two layouts are accepted:
///
/// - old: `ABC1234`
/// - Mercosul: `ABC1D23`
///
/// ```
/// use arycar_core::Plate;
///
/// assert_eq!(Plate::parse("abc-1234").unwrap().as_str(), "ABC1234");
/// assert_eq!(Plate::parse("bra2e19").unwrap().as_str(), "BRA2E19");
/// assert!(Plate::parse("ABC12").is_err());
/// assert!(Plate::parse("1234ABC").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plate(String);

impl Plate {
    /// Number of characters in a plate.
    pub const LEN: usize = 7;

    /// Normalize user input the way the plate field masks it while typing.
    #[must_use]
    pub fn normalize(input: &str) -> String {
        input
            .chars()
            .map(|c| c.to_ascii_uppercase())
            .filter(char::is_ascii_alphanumeric)
            .take(Self::LEN)
            .collect()
    }

    /// Parse and validate a plate.
    ///
    /// # Errors
    ///
    /// Returns [`PlateError`] when the normalized input is shorter than seven
    /// characters or matches neither plate layout.
    pub fn parse(input: &str) -> Result<Self, PlateError> {
        let plate = Self::normalize(input);
        if plate.len() < Self::LEN {
            return Err(PlateError::TooShort(plate));
        }

        let b = plate.as_bytes();
        let layout_ok = b.iter().take(3).all(u8::is_ascii_uppercase)
            && b.get(3).is_some_and(u8::is_ascii_digit)
            && b.get(4).is_some_and(u8::is_ascii_alphanumeric)
            && b.iter().skip(5).all(u8::is_ascii_digit);
        if !layout_ok {
            return Err(PlateError::BadLayout(plate));
        }

        Ok(Self(plate))
    }

    /// `true` for the Mercosul layout (`ABC1D23`).
    #[must_use]
    pub fn is_mercosul(&self) -> bool {
        self.0.as_bytes().get(4).is_some_and(u8::is_ascii_uppercase)
    }

    /// The plate as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the plate and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Plate {
    type Err = PlateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Plate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Plate {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Plate {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Stored plates were validated on the way in
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Plate {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_and_truncates() {
        assert_eq!(Plate::normalize(" abc-1d23 xyz"), "ABC1D23");
        assert_eq!(Plate::normalize("a.b"), "AB");
    }

    #[test]
    fn test_parse_old_and_mercosul() {
        let old = Plate::parse("ABC1234").unwrap();
        assert!(!old.is_mercosul());

        let mercosul = Plate::parse("abc1d23").unwrap();
        assert!(mercosul.is_mercosul());
        assert_eq!(mercosul.to_string(), "ABC1D23");
    }

    #[test]
    fn test_parse_too_short() {
        assert_eq!(
            Plate::parse("ab-12"),
            Err(PlateError::TooShort("AB12".to_string()))
        );
    }

    #[test]
    fn test_parse_bad_layout() {
        assert!(matches!(
            Plate::parse("AB12345"),
            Err(PlateError::BadLayout(_))
        ));
        assert!(matches!(
            Plate::parse("ABC1DE3"),
            Err(PlateError::BadLayout(_))
        ));
    }
}
