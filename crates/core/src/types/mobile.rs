//! Mobile phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Mobile`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum MobileError {
    /// The input is not exactly eleven characters long.
    #[error("mobile number must be exactly 11 digits")]
    WrongLength,
    /// The input contains a non-digit or an invalid prefix.
    #[error("mobile number must match 1[3-8] followed by 9 digits")]
    InvalidFormat,
}

/// A mobile phone number accepted by the SMS gateway.
///
/// Eleven digits, starting with `1` and a second digit in `3..=8`, the same
/// shape the gateway enforces on its side.
///
/// ## Examples
///
/// ```
/// use storekeep_core::Mobile;
///
/// assert!(Mobile::parse("13812345678").is_ok());
/// assert!(Mobile::parse("12812345678").is_err()); // bad prefix
/// assert!(Mobile::parse("138123456").is_err());   // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Mobile(String);

impl Mobile {
    /// Parse a `Mobile` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not eleven digits matching
    /// `1[3-8][0-9]{9}`.
    pub fn parse(s: &str) -> Result<Self, MobileError> {
        let bytes = s.as_bytes();
        if bytes.len() != 11 {
            return Err(MobileError::WrongLength);
        }
        if bytes[0] != b'1' || !(b'3'..=b'8').contains(&bytes[1]) {
            return Err(MobileError::InvalidFormat);
        }
        if !bytes[2..].iter().all(u8::is_ascii_digit) {
            return Err(MobileError::InvalidFormat);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Mobile` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Mobile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Mobile {
    type Err = MobileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Mobile {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with mysql feature)
#[cfg(feature = "mysql")]
impl sqlx::Type<sqlx::MySql> for Mobile {
    fn type_info() -> sqlx::mysql::MySqlTypeInfo {
        <String as sqlx::Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::MySql>>::compatible(ty)
    }
}

#[cfg(feature = "mysql")]
impl<'r> sqlx::Decode<'r, sqlx::MySql> for Mobile {
    fn decode(value: sqlx::mysql::MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::MySql>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "mysql")]
impl<'q> sqlx::Encode<'q, sqlx::MySql> for Mobile {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::MySql as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::MySql>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        for n in ["13000000000", "13812345678", "18899999999", "15511112222"] {
            assert!(Mobile::parse(n).is_ok(), "{n} should parse");
        }
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            Mobile::parse("138123456"),
            Err(MobileError::WrongLength)
        ));
        assert!(matches!(
            Mobile::parse("138123456789"),
            Err(MobileError::WrongLength)
        ));
    }

    #[test]
    fn test_parse_bad_prefix() {
        assert!(matches!(
            Mobile::parse("12812345678"),
            Err(MobileError::InvalidFormat)
        ));
        assert!(matches!(
            Mobile::parse("19812345678"),
            Err(MobileError::InvalidFormat)
        ));
        assert!(matches!(
            Mobile::parse("23812345678"),
            Err(MobileError::InvalidFormat)
        ));
    }

    #[test]
    fn test_parse_non_digit() {
        assert!(matches!(
            Mobile::parse("1381234567x"),
            Err(MobileError::InvalidFormat)
        ));
    }
}
