//! Order code type.

use core::fmt;

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// A human-readable order code derived from the creation time and the
/// ordering user.
///
/// The code is the unpadded concatenation of year, month, day, hour, minute,
/// second and the user id. Two orders placed by the same user within the same
/// second therefore produce the same code; the `orders.order_code` unique key
/// is what actually rejects the second insert.
///
/// ## Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use storekeep_core::{OrderCode, UserId};
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 30).unwrap();
/// let code = OrderCode::generate(at, UserId::new(42));
/// assert_eq!(code.as_str(), "202437953042");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OrderCode(String);

impl OrderCode {
    /// Generate an order code for `user_id` at `at`.
    #[must_use]
    pub fn generate(at: DateTime<Utc>, user_id: UserId) -> Self {
        Self(format!(
            "{}{}{}{}{}{}{}",
            at.year(),
            at.month(),
            at.day(),
            at.hour(),
            at.minute(),
            at.second(),
            user_id
        ))
    }

    /// Wrap an order code received from a client or the database.
    #[must_use]
    pub fn from_string(code: String) -> Self {
        Self(code)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `OrderCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl AsRef<str> for OrderCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with mysql feature)
#[cfg(feature = "mysql")]
impl sqlx::Type<sqlx::MySql> for OrderCode {
    fn type_info() -> sqlx::mysql::MySqlTypeInfo {
        <String as sqlx::Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::MySql>>::compatible(ty)
    }
}

#[cfg(feature = "mysql")]
impl<'r> sqlx::Decode<'r, sqlx::MySql> for OrderCode {
    fn decode(value: sqlx::mysql::MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::MySql>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "mysql")]
impl<'q> sqlx::Encode<'q, sqlx::MySql> for OrderCode {
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
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_generate_concatenates_unpadded_components() {
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let code = OrderCode::generate(at, UserId::new(1001));
        assert_eq!(code.as_str(), "202412312359591001");

        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let code = OrderCode::generate(at, UserId::new(7));
        assert_eq!(code.as_str(), "2024123457");
    }

    #[test]
    fn test_same_second_same_user_collides() {
        // Documents the known weakness: codes are not unique under
        // concurrent same-second requests from the same user.
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let a = OrderCode::generate(at, UserId::new(55));
        let b = OrderCode::generate(at, UserId::new(55));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_users_differ() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let a = OrderCode::generate(at, UserId::new(55));
        let b = OrderCode::generate(at, UserId::new(56));
        assert_ne!(a, b);
    }
}
