//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Category lifecycle status.
///
/// Stored as a small integer: `1` while the category is on sale, `2` once it
/// has been abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum CategoryStatus {
    /// Products in this category are on sale.
    #[default]
    OnSale,
    /// The category has been retired.
    Abandoned,
}

impl CategoryStatus {
    /// The integer value stored in the database.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::OnSale => 1,
            Self::Abandoned => 2,
        }
    }
}

impl From<CategoryStatus> for u8 {
    fn from(status: CategoryStatus) -> Self {
        status.as_u8()
    }
}

impl TryFrom<u8> for CategoryStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::OnSale),
            2 => Ok(Self::Abandoned),
            other => Err(format!("invalid category status: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_status_values() {
        assert_eq!(CategoryStatus::OnSale.as_u8(), 1);
        assert_eq!(CategoryStatus::Abandoned.as_u8(), 2);
    }

    #[test]
    fn test_category_status_try_from() {
        assert_eq!(CategoryStatus::try_from(1).unwrap(), CategoryStatus::OnSale);
        assert_eq!(
            CategoryStatus::try_from(2).unwrap(),
            CategoryStatus::Abandoned
        );
        assert!(CategoryStatus::try_from(0).is_err());
        assert!(CategoryStatus::try_from(3).is_err());
    }

    #[test]
    fn test_category_status_serde_as_number() {
        let json = serde_json::to_string(&CategoryStatus::Abandoned).unwrap();
        assert_eq!(json, "2");
        let parsed: CategoryStatus = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, CategoryStatus::OnSale);
    }
}
