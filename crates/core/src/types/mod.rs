//! Shared newtype wrappers.
//!
//! Using dedicated types instead of bare integers and strings keeps entity
//! references from being mixed up across module boundaries and moves field
//! validation next to the type it protects.

pub mod email;
pub mod id;
pub mod mobile;
pub mod order_code;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{AdminId, BannerId, CategoryId, OrderId, ProductId, RoleId, UserId};
pub use mobile::{Mobile, MobileError};
pub use order_code::OrderCode;
pub use status::CategoryStatus;
