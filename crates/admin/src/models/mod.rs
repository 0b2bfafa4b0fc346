//! Domain types returned by the repositories and serialized to clients.

pub mod admin;
pub mod content;
pub mod order;
pub mod rbac;

pub use admin::CurrentAdmin;
pub use content::{Banner, Category};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderWithItems};
pub use rbac::{Permission, Relation, Role};
