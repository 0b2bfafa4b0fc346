//! Authenticated-principal type.

use serde::{Deserialize, Serialize};

use storekeep_core::AdminId;

/// The admin resolved from a verified bearer token.
///
/// Carries only the identity; the active flag and role set are looked up
/// against the database by the middleware that needs them, so a token minted
/// before a deactivation cannot keep a stale snapshot alive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Account id from the token subject.
    pub id: AdminId,
}
