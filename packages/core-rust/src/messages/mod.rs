//! Request and response payloads exchanged on each route.
//!
//! Field names are `snake_case` on the wire. Request structs mark optional
//! fields with `#[serde(default)]` so callers may omit them.

pub mod accounts;
pub mod assets;
pub mod chain;
pub mod feeds;
pub mod keys;
pub mod tokens;
pub mod transactions;

pub use accounts::*;
pub use assets::*;
pub use chain::*;
pub use feeds::*;
pub use keys::*;
pub use tokens::*;
pub use transactions::*;
