//! Node-side stores owned by the RPC server.
//!
//! Only access tokens live here; everything else the routes touch belongs
//! to collaborators outside this crate.

pub mod access_tokens;

pub use access_tokens::MemoryTokenStore;
