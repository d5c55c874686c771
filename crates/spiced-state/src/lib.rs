//! spiced-state — the target group priority table.
//!
//! Listener rules on the shared load balancer need a priority that is unique
//! across every student. Priorities are handed out once per stack name and
//! kept in a JSON object (`{"<stack name>": <priority>}`) that is the only
//! source of truth.
//!
//! # Components
//!
//! - **`table`** — in-memory table and the allocation rule
//! - **`store`** — file-backed store with locking and atomic overwrite

pub mod error;
pub mod store;
pub mod table;

pub use error::{StateError, StateResult};
pub use store::PriorityStore;
pub use table::PriorityTable;
