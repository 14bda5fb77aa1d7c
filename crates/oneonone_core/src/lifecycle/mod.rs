//! Meeting lifecycle rules.
//!
//! # Responsibility
//! - Partition meetings into role x stage buckets (`categorize`).
//! - Decide which actions a viewer may take (`authorize`).
//! - Drive stage transitions triggered by those actions (`transition`).
//!
//! # Invariants
//! - Every function here is pure and synchronous; no I/O, no logging.
//! - Only `transition` can fail, and it fails closed.

pub mod authorize;
pub mod categorize;
pub mod snapshot;
pub mod transition;
