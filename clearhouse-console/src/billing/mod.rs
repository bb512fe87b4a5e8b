//! Batch billing workflow
//!
//! Draft line items accumulate in a session-local queue; one
//! batch-level discount is distributed proportionally at commit time.

pub mod allocate;
pub mod queue;

pub use allocate::{DiscountShare, allocate_discount};
pub use queue::{BatchQueue, Draft};
