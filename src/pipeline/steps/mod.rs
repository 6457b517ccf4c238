//! The pipeline steps, in execution order. Each step is independently
//! invocable; the only state carried between them is the [`HandoffRecord`].
//!
//! [`HandoffRecord`]: crate::types::HandoffRecord

pub mod extract;
pub mod load;
pub mod relocate;
pub mod transform;

pub use extract::extract;
pub use load::load;
pub use relocate::relocate;
pub use transform::transform;
