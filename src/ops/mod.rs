//! Transformations over bit strings.

pub mod bitwise;
pub mod operation;

pub use operation::{Operation, apply_all};
