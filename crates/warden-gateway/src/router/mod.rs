//! Route table implementations.

mod glob;

pub use glob::GlobRouter;
