/// Time and rate primitives.
pub mod core;
/// Error type shared by the whole crate.
pub mod error;
