//! Typed source configuration.
//!
//! [`settings::Settings`] holds the values, [`property`] describes the enumerated set of
//! settable fields and converts name/value pairs at the boundary.

/// Property names, typed assignments and declared metadata.
pub mod property;
/// The settings structure and its defaults.
pub mod settings;
