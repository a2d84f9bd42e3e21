//! Library components for the catch-up immunization CLI.

pub mod logging;
pub mod summary;
