//! CLI tests module

#[cfg(feature = "cli")]
pub mod export_tests;
