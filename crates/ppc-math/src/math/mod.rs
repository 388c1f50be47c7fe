//! Core math modules.

pub mod histogram;
pub mod regression;
pub mod summary;
