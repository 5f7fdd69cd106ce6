//! # gotext-core
//!
//! Core types, traits, configuration, and error handling for gotext-translate.

pub mod catalog;
pub mod config;
pub mod error;
pub mod traits;
