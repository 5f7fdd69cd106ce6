//! # gotext-sync
//!
//! Reconciles source catalogs with existing translations: merges by message
//! id, asks a [`Translator`](gotext_core::traits::Translator) for whatever is
//! missing, and writes the result back.

pub mod locales;
pub mod reconcile;

#[cfg(test)]
mod testing;

pub use locales::{sync_locales, BatchReport};
pub use reconcile::{reconcile, sync_file, FileReport, Reconciled, SyncRequest};
