#![forbid(unsafe_code)]

//! Chart option model and reconciliation for ECharts embeds (headless).
//!
//! The browser-side reconciler shipped by `selkie-render` merges each chart's option with the
//! site defaults on every paint. This crate holds the same algorithm in Rust:
//! - [`ChartConfig`]: schema-less option tree with `series` / `darkMode` accessors
//! - [`reconcile`]: dark-mode folding, per-series default injection, final merge
//! - [`mount`]: embed lifecycle (initial pass, resize / theme triggers, disposal)

pub mod config;
pub mod error;
pub mod mount;
pub mod reconcile;

pub use config::ChartConfig;
pub use error::{Error, Result};
pub use mount::{Ambient, ChartDefinition, ChartRuntime, EmbedInstance, Host, MountState, Trigger};
pub use reconcile::{apply_defaults, effective_defaults, merge_value};

#[cfg(test)]
mod tests;
