//! # slopes-core
//!
//! Session layer for the Slopes machine. Owns the engine state, drives the pure
//! reducer from slopes-types, and runs the side effects around it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use slopes_core::config::Config;
//! use slopes_core::effects::EffectTriggers;
//! use slopes_core::persistence::JsonFileStore;
//! use slopes_core::analytics::LogSink;
//! use slopes_core::store::Store;
//! use slopes_types::{Action, Dispatcher};
//!
//! let config = Config::load();
//! let params = Arc::new(JsonFileStore::new(config.storage_path()));
//! let effects = EffectTriggers::from_config(&config, params.clone(), Arc::new(LogSink));
//! let mut store = Store::open(config.coalesce_window(), None, params.as_ref(), effects);
//!
//! let model = store.dispatch(&Action::Shuffle)?;
//! ```
//!
//! ## Module Overview
//!
//! - [`store`]: `Store`, the single writer; implements `Dispatcher`
//! - [`config`]: TOML configuration (embedded defaults + user override)
//! - [`persistence`]: `ParameterStore` and its JSON file implementation
//! - [`analytics`]: event shapes and sinks
//! - [`effects`]: debounced persistence and analytics triggers

pub mod analytics;
pub mod config;
pub mod effects;
pub mod persistence;
pub mod store;

pub use store::Store;
