//! # Infrastructure Layer
//!
//! Adapters for the engine's ports plus runtime settings and logging.
//!
//! - [`config_source`]: config service fetch and shared pricing context
//! - [`change_sink`]: change record delivery
//! - [`settings`]: layered engine settings
//! - [`logging`]: tracing subscriber setup

pub mod change_sink;
pub mod config_source;
pub mod logging;
pub mod settings;
