//! Handler configuration.
//!
//! Holds the callback delays suggested to the caller and the per-stage keys
//! written into the continuation blob. Everything has a default, so an empty
//! or missing configuration file yields a working handler.

pub mod handler_config;
pub mod loader;


pub use handler_config::{CallbackSettings, HandlerConfig, StageKeys, WaitKeys};
pub use loader::{load_handler_config, CONFIG_PATH_ENV, LONG_CALLBACK_ENV, SHORT_CALLBACK_ENV};
