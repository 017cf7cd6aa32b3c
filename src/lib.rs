//! Hourly Steps library
//!
//! This module exposes the core functionality for use in tests
//! and as a library.

pub mod complication;
pub mod core;
pub mod db;
pub mod i18n;
pub mod sensor;
pub mod service;
pub mod store;
pub mod tracker;
