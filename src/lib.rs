//! Bookmark manager: a client for a personal bookmark REST service.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod config;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;
pub mod ui;
