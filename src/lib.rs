// The binary entry point is main.rs; this file re-declares the module tree so
// that integration tests under tests/ can reach the navigation, catalog and
// preference types via `rimba::*`.
#![allow(dead_code)]

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod content;
pub mod event;
pub mod logging;
pub mod media;
pub mod nav;
pub mod preferences;
pub mod store;
pub mod ui;
