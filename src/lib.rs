// Library target for integration tests under tests/.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests can drive `App` with in-memory stores and stub story sources.
#![allow(dead_code)]

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod generator;
pub mod session;
pub mod store;
pub mod ui;
