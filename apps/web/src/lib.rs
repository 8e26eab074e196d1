//! Live reservoir map dashboard.
//!
//! The modules here are platform independent and tested natively; the wasm
//! wiring (fetch, WebSocket, DOM backend) lives in the binary.

pub mod animation;
pub mod boundary;
pub mod camera;
pub mod catchup;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod geo;
pub mod marker;
pub mod reconcile;
pub mod store;
pub mod telemetry;
pub mod view;
