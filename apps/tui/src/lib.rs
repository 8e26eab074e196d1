//! Terminal entry form for daily reservoir reports.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod event;
pub mod observability;
pub mod terminal;
pub mod ui;
