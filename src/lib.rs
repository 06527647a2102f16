pub mod cli;
pub mod config;
pub mod dump;
pub mod loader;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod paginator;
pub mod settings;
pub mod ui;
