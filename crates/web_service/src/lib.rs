pub mod config;
pub mod controllers;
pub mod error;
pub mod server;
pub mod services;
pub mod views;

pub use config::ServerConfig;
pub use server::{app_config, run, AppState};
