pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod rooms;
pub mod security;
pub mod state;
pub mod video;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
