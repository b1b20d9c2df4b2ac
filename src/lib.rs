pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod docs;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod uploads;
pub mod validation;

pub use app::app;
pub use state::AppState;
