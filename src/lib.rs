pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod grant;
pub mod handlers;
pub mod listing;
pub mod middleware;
pub mod resources;
pub mod server;
