pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod session;
pub mod state;
pub mod timer;
