//! Personal library catalog: per-user book collections behind bearer-token auth.

pub mod app;
pub mod auth;
pub mod books;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod state;
pub mod store;
