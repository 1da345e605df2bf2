pub mod ai;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;
pub mod stats;
pub mod store;
