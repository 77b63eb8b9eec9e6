pub mod audit;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod policy;
pub mod schema;
pub mod state;
pub mod uploads;
