pub mod api;
pub mod config;
pub mod models;
pub mod persisters;
pub mod services;
