pub mod config;
pub mod models;
pub mod payments;
pub mod store;
