pub mod aggregate;
pub mod config;
pub mod models;
pub mod scrapers;
