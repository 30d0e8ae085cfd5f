//! Referral and donation directory: the actix-web service over MongoDB and
//! the client used by the `refrel` terminal front end.

pub mod api;
pub mod client;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;
