pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use db::{Storage, create_pool};
pub use error::ServiceError;
