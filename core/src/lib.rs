pub mod aggregate;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod materialize;
pub mod models;
pub mod service;
