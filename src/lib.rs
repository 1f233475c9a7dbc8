pub mod adapter;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod registry;
pub mod shutdown;
