pub mod adapters;
pub mod backends;
pub mod banner;
pub mod commands;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod memory;
pub mod scheduler;
