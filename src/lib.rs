pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod scanner;
pub mod search;
pub mod thumbnail;
pub mod watcher;
