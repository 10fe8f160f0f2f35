pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod net_worth;
pub mod ops;
pub mod provider;
pub mod resolve;
pub mod types;
