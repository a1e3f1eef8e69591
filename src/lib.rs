pub mod aggregators;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod location;
pub mod output;
pub mod record;
