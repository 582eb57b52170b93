pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod datetime;
pub mod filter;
pub mod kv;
pub mod store;
pub mod task;
