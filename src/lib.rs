pub mod cli;
pub mod config;
pub mod dispatch;
pub mod elevator;
pub mod error;
pub mod fleet;
pub mod models;
pub mod output;
pub mod request;
pub mod simulation;
pub mod source;
