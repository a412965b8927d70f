pub mod config;
pub mod error;
pub mod run;
pub mod strategy;
pub mod top;
