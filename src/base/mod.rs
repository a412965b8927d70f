pub mod port;
pub mod units;
