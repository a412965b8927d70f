pub mod base;
pub mod mem;
pub mod sim;
pub mod ui;
pub mod workload;

#[cfg(test)]
mod unit_tests;
