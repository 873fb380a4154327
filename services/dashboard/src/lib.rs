pub mod adapters;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod notify;
pub mod stores;

#[cfg(test)]
mod testing;
