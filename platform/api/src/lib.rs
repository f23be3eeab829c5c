pub mod api;
pub mod config;
pub mod database;
pub mod global;
pub mod pagination;
pub mod service;
pub mod simulation;

#[cfg(test)]
mod tests;
