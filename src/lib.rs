pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod database;
pub mod dependencies;
pub mod domain;
pub mod services;
