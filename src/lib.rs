// Main library entry point for Callatlas.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;
