// Library exports for the FormFit CLI
// This allows testing of internal modules

pub mod commands;
pub mod config;
pub mod models;
