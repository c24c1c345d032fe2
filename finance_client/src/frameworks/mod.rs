// Frameworks layer: configuration and process startup.

pub mod bootstrap;
pub mod config;
