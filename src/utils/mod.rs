/// Layered configuration (defaults, TOML file, environment, flags).
pub mod config;
