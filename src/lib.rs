pub mod configuration;
pub mod domain;
pub mod log_sink;
pub mod retention;
pub mod startup;
pub mod store;
pub mod telemetry;
