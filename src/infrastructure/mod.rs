// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod probe_api;
pub mod tracing_view;
