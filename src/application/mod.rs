// Application layer - Status feed use cases and the ports they depend on
pub mod status_source;
pub mod status_updater;
pub mod status_view;
