// Domain layer - Samples, series buffers and viewport geometry
pub mod format;
pub mod rate;
pub mod sample;
pub mod series;
pub mod telemetry;
pub mod viewport;
