// Probe status dashboard client - live charts and a pan/zoom viewport
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;
