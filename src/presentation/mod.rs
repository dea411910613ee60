// Presentation layer - Input handling for interactive views
pub mod viewport_controller;
