// Presentation layer - HTTP handlers and dashboard boards
pub mod app_state;
pub mod boards;
pub mod handlers;
pub mod inputs;
