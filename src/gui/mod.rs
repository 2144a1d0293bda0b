// GUI module organization and public exports

// Main application state and UI logic
mod app;
// Reusable UI components (stat cards, status colors)
mod components;

// Export AppState for use in main.rs
pub use app::AppState;
// Export all component functions
pub use components::*;
