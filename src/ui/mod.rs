// UI module - egui overlay drawn on top of the game

mod stats;
mod ui;

// Re-export the public interface
pub use ui::{UIState, draw_ui, process_egui};
