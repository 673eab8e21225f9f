//! User interface built on egui/eframe

pub mod app;
pub mod components;
pub mod state;
pub mod theme;

pub use app::LecternApp;
pub use state::{AppState, DebugInfo};
pub use theme::Theme;
