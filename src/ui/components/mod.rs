//! UI components for Lectern

mod debug_panel;
mod document_panel;
mod input_bar;
mod message_list;
mod voice_controls;

pub use debug_panel::DebugPanel;
pub use document_panel::DocumentPanel;
pub use input_bar::InputBar;
pub use message_list::MessageList;
pub use voice_controls::VoiceControls;
