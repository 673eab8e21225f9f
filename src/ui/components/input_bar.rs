//! Input bar component
//!
//! Free-text input with send and stop controls.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    self.show_text_input(ui);
                    self.show_send_button(ui);
                    self.show_stop_button(ui);
                });
            });
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        // Leave room for the two buttons
        let width = (ui.available_width() - 110.0).max(120.0);

        let text_edit = egui::TextEdit::multiline(&mut self.state.input_text)
            .hint_text("Type text to speak...")
            .desired_rows(3)
            .desired_width(width)
            .id(egui::Id::new("message_input"));

        let response = ui.add(text_edit);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Message input")
        });

        // Ctrl+Enter sends; plain Enter is a newline in the multiline box
        if response.has_focus() && ui.input(|i| i.key_pressed(Key::Enter) && i.modifiers.command)
        {
            self.state.send_message();
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send = !self.state.input_text.trim().is_empty();

        let button = egui::Button::new(RichText::new("Send").color(egui::Color32::WHITE))
            .min_size(Vec2::new(44.0, 36.0))
            .rounding(self.theme.button_rounding)
            .fill(if can_send {
                self.theme.primary
            } else {
                self.theme.text_muted
            });

        let response = ui.add_enabled(can_send, button);
        if response.clicked() {
            self.state.send_message();
        }
        response.on_hover_text("Speak this text (Ctrl+Enter)");
    }

    fn show_stop_button(&mut self, ui: &mut egui::Ui) {
        let button = egui::Button::new("Stop")
            .min_size(Vec2::new(44.0, 36.0))
            .rounding(self.theme.button_rounding);

        if ui.add(button).on_hover_text("Stop speaking").clicked() {
            self.state.stop_speech();
        }
    }
}
