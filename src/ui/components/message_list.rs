//! Message list component
//!
//! Displays the transcript, oldest first, and follows new entries.

use crate::messages::{ConversationLog, TranscriptEntry};
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText};

pub struct MessageList<'a> {
    log: &'a ConversationLog,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(log: &'a ConversationLog, theme: &'a Theme) -> Self {
        Self { log, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let entries = self.log.entries();
        let scroll_to_bottom = self.log.take_scroll_request();

        egui::ScrollArea::vertical()
            .id_salt("transcript")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);

                if entries.is_empty() {
                    self.show_empty_state(ui);
                } else {
                    for entry in &entries {
                        self.show_entry(ui, entry);
                        ui.add_space(self.theme.spacing_sm);
                    }
                }

                if scroll_to_bottom {
                    ui.scroll_to_cursor(Some(Align::BOTTOM));
                }
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.label(
                RichText::new("Type something or load a PDF to hear it read aloud.")
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_entry(&self, ui: &mut egui::Ui, entry: &TranscriptEntry) {
        let is_user = entry.is_user();
        let (fill, text_color) = if is_user {
            (self.theme.user_bubble, Color32::WHITE)
        } else {
            (self.theme.bot_bubble, self.theme.text_primary)
        };
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(entry.sender().display_name())
                    .size(11.0)
                    .color(self.theme.text_muted),
            );

            let max_width = ui.available_width() * 0.75;
            egui::Frame::none()
                .fill(fill)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.label(RichText::new(entry.text()).color(text_color));
                });

            ui.label(
                RichText::new(entry.timestamp().format("%H:%M").to_string())
                    .size(10.0)
                    .color(self.theme.text_muted),
            );
        });
    }
}
