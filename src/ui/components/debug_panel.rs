//! Debug panel component

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, ScrollArea};

pub struct DebugPanel<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> DebugPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Debug").strong().color(self.theme.text_primary));
        ui.separator();

        egui::Grid::new("debug_stats")
            .num_columns(2)
            .spacing([16.0, 4.0])
            .show(ui, |ui| {
                self.stat_row(ui, "Transcript", &self.state.log.len().to_string());
                self.stat_row(ui, "Voices", &self.state.speech.list_voices().len().to_string());
                self.stat_row(
                    ui,
                    "Speaking",
                    if self.state.speech.is_speaking() { "yes" } else { "no" },
                );
                self.stat_row(ui, "Document", &format!("{:?}", self.state.ingest.state()));
                self.stat_row(
                    ui,
                    "Extracted",
                    &format!("{} chars", self.state.ingest.extracted_text().chars().count()),
                );
            });

        ui.separator();

        ScrollArea::vertical()
            .id_salt("debug_log")
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in &self.state.debug_info.log_messages {
                    ui.label(
                        RichText::new(line)
                            .small()
                            .family(egui::FontFamily::Monospace)
                            .color(self.theme.text_muted),
                    );
                }
            });
    }

    fn stat_row(&self, ui: &mut egui::Ui, label: &str, value: &str) {
        ui.label(RichText::new(label).color(self.theme.text_secondary));
        ui.label(
            RichText::new(value)
                .family(egui::FontFamily::Monospace)
                .color(self.theme.text_primary),
        );
        ui.end_row();
    }
}
