//! Document picker, status line and the "Speak PDF" action

use crate::ingest::{FailureKind, IngestState};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct DocumentPanel<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> DocumentPanel<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let path_edit = egui::TextEdit::singleline(&mut self.state.document_path)
                .hint_text("Path to a PDF, or drop one on the window")
                .desired_width(280.0)
                .id(egui::Id::new("document_path"));
            let response = ui.add(path_edit);
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, true, "Document path")
            });

            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Load PDF").clicked() || submitted {
                self.state.choose_document_path();
            }

            let speak = ui.add_enabled(self.state.ingest.can_speak(), egui::Button::new("Speak PDF"));
            if speak.clicked() {
                self.state.speak_document();
            }

            if self.state.is_reading_document() {
                ui.spinner();
            }
        });

        let status_color = match self.state.ingest.state() {
            IngestState::Idle | IngestState::Reading => self.theme.text_muted,
            IngestState::Ready => self.theme.success,
            IngestState::Failed(FailureKind::NoText) => self.theme.warning,
            IngestState::Failed(FailureKind::ReadError) => self.theme.error,
        };
        ui.label(RichText::new(self.state.ingest.status()).color(status_color));

        if let Some(err) = &self.state.last_error {
            ui.label(RichText::new(err).small().color(self.theme.error));
        }
    }
}
