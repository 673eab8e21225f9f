//! Voice selector plus rate and pitch sliders with live value labels

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText};

pub struct VoiceControls<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> VoiceControls<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let catalog = self.state.speech.list_voices();
        let options = catalog.options();

        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("Voice").color(self.theme.text_secondary));

            let selected_label = options
                .iter()
                .find(|o| o.index == self.state.selected_voice)
                .or_else(|| options.first())
                .map(|o| o.label.clone())
                .unwrap_or_default();

            egui::ComboBox::from_id_salt("voice_select")
                .selected_text(selected_label)
                .width(220.0)
                .show_ui(ui, |ui| {
                    for option in &options {
                        ui.selectable_value(
                            &mut self.state.selected_voice,
                            option.index,
                            option.label.as_str(),
                        );
                    }
                });

            ui.add_space(self.theme.spacing);

            ui.label(RichText::new("Rate").color(self.theme.text_secondary));
            ui.add(
                egui::Slider::new(&mut self.state.rate, self.state.rate_range.clone())
                    .step_by(0.1)
                    .show_value(false),
            );
            ui.label(
                RichText::new(format!("{:.1}", self.state.rate))
                    .monospace()
                    .color(self.theme.text_primary),
            );

            ui.add_space(self.theme.spacing);

            ui.label(RichText::new("Pitch").color(self.theme.text_secondary));
            ui.add(
                egui::Slider::new(&mut self.state.pitch, self.state.pitch_range.clone())
                    .step_by(0.1)
                    .show_value(false),
            );
            ui.label(
                RichText::new(format!("{:.1}", self.state.pitch))
                    .monospace()
                    .color(self.theme.text_primary),
            );
        });
    }
}
