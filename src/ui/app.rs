//! Main application struct and eframe integration

use crate::ingest::DocumentSource;
use crate::ui::components::{DebugPanel, DocumentPanel, InputBar, MessageList, VoiceControls};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use tokio::runtime::Runtime;
use tracing::info;

pub struct LecternApp {
    state: AppState,
    theme: Theme,
    /// Set while a notice is open; other controls are disabled
    blocked: bool,
    /// Keeps extraction tasks alive for the life of the window
    _runtime: Runtime,
}

impl LecternApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState, runtime: Runtime) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            state,
            theme,
            blocked: false,
            _runtime: runtime,
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(self.theme.bg_secondary).inner_margin(10.0))
            .show(ctx, |ui| {
                if self.blocked {
                    ui.disable();
                }
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Lectern")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new("Read aloud")
                            .size(13.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Debug").on_hover_text("Toggle debug panel").clicked() {
                            self.state.show_debug_panel = !self.state.show_debug_panel;
                        }
                        if ui.button("Clear chat").clicked() {
                            self.state.clear_messages();
                        }
                    });
                });

                ui.add_space(self.theme.spacing_sm);
                VoiceControls::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_input_area(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                if self.blocked {
                    ui.disable();
                }
                DocumentPanel::new(&mut self.state, &self.theme).show(ui);
                ui.add_space(self.theme.spacing_sm);
                InputBar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_debug_panel(&mut self, ctx: &egui::Context) {
        if !self.state.show_debug_panel {
            return;
        }

        SidePanel::right("debug_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                DebugPanel::new(&self.state, &self.theme).show(ui);
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                MessageList::new(&self.state.log, &self.theme).show(ui);
            });
    }

    /// Blocking notice, e.g. no speech support
    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.state.notice.clone() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(notice).color(self.theme.text_primary));
                ui.add_space(self.theme.spacing_sm);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.state.dismiss_notice();
        }
    }

    /// A file dropped on the window counts as a document selection
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        let source = match (file.path, file.bytes) {
            (Some(path), _) => {
                self.state.document_path = path.to_string_lossy().to_string();
                Some(DocumentSource::Path(path))
            }
            (None, Some(bytes)) => Some(DocumentSource::Bytes {
                name: file.name,
                bytes: bytes.to_vec(),
            }),
            (None, None) => None,
        };
        self.state.choose_document(source);
    }
}

impl eframe::App for LecternApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.state.poll_events();

        self.blocked = self.state.notice.is_some();
        self.show_notice(ctx);

        self.show_header(ctx);
        self.show_debug_panel(ctx);
        self.show_input_area(ctx);
        self.show_content(ctx);

        // Keep polling while work is in flight
        if self.state.is_reading_document() || self.state.speech.is_speaking() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.stop_speech();
        info!("Lectern shutting down");
    }
}
