//! UI automation tests using egui_kittest and AccessKit
//!
//! The real components are rendered against an `AppState` backed by
//! in-memory speech and document hosts, then driven through the
//! accessibility tree.

use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use lectern::document::MemoryDocumentParser;
use lectern::ingest::DocumentSource;
use lectern::integration::AppConfig;
use lectern::speech::{MemorySpeechHost, SpeechHost, SpeechOutput, VoiceDescriptor};
use lectern::ui::components::{DocumentPanel, InputBar, MessageList, VoiceControls};
use lectern::ui::{AppState, Theme};
use std::sync::Arc;
use std::time::Duration;

struct TestApp {
    state: AppState,
    theme: Theme,
    host: Arc<MemorySpeechHost>,
    _runtime: tokio::runtime::Runtime,
}

impl TestApp {
    fn new() -> Self {
        Self::with_parser(MemoryDocumentParser::new())
    }

    fn with_parser(parser: MemoryDocumentParser) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let host = Arc::new(MemorySpeechHost::with_voices(vec![
            VoiceDescriptor::new("Amy", "en-US").as_default(),
            VoiceDescriptor::new("Ryan", "en-GB"),
        ]));
        let speech = Arc::new(SpeechOutput::new(Some(
            host.clone() as Arc<dyn SpeechHost>
        )));
        let state = AppState::new(
            &AppConfig::default(),
            speech,
            Arc::new(parser),
            runtime.handle().clone(),
        );

        Self {
            state,
            theme: Theme::dark(),
            host,
            _runtime: runtime,
        }
    }
}

fn render(app: &mut TestApp, ui: &mut egui::Ui) {
    app.state.poll_events();
    VoiceControls::new(&mut app.state, &app.theme).show(ui);
    ui.separator();
    egui::ScrollArea::vertical()
        .id_salt("test_messages")
        .max_height(250.0)
        .show(ui, |ui| {
            MessageList::new(&app.state.log, &app.theme).show(ui);
        });
    ui.separator();
    DocumentPanel::new(&mut app.state, &app.theme).show(ui);
    InputBar::new(&mut app.state, &app.theme).show(ui);
}

fn harness(app: TestApp) -> Harness<'static, TestApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(720.0, 640.0))
        .build_state(
            |ctx, app: &mut TestApp| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    render(app, ui);
                });
            },
            app,
        )
}

#[test]
fn test_controls_are_accessible() {
    let mut harness = harness(TestApp::new());
    harness.run();

    let _input = harness.get_by_label("Message input");
    let _send = harness.get_by_label("Send");
    let _stop = harness.get_by_label("Stop");
    let _path = harness.get_by_label("Document path");
    let _load = harness.get_by_label("Load PDF");
    let _status = harness.get_by_label("No PDF loaded.");
}

#[test]
fn test_rate_and_pitch_values_are_echoed() {
    let mut app = TestApp::new();
    app.state.rate = 0.8;
    app.state.pitch = 1.3;

    let mut harness = harness(app);
    harness.run();
    let _rate = harness.get_by_label("0.8");
    let _pitch = harness.get_by_label("1.3");

    harness.state_mut().state.rate = 1.5;
    harness.run();
    let _rate = harness.get_by_label("1.5");
    assert!(harness.query_by_label("0.8").is_none());

    // The echoed values are what the next utterance uses
    harness.state_mut().state.input_text = "Faster".into();
    harness.state_mut().state.send_message();
    let active = harness.state().host.active().unwrap();
    assert!((active.rate - 1.5).abs() < f32::EPSILON);
    assert!((active.pitch - 1.3).abs() < f32::EPSILON);
}

#[test]
fn test_speak_pdf_disabled_without_document() {
    let mut harness = harness(TestApp::new());
    harness.run();

    assert!(harness.get_by_label("Speak PDF").is_disabled());
}

#[test]
fn test_type_and_send_speaks_text() {
    let mut harness = harness(TestApp::new());
    harness.run();

    harness.get_by_label("Message input").focus();
    harness.run();
    harness.get_by_label("Message input").type_text("Hello there");
    harness.run();
    assert_eq!(harness.state().state.input_text, "Hello there");

    harness.get_by_label("Send").click();
    harness.run();

    let entries = harness.state().state.log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text(), "Hello there");
    assert_eq!(entries[1].text(), "Speaking your text now.");

    let active = harness.state().host.active().unwrap();
    assert_eq!(active.text, "Hello there");
    assert_eq!(active.voice.map(|v| v.name), Some("Amy".to_string()));

    let _bot = harness.get_by_label("Speaking your text now.");
}

#[test]
fn test_stop_cancels_speech() {
    let mut app = TestApp::new();
    app.state.input_text = "Long passage".into();
    app.state.send_message();
    let host = app.host.clone();
    assert!(host.active().is_some());

    let mut harness = harness(app);
    harness.run();
    harness.get_by_label("Stop").click();
    harness.run();

    assert!(host.active().is_none());
}

#[test]
fn test_loaded_document_enables_speak_pdf() {
    let parser = MemoryDocumentParser::new()
        .with_document(b"doc", vec![vec!["Once", "upon"], vec!["a time"]]);
    let mut app = TestApp::with_parser(parser);
    app.state.choose_document(Some(DocumentSource::Bytes {
        name: "story.pdf".into(),
        bytes: b"doc".to_vec(),
    }));

    let mut harness = harness(app);
    for _ in 0..100 {
        harness.run();
        if harness.state().state.ingest.can_speak() {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(harness.state().state.ingest.can_speak());
    assert_eq!(harness.state().state.input_text, "Once upon\n\na time");
    let _loaded = harness.get_by_label("PDF loaded: story.pdf. Ready to speak.");

    harness.get_by_label("Speak PDF").click();
    harness.run();

    let active = harness.state().host.active().unwrap();
    assert_eq!(active.text, "Once upon\n\na time");
    let last = harness.state().state.log.last().unwrap();
    assert_eq!(last.text(), "Reading text from the uploaded PDF.");
}
