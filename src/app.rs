//! Main application state and UI.

use crate::api::ApiClient;
use crate::controller::{QueryController, QueryForm, QueryMode};
use crate::settings::Settings;
use crate::theme;
use eframe::egui::{self, RichText};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Modes offered in the mode selector
const MODE_PRESETS: [&str; 3] = ["dialog", "vector", "graph"];

/// How often to wake while work is outstanding but nothing else repaints.
const PUMP_INTERVAL: Duration = Duration::from_millis(200);

/// Main query application
pub struct QueryApp {
    controller: QueryController,

    // Settings persistence
    settings: Settings,
    settings_dirty: bool,
    last_settings_save: Instant,
}

impl QueryApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let api = ApiClient::new(settings.api_base.clone(), settings.request_timeout());
        tracing::info!("Using API at {}", settings.api_base);

        let form = QueryForm {
            user: settings.user.clone(),
            model: settings.model.clone(),
            mode: settings.mode.clone(),
            max_results: settings.max_results.to_string(),
            use_rag_database: settings.use_rag_database,
            ..QueryForm::default()
        };

        Self {
            controller: QueryController::new(Arc::new(api), settings.poll_interval(), form),
            settings,
            settings_dirty: false,
            last_settings_save: Instant::now(),
        }
    }

    /// Mark settings as needing to be saved
    fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Copy current form state to settings struct
    fn sync_settings_from_ui(&mut self) {
        let form = &self.controller.form;
        self.settings.user = form.user.clone();
        self.settings.model = form.model.clone();
        self.settings.mode = QueryMode::parse(&form.mode).as_str().to_string();
        self.settings.max_results = form.max_results();
        self.settings.use_rag_database = form.use_rag_database;
    }

    /// Save settings if dirty and enough time has passed (debounce)
    fn maybe_save_settings(&mut self) {
        if self.settings_dirty && self.last_settings_save.elapsed().as_secs() >= 2 {
            self.sync_settings_from_ui();
            self.settings.save();
            self.settings_dirty = false;
            self.last_settings_save = Instant::now();
        }
    }

    fn render_query_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Query");
        ui.add_space(10.0);

        let mut changed = false;

        ui.label("Session");
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.controller.form.session).desired_width(260.0));
            if ui.button("↺ New session").clicked() {
                self.controller.reset_session();
            }
        });

        ui.label("User");
        changed |= ui
            .text_edit_singleline(&mut self.controller.form.user)
            .changed();

        ui.label("Model");
        changed |= ui
            .text_edit_singleline(&mut self.controller.form.model)
            .changed();

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.label("Mode:");
            let before = self.controller.form.mode.clone();
            egui::ComboBox::from_id_salt("mode")
                .selected_text(self.controller.form.mode.as_str())
                .show_ui(ui, |ui| {
                    for mode in MODE_PRESETS {
                        ui.selectable_value(&mut self.controller.form.mode, mode.to_string(), mode);
                    }
                });
            changed |= self.controller.form.mode != before;
        });

        let dialog = QueryMode::parse(&self.controller.form.mode) == QueryMode::Dialog;
        if dialog {
            changed |= ui
                .checkbox(&mut self.controller.form.use_rag_database, "Use RAG database")
                .changed();
        } else {
            ui.horizontal(|ui| {
                ui.label("Max results:");
                changed |= ui
                    .add(egui::TextEdit::singleline(&mut self.controller.form.max_results).desired_width(60.0))
                    .changed();
            });
        }

        ui.add_space(5.0);
        ui.add(
            egui::TextEdit::multiline(&mut self.controller.form.query)
                .hint_text("Ask something…")
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );

        ui.horizontal(|ui| {
            if ui.button("Send").clicked() {
                self.controller.send_query();
            }
            if ui.button("Clear").clicked() {
                self.controller.clear_response();
            }
        });

        if self.controller.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.colored_label(theme::accent::ORANGE, "Waiting for response…");
            });
        }
        if self.controller.can_retry() && ui.button("⟳ Retry polling").clicked() {
            self.controller.retry_poll();
        }

        if changed {
            self.mark_settings_dirty();
        }
    }

    fn render_tools(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Summarize sources")
            .default_open(false)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.controller.form.sources)
                        .hint_text("source1,source2"),
                );
                if ui.button("Summarize").clicked() {
                    self.controller.summarize_sources();
                }
                ui.add(
                    egui::TextEdit::multiline(self.controller.text_summary_mut())
                        .desired_rows(6)
                        .desired_width(f32::INFINITY),
                );
            });

        egui::CollapsingHeader::new("Submit link")
            .default_open(false)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.controller.form.link);
                    if ui.button("Submit").clicked() {
                        self.controller.submit_link();
                    }
                });
                if let Some(status) = self.controller.link_status() {
                    ui.colored_label(theme::status_color(status), status);
                }
            });
    }

    fn render_response(&self, ui: &mut egui::Ui) {
        let response = self.controller.response();
        if response.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No responses yet").color(theme::text::MUTED));
            });
            return;
        }

        ui.label(RichText::new(format!("{} responses", response.len())).color(theme::text::MUTED));
        let mut text: &str = response.text();
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.add(
                egui::TextEdit::multiline(&mut text)
                    .font(egui::TextStyle::Monospace)
                    .text_color(theme::text::PRIMARY)
                    .desired_width(f32::INFINITY),
            );
        });
    }
}

impl eframe::App for QueryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.maybe_save_settings();

        // Apply results from background requests and the poll loop
        self.controller.pump();
        if self.controller.is_busy() {
            ctx.request_repaint_after(PUMP_INTERVAL);
        }

        ctx.set_visuals(egui::Visuals::dark());

        egui::SidePanel::left("sidebar")
            .min_width(320.0)
            .frame(egui::Frame::none()
                .fill(theme::bg::PANEL)
                .inner_margin(egui::Margin::same(12.0)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_query_form(ui);
                    ui.add_space(10.0);
                    ui.separator();
                    self.render_tools(ui);
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none()
                .fill(theme::bg::RESPONSE)
                .inner_margin(egui::Margin::same(12.0)))
            .show(ctx, |ui| {
                self.render_response(ui);
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Force save settings on exit
        if self.settings_dirty {
            self.sync_settings_from_ui();
            self.settings.save();
        }
    }
}
