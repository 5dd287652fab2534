use std::path::PathBuf;
use std::sync::mpsc;

use crate::config::AppSettings;
use crate::model::quake::{self, MIN_MAGNITUDE};
use crate::model::{Quake, QuakeFilter, SelectedRange, TimeWindowControl};
use crate::ui;

/// Main application state.
pub struct QuakeApp {
    pub settings: AppSettings,
    pub time_window: TimeWindowControl,
    /// Ranges emitted by the time window, drained once per frame.
    ranges: mpsc::Receiver<SelectedRange>,
    pub filter: QuakeFilter,
    pub quakes: Vec<Quake>,
    pub file_path: Option<PathBuf>,

    pub show_about: bool,
    pub show_csv_help: bool,

    pub status_message: String,
}

impl QuakeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let (tx, ranges) = mpsc::channel();
        let time_window = TimeWindowControl::new(
            settings.quiet_period(),
            Box::new(move |range| {
                if tx.send(range).is_err() {
                    log::warn!("range receiver dropped; {:?} not applied", range.args());
                }
            }),
        );
        let filter = QuakeFilter::new(time_window.bounds(), settings.default_min_magnitude);

        let mut app = Self {
            settings,
            time_window,
            ranges,
            filter,
            quakes: Vec::new(),
            file_path: None,
            show_about: false,
            show_csv_help: false,
            status_message: "Ready".to_string(),
        };

        match app.settings.last_events_file.clone() {
            Some(path) => app.load_catalogue(path),
            None => app.use_sample_data(),
        }
        app.apply_pending_ranges();
        app
    }

    fn apply_pending_ranges(&mut self) {
        while let Ok(range) = self.ranges.try_recv() {
            self.filter.range = range;
        }
    }

    // --- Catalogue operations ---

    pub fn use_sample_data(&mut self) {
        let mut quakes = quake::sample_catalogue(self.time_window.bounds());
        quakes.reverse();
        self.quakes = quakes;
        self.file_path = None;
        self.clamp_magnitude_filter();
        self.status_message = format!("Loaded {} sample quakes", self.quakes.len());
    }

    pub fn open_catalogue(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Catalogue", &["json", "csv", "txt", "tsv"])
            .pick_file()
        {
            self.load_catalogue(path);
            self.settings.last_events_file = self.file_path.clone();
            if let Err(e) = self.settings.save() {
                log::warn!("failed to save settings: {e}");
            }
        }
    }

    fn load_catalogue(&mut self, path: PathBuf) {
        match crate::io::load_quakes(&path) {
            Ok((quakes, skipped)) => {
                self.quakes = quakes;
                self.file_path = Some(path);
                self.clamp_magnitude_filter();
                self.status_message = if skipped > 0 {
                    format!("Loaded {} quakes ({} rows skipped)", self.quakes.len(), skipped)
                } else {
                    format!("Loaded {} quakes", self.quakes.len())
                };
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                self.status_message = format!("Error loading: {}", e);
                if self.quakes.is_empty() {
                    self.use_sample_data();
                }
            }
        }
    }

    pub fn export_visible_csv(&mut self) {
        let visible = self.filter.apply(&self.quakes);
        if visible.is_empty() {
            self.status_message = "Nothing to export: no quakes in the window".to_string();
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name("quakes.csv")
            .save_file()
        {
            self.status_message = match crate::io::csv_export::export_csv(&visible, &path) {
                Ok(count) => format!("Exported {} quakes to CSV", count),
                Err(e) => format!("CSV export failed: {}", e),
            };
        }
    }

    pub fn export_visible_json(&mut self) {
        let visible = self.filter.apply(&self.quakes);
        if visible.is_empty() {
            self.status_message = "Nothing to export: no quakes in the window".to_string();
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("quakes.json")
            .save_file()
        {
            self.status_message = match crate::io::file::save_json(&visible, &path) {
                Ok(()) => format!("Exported {} quakes to JSON", visible.len()),
                Err(e) => format!("JSON export failed: {}", e),
            };
        }
    }

    pub fn open_settings_folder(&mut self) {
        let dir = match AppSettings::config_dir() {
            Ok(dir) => dir,
            Err(e) => {
                self.status_message = e.to_string();
                return;
            }
        };
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| open::that(&dir)) {
            self.status_message = format!("Could not open {}: {}", dir.display(), e);
        }
    }

    fn clamp_magnitude_filter(&mut self) {
        let max = quake::max_magnitude(&self.quakes);
        self.filter.min_magnitude = self.filter.min_magnitude.clamp(MIN_MAGNITUDE, max);
    }
}

impl eframe::App for QuakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Time window track
        egui::TopBottomPanel::top("time_window")
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(16.0, 10.0)),
            )
            .show(ctx, |ui| {
                ui::time_window_slider::show_time_window_slider(&mut self.time_window, ui);
            });

        // Ranges emitted while the track was handled above apply this frame.
        self.apply_pending_ranges();
        let visible = self.filter.apply(&self.quakes);

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_STATUS)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_sub())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Showing {} of {}",
                                visible.len(),
                                self.quakes.len()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(egui::RichText::new(" · ").size(10.5).color(ui::theme::TEXT_DIM));
                        ui.label(
                            egui::RichText::new(format!(
                                "Zoom: {:.0}%",
                                self.time_window.state().zoom() * 100.0
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: magnitude threshold and summary
        let max_magnitude = quake::max_magnitude(&self.quakes);
        egui::SidePanel::left("filter_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.label(egui::RichText::new("Magnitude").strong().size(14.0));
                ui.add(
                    egui::Slider::new(&mut self.filter.min_magnitude, MIN_MAGNITUDE..=max_magnitude)
                        .step_by(0.1)
                        .text("Mw ≥"),
                );
                ui.add_space(8.0);
                ui.separator();
                ui.label(egui::RichText::new("Selected range").strong().size(14.0));
                let args = self.filter.range.args();
                let precision = if self.filter.range.is_day_precision() {
                    "day"
                } else {
                    "month"
                };
                ui.label(
                    egui::RichText::new(format!("{args:?} ({precision} precision)"))
                        .monospace()
                        .color(ui::theme::TEXT_SECONDARY),
                );
                if let Some(strongest) = visible
                    .iter()
                    .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
                {
                    ui.add_space(8.0);
                    ui.label(egui::RichText::new("Strongest").strong().size(14.0));
                    ui.label(format!(
                        "Mw {:.1} on {}",
                        strongest.magnitude,
                        strongest.time.format("%-d %b %Y %H:%M")
                    ));
                }
            });

        // Central panel: filtered quake list
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::quake_table::show_quake_table(&visible, ui);
        });

        // Dialogs
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.show_csv_help {
            ui::dialogs::show_csv_help_dialog(self, ctx);
        }
    }
}
