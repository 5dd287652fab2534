use crate::app::QuakeApp;
use crate::model::timeline::EPOCH;
use crate::ui::theme;
use egui::{Context, RichText, Window};

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut QuakeApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([340.0, 220.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Quake Time Window").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Browse an earthquake catalogue by day, month or year.");
                ui.label(format!(
                    "Covers {} to {}.",
                    EPOCH.format("%-d %B %Y"),
                    app.time_window.bounds().now.format("%-d %B %Y")
                ));
                ui.add_space(6.0);
                ui.label(
                    RichText::new("Scroll over the track to zoom, drag it to pan.")
                        .color(theme::TEXT_DIM),
                );
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}

/// Render the "CSV Import Format" help dialog.
pub fn show_csv_help_dialog(app: &mut QuakeApp, ctx: &Context) {
    let mut should_close = false;

    Window::new(RichText::new("CSV Import Format").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([520.0, 380.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                ui.label(RichText::new("Columns").strong());
                ui.add_space(2.0);
                egui::Grid::new("csv_columns")
                    .num_columns(2)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Timestamp").strong());
                        ui.label("Date-time, Date, Time, Timestamp, Origin Time (required)");
                        ui.end_row();

                        ui.label(RichText::new("Magnitude").strong());
                        ui.label("Mw_mean, Mw, Magnitude, Mag, ML (required)");
                        ui.end_row();

                        ui.label(RichText::new("Latitude").strong());
                        ui.label("Latitude, Lat");
                        ui.end_row();

                        ui.label(RichText::new("Longitude").strong());
                        ui.label("Longitude, Lon, Lng, Long");
                        ui.end_row();

                        ui.label(RichText::new("Depth").strong());
                        ui.label("Depth, Depth (km)");
                        ui.end_row();
                    });
                ui.add_space(8.0);

                ui.label(RichText::new("Notes").strong());
                ui.add_space(2.0);
                for note in [
                    "• Comma, semicolon and tab delimiters are detected from the header line.",
                    "• Header matching ignores case, spaces, hyphens, underscores and brackets.",
                    "• Decimal commas are accepted in numeric columns.",
                    "• Rows without a valid timestamp or magnitude are skipped.",
                ] {
                    ui.label(RichText::new(note).small());
                }
                ui.add_space(8.0);

                ui.label(RichText::new("Example").strong());
                ui.add_space(2.0);
                let example = "Date-time,Latitude,Longitude,Depth,Mw_mean\n\
                               2024-01-14 07:57:00,63.8712,-22.4421,3.4,4.9";
                egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut example.to_string())
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .interactive(false),
                    );
                });
            });

            ui.separator();
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_csv_help = false;
    }
}
