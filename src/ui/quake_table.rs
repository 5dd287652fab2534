use crate::model::Quake;
use crate::ui::theme;
use egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

/// Render the list of quakes that pass the current filter.
pub fn show_quake_table(quakes: &[&Quake], ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Earthquakes")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", quakes.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    if quakes.is_empty() {
        ui.add_space(12.0);
        ui.label(
            RichText::new("No earthquakes in the selected window")
                .italics()
                .color(theme::TEXT_DIM),
        );
        return;
    }

    let header = |text: &str| RichText::new(text).size(9.0).color(theme::TEXT_DIM).strong();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::exact(14.0))
        .column(Column::initial(140.0).at_least(110.0))
        .column(Column::initial(50.0))
        .column(Column::initial(70.0))
        .column(Column::initial(70.0))
        .column(Column::remainder())
        .header(18.0, |mut row| {
            row.col(|_| {});
            row.col(|ui| {
                ui.label(header("TIME"));
            });
            row.col(|ui| {
                ui.label(header("MW"));
            });
            row.col(|ui| {
                ui.label(header("LAT"));
            });
            row.col(|ui| {
                ui.label(header("LON"));
            });
            row.col(|ui| {
                ui.label(header("DEPTH"));
            });
        })
        .body(|body| {
            body.rows(theme::ROW_HEIGHT, quakes.len(), |mut row| {
                let quake = quakes[row.index()];
                row.col(|ui| {
                    let (dot, _) = ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(dot.center(), 4.0, theme::magnitude_color(quake.magnitude));
                });
                row.col(|ui| {
                    ui.label(quake.time.format("%Y-%m-%d %H:%M").to_string());
                });
                row.col(|ui| {
                    ui.label(RichText::new(format!("{:.1}", quake.magnitude)).strong());
                });
                row.col(|ui| {
                    ui.label(format!("{:.3}", quake.latitude));
                });
                row.col(|ui| {
                    ui.label(format!("{:.3}", quake.longitude));
                });
                row.col(|ui| {
                    ui.label(
                        RichText::new(format!("{:.1} km", quake.depth)).color(theme::TEXT_SECONDARY),
                    );
                });
            });
        });
}
