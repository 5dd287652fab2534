use crate::app::QuakeApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut QuakeApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  Open Catalogue...", icons::FOLDER_OPEN)).clicked() {
                app.open_catalogue();
                ui.close_menu();
            }
            if ui.button(format!("{}  Use Sample Data", icons::FLASK)).clicked() {
                app.use_sample_data();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Export Visible as CSV...", icons::EXPORT)).clicked() {
                app.export_visible_csv();
                ui.close_menu();
            }
            if ui.button(format!("{}  Export Visible as JSON...", icons::FILE_ARROW_DOWN)).clicked() {
                app.export_visible_json();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Open Settings Folder", icons::GEAR)).clicked() {
                app.open_settings_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("CSV Import Format").clicked() {
                app.show_csv_help = true;
                ui.close_menu();
            }
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        // Right-aligned catalogue name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let source = app
                .file_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Sample data".to_string());
            ui.label(RichText::new(source).size(11.0).weak());
        });
    });
}
