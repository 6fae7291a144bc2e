use crate::app::MediaFeedApp;
use crate::library::MediaFilter;
use crate::player::MediaBackend;
use eframe::egui;

pub fn render_loading(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 2.0 - 30.0);
        ui.spinner();
        ui.add_space(8.0);
        ui.label(egui::RichText::new("Loading media…").color(egui::Color32::WHITE));
    });
}

/// Shown when the active filter matches nothing.
pub fn render_empty_state<B: MediaBackend>(app: &mut MediaFeedApp<B>, ui: &mut egui::Ui) {
    let mut show_all = false;
    let mut choose_folder = false;

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 2.0 - 80.0);
        ui.label(egui::RichText::new("📂").size(48.0));
        ui.add_space(8.0);
        ui.label(egui::RichText::new(app.filter.empty_message()).size(20.0).color(egui::Color32::WHITE));
        ui.label(egui::RichText::new("Add media to a folder or pick another one").color(egui::Color32::GRAY));
        ui.add_space(16.0);

        if app.filter != MediaFilter::All && ui.button("Show all media").clicked() {
            show_all = true;
        }
        if ui.button("📁 Choose folder…").clicked() {
            choose_folder = true;
        }
    });

    if show_all {
        app.set_filter(MediaFilter::All);
    } else if choose_folder {
        app.choose_folder();
    }
}
