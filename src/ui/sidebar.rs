use crate::app::MediaFeedApp;
use crate::library::MediaFilter;
use crate::player::MediaBackend;
use eframe::egui;

pub fn render_sidebar<B: MediaBackend>(app: &mut MediaFeedApp<B>, ctx: &egui::Context) {
    let width = app.config.gesture.sidebar_width;
    let open = app.sidebar_open;

    let mut selected = None;
    let mut close = false;
    let mut choose_folder = false;
    let mut reload = false;

    egui::SidePanel::left("filter_sidebar")
        .resizable(false)
        .exact_width(width)
        .show_animated(ctx, open, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading("Filter");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✖").on_hover_text("Close").clicked() {
                        close = true;
                    }
                });
            });
            ui.separator();

            for &filter in MediaFilter::all() {
                let label = format!("{} ({})", filter.title(), app.count(filter));
                if ui.selectable_label(app.filter == filter, label).clicked() {
                    selected = Some(filter);
                }
            }

            ui.add_space(12.0);
            ui.separator();
            ui.label(egui::RichText::new("Folders").small().weak());
            for dir in &app.config.media_dirs {
                ui.label(egui::RichText::new(dir.display().to_string()).small());
            }
            if ui.button("📁 Choose folder…").clicked() {
                choose_folder = true;
            }
            if ui.button("⟳ Reload").clicked() {
                reload = true;
            }
        });

    if let Some(filter) = selected {
        app.set_filter(filter);
    }
    if close {
        app.sidebar_open = false;
    }
    if choose_folder {
        app.choose_folder();
    } else if reload {
        app.reload();
    }
}
