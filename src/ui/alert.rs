use crate::app::MediaFeedApp;
use crate::player::MediaBackend;
use eframe::egui;

/// Modal shown after a load found no readable media folder.
pub fn render_permission_alert<B: MediaBackend>(app: &mut MediaFeedApp<B>, ctx: &egui::Context) {
    let mut cancel = false;
    let mut open_settings = false;
    let mut choose_folder = false;

    egui::Window::new("Media access needed")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("None of the configured media folders can be read.");
            ui.label("Sample media is shown until you grant access or pick a folder.");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
                if ui.button("Open settings").clicked() {
                    open_settings = true;
                }
                if ui.button("Choose folder…").clicked() {
                    choose_folder = true;
                }
            });
        });

    if cancel {
        app.show_permission_alert = false;
    } else if open_settings {
        app.open_settings();
    } else if choose_folder {
        app.choose_folder();
    }
}
