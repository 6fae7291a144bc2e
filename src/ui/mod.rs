mod alert;
mod feed;
mod overlay;
mod sidebar;
mod states;

pub use alert::*;
pub use feed::*;
pub use overlay::*;
pub use sidebar::*;
pub use states::*;

use crate::app::MediaFeedApp;
use crate::player::MediaBackend;
use eframe::egui;

pub fn render_screen<B: MediaBackend>(app: &mut MediaFeedApp<B>, ctx: &egui::Context) {
    // Side panel first so the central panel fills what is left.
    render_sidebar(app, ctx);

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::BLACK))
        .show(ctx, |ui| {
            if app.is_loading() {
                render_loading(ui);
            } else if app.session.view().is_empty() {
                render_empty_state(app, ui);
            } else {
                render_feed(app, ui);
            }
        });

    if app.show_permission_alert {
        render_permission_alert(app, ctx);
    }
}
