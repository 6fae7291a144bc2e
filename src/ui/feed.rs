use crate::app::MediaFeedApp;
use crate::gesture::DragSample;
use crate::library::MediaItem;
use crate::player::MediaBackend;
use crate::ui::render_controls;
use eframe::egui;

/// The full-screen media layer. Takes the drag and tap input for the whole
/// feed; the controls overlay sits on top of it.
pub fn render_feed<B: MediaBackend>(app: &mut MediaFeedApp<B>, ui: &mut egui::Ui) {
    let rect = ui.max_rect();
    let response = ui.interact(rect, ui.id().with("feed_surface"), egui::Sense::click_and_drag());

    handle_drag(app, ui, &response);
    if response.clicked() {
        app.handle_tap();
    }

    let (offset_x, offset_y) = app.gesture.offset();
    let media_rect = rect.translate(egui::vec2(offset_x, offset_y));
    let painter = ui.painter_at(rect);

    if let Some(item) = app.session.active_item().cloned() {
        if item.is_video() {
            paint_video(app.video_texture.as_ref(), &painter, media_rect, &item);
        } else {
            paint_audio_card(&painter, media_rect, &item, app.session.is_playing());
        }
    }

    render_controls(app, ui.ctx(), rect);
}

fn handle_drag<B: MediaBackend>(app: &mut MediaFeedApp<B>, ui: &egui::Ui, response: &egui::Response) {
    let total_id = response.id.with("drag_total");

    if response.drag_started() {
        ui.ctx().data_mut(|d| d.insert_temp(total_id, egui::Vec2::ZERO));
        app.gesture.begin();
    }
    if !response.dragged() && !response.drag_stopped() {
        return;
    }

    let total = ui.ctx().data_mut(|d| {
        let total = d.get_temp::<egui::Vec2>(total_id).unwrap_or_default() + response.drag_delta();
        d.insert_temp(total_id, total);
        total
    });
    // egui reports points per second.
    let velocity = ui.input(|i| i.pointer.velocity()) / 1000.0;
    let sample = DragSample::new(total.x, total.y, velocity.x, velocity.y);

    if response.drag_stopped() {
        ui.ctx().data_mut(|d| d.remove::<egui::Vec2>(total_id));
        if let Some(action) = app.gesture.release(sample, app.sidebar_open) {
            app.dispatch(action);
        }
    } else {
        app.gesture.update(sample, app.sidebar_open);
    }
}

/// Fit `size` inside `rect`, keeping its aspect ratio.
fn fit_rect(size: egui::Vec2, rect: egui::Rect) -> egui::Rect {
    let aspect_ratio = size.x / size.y;
    let available = rect.size();
    let display_size = if available.x / available.y > aspect_ratio {
        egui::vec2(available.y * aspect_ratio, available.y)
    } else {
        egui::vec2(available.x, available.x / aspect_ratio)
    };
    egui::Rect::from_center_size(rect.center(), display_size)
}

fn paint_video(
    texture: Option<&egui::TextureHandle>,
    painter: &egui::Painter,
    rect: egui::Rect,
    item: &MediaItem,
) {
    match texture {
        Some(texture) => {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture.id(), fit_rect(texture.size_vec2(), rect), uv, egui::Color32::WHITE);
        }
        None => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                format!("Loading {}…", item.filename),
                egui::FontId::proportional(16.0),
                egui::Color32::GRAY,
            );
        }
    }
}

fn paint_audio_card(painter: &egui::Painter, rect: egui::Rect, item: &MediaItem, is_playing: bool) {
    let center = rect.center();
    let disc_center = center - egui::vec2(0.0, 50.0);

    painter.circle_filled(disc_center, 70.0, egui::Color32::from_rgb(40, 40, 48));
    painter.circle_stroke(disc_center, 70.0, egui::Stroke::new(2.0, egui::Color32::from_rgb(90, 90, 110)));
    painter.text(
        disc_center,
        egui::Align2::CENTER_CENTER,
        "🎵",
        egui::FontId::proportional(56.0),
        egui::Color32::WHITE,
    );
    painter.text(
        center + egui::vec2(0.0, 45.0),
        egui::Align2::CENTER_CENTER,
        &item.filename,
        egui::FontId::proportional(20.0),
        egui::Color32::WHITE,
    );
    painter.text(
        center + egui::vec2(0.0, 72.0),
        egui::Align2::CENTER_CENTER,
        format!(
            "{} · {}",
            if is_playing { "Now playing" } else { "Paused" },
            item.duration_string()
        ),
        egui::FontId::proportional(14.0),
        egui::Color32::GRAY,
    );
}
