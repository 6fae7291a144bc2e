use crate::app::MediaFeedApp;
use crate::player::MediaBackend;
use crate::utils::format_time;
use eframe::egui;

const MARGIN: f32 = 16.0;
const FADE_SECS: f32 = 0.3;

/// Playback controls drawn over the feed, faded in and out with the
/// controls timer.
pub fn render_controls<B: MediaBackend>(app: &mut MediaFeedApp<B>, ctx: &egui::Context, rect: egui::Rect) {
    let opacity = ctx.animate_bool_with_time(egui::Id::new("controls_fade"), app.controls.is_visible(), FADE_SECS);
    if opacity <= 0.0 {
        return;
    }
    let Some(item) = app.session.active_item().cloned() else {
        return;
    };

    // Top bar: filter menu, filter title, position in the view.
    egui::Area::new(egui::Id::new("controls_top"))
        .fixed_pos(rect.left_top() + egui::vec2(MARGIN, MARGIN))
        .show(ctx, |ui| {
            ui.set_opacity(opacity);
            ui.horizontal(|ui| {
                if ui.button("☰").on_hover_text("Filters (F)").clicked() {
                    app.sidebar_open = !app.sidebar_open;
                }
                ui.label(egui::RichText::new(app.filter.title()).strong().color(egui::Color32::WHITE));
                ui.label(
                    egui::RichText::new(format!(
                        "{} / {}",
                        app.session.active_index() + 1,
                        app.session.view().len()
                    ))
                    .color(egui::Color32::LIGHT_GRAY),
                );
            });
        });

    // Center: play/pause
    egui::Area::new(egui::Id::new("controls_play"))
        .pivot(egui::Align2::CENTER_CENTER)
        .fixed_pos(rect.center())
        .show(ctx, |ui| {
            ui.set_opacity(opacity);
            let icon = if app.session.is_playing() { "⏸" } else { "▶" };
            let button = egui::Button::new(egui::RichText::new(icon).size(48.0).color(egui::Color32::WHITE))
                .frame(false);
            if ui.add(button).on_hover_text("Play/Pause (Space)").clicked() {
                app.toggle_play_pause();
            }
        });

    // Right column: like, share, mute
    egui::Area::new(egui::Id::new("controls_actions"))
        .pivot(egui::Align2::RIGHT_CENTER)
        .fixed_pos(rect.right_center() - egui::vec2(MARGIN, 0.0))
        .show(ctx, |ui| {
            ui.set_opacity(opacity);
            ui.vertical_centered(|ui| {
                let liked = app.is_liked(&item);
                let heart = if liked {
                    egui::RichText::new("♥").size(28.0).color(egui::Color32::from_rgb(230, 60, 80))
                } else {
                    egui::RichText::new("♡").size(28.0).color(egui::Color32::WHITE)
                };
                if ui.add(egui::Button::new(heart).frame(false)).on_hover_text("Like").clicked() {
                    app.toggle_like(&item.id);
                }

                ui.add_space(12.0);
                let share = egui::RichText::new("🔗").size(24.0).color(egui::Color32::WHITE);
                if ui.add(egui::Button::new(share).frame(false)).on_hover_text("Copy link").clicked() {
                    ui.ctx().copy_text(item.uri.clone());
                    log::info!("Copied {} to the clipboard", item.uri);
                }

                ui.add_space(12.0);
                let mute = if app.session.is_muted() { "🔇" } else { "🔊" };
                let mute = egui::RichText::new(mute).size(24.0).color(egui::Color32::WHITE);
                if ui.add(egui::Button::new(mute).frame(false)).on_hover_text("Mute (M)").clicked() {
                    app.session.toggle_mute();
                }
            });
        });

    // Bottom: title, time, progress
    let bottom_width = (rect.width() - 2.0 * MARGIN).max(50.0);
    egui::Area::new(egui::Id::new("controls_bottom"))
        .pivot(egui::Align2::LEFT_BOTTOM)
        .fixed_pos(rect.left_bottom() + egui::vec2(MARGIN, -MARGIN))
        .show(ctx, |ui| {
            ui.set_opacity(opacity);
            ui.set_width(bottom_width);
            ui.label(egui::RichText::new(&item.filename).size(16.0).strong().color(egui::Color32::WHITE));
            ui.label(
                egui::RichText::new(format!(
                    "{} / {}",
                    format_time(app.session.position_ms()),
                    format_time(app.session.duration_ms())
                ))
                .color(egui::Color32::LIGHT_GRAY),
            );
            ui.add(egui::ProgressBar::new(app.session.progress_fraction()).desired_width(bottom_width));
        });
}
