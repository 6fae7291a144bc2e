use crate::config::{config_path, load_config_from, save_config_to, AppConfig};
use crate::gesture::{tap_action, ControlsTimer, GestureAction, GestureBridge, TapAction};
use crate::library::{
    filter, Catalog, CatalogLoader, FilteredView, FolderPermission, FolderSource, LoadOutcome,
    MediaFilter, MediaItem, PermissionProvider,
};
use crate::player::{DesktopBackend, MediaBackend, PlaybackSession, VideoSurface};
use crossbeam_channel::{Receiver, TryRecvError};
use eframe::egui;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

/// The feed screen: owns the catalog, the playback session and all UI state.
pub struct MediaFeedApp<B: MediaBackend = DesktopBackend> {
    pub config: AppConfig,
    /// Re-read on every reload so edits made in settings take effect.
    config_path: PathBuf,
    runtime: Runtime,
    load_rx: Option<Receiver<LoadOutcome>>,

    /// `None` while a load is in flight.
    pub catalog: Option<Catalog>,
    pub filter: MediaFilter,
    pub session: PlaybackSession<B>,

    // Presentation state
    pub gesture: GestureBridge,
    pub controls: ControlsTimer,
    pub sidebar_open: bool,
    pub show_permission_alert: bool,
    liked: HashSet<String>,
    pub video_texture: Option<egui::TextureHandle>,
    texture_key: Option<(String, u64)>,
}

impl MediaFeedApp<DesktopBackend> {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> anyhow::Result<Self> {
        if !crate::ffmpeg::is_available() {
            log::warn!("FFmpeg was not found on PATH; video and remote audio will not play");
        }
        let mut app = Self::with_backend(config, DesktopBackend)?;
        app.start_load();
        Ok(app)
    }
}

impl<B: MediaBackend> MediaFeedApp<B> {
    pub fn with_backend(config: AppConfig, backend: B) -> anyhow::Result<Self> {
        let runtime = Runtime::new()?;
        let gesture = GestureBridge::new(config.gesture);
        let controls = ControlsTimer::new(config.controls_hide_after());

        Ok(Self {
            config,
            config_path: config_path(),
            runtime,
            load_rx: None,
            catalog: None,
            filter: MediaFilter::All,
            session: PlaybackSession::new(backend),
            gesture,
            controls,
            sidebar_open: false,
            show_permission_alert: false,
            liked: HashSet::new(),
            video_texture: None,
            texture_key: None,
        })
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = path;
        self
    }

    pub fn is_loading(&self) -> bool {
        self.catalog.is_none()
    }

    // ---- Catalog ----

    /// Re-read the config, throw away the current catalog and load a new one
    /// in the background.
    pub fn reload(&mut self) {
        self.apply_config(load_config_from(&self.config_path));
        self.start_load();
    }

    fn apply_config(&mut self, config: AppConfig) {
        if config.gesture != self.config.gesture {
            self.gesture = GestureBridge::new(config.gesture);
        }
        if config.controls_hide_after() != self.config.controls_hide_after() {
            self.controls = ControlsTimer::new(config.controls_hide_after());
        }
        self.config = config;
    }

    fn start_load(&mut self) {
        self.session.set_view(FilteredView::default());
        self.catalog = None;
        self.clear_texture();

        let (tx, rx) = crossbeam_channel::bounded(1);
        let permission = FolderPermission::new(self.config.media_dirs.clone(), self.config_path.clone());
        let source = FolderSource::new(self.config.media_dirs.clone());
        let mut loader = CatalogLoader::new(
            permission,
            source,
            self.config.effective_asset_limit(),
            self.config.include_samples,
        );

        log::info!("Loading media from {} folder(s)", self.config.media_dirs.len());
        self.runtime.spawn_blocking(move || {
            let _ = tx.send(loader.load());
        });
        self.load_rx = Some(rx);
    }

    pub fn poll_loader(&mut self) {
        let Some(rx) = self.load_rx.as_ref() else {
            return;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                self.load_rx = None;
                self.on_catalog_loaded(outcome);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                log::warn!("Catalog loader stopped without a result, using sample media");
                self.load_rx = None;
                self.on_catalog_loaded(LoadOutcome {
                    catalog: Catalog::samples(),
                    permission_denied: false,
                });
            }
        }
    }

    pub fn on_catalog_loaded(&mut self, outcome: LoadOutcome) {
        self.show_permission_alert = outcome.permission_denied;
        self.catalog = Some(outcome.catalog);
        self.refresh_view();
    }

    pub fn set_filter(&mut self, filter: MediaFilter) {
        log::debug!("Filter set to {:?}", filter);
        self.filter = filter;
        self.sidebar_open = false;
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        let Some(ref catalog) = self.catalog else {
            return;
        };
        let view = filter::apply(catalog, self.filter);
        self.session.set_view(view);
        self.clear_texture();
    }

    pub fn count(&self, filter: MediaFilter) -> usize {
        self.catalog.as_ref().map(|c| c.count(filter)).unwrap_or(0)
    }

    /// Add a media folder picked by the user and rescan.
    pub fn add_folder(&mut self, dir: PathBuf) {
        // Start from the file, not memory: it may have been edited since.
        let mut config = load_config_from(&self.config_path);
        if config.add_media_dir(dir.clone()) {
            log::info!("Added media folder {:?}", dir);
            if let Err(e) = save_config_to(&config, &self.config_path) {
                log::warn!("Failed to save config: {}", e);
            }
        }
        self.show_permission_alert = false;
        self.reload();
    }

    pub fn choose_folder(&mut self) {
        if let Some(dir) = rfd::FileDialog::new().set_title("Choose media folder").pick_folder() {
            self.add_folder(dir);
        }
    }

    pub fn open_settings(&mut self) {
        let permission = FolderPermission::new(self.config.media_dirs.clone(), self.config_path.clone());
        if let Err(e) = permission.open_system_settings() {
            log::warn!("Failed to open settings: {}", e);
        }
        self.show_permission_alert = false;
    }

    // ---- Gestures ----

    pub fn dispatch(&mut self, action: GestureAction) {
        match action {
            GestureAction::Next => {
                self.session.next();
            }
            GestureAction::Previous => {
                self.session.previous();
            }
            GestureAction::OpenSidebar => self.sidebar_open = true,
            GestureAction::CloseSidebar => self.sidebar_open = false,
        }
    }

    pub fn handle_tap(&mut self) {
        match tap_action(self.sidebar_open, self.controls.is_visible()) {
            TapAction::CloseSidebar => self.sidebar_open = false,
            TapAction::HideControls => self.controls.hide(),
            TapAction::ShowControls => self.controls.show(),
        }
    }

    pub fn toggle_play_pause(&mut self) {
        self.session.toggle_play_pause();
        self.controls.show();
    }

    // ---- Likes ----

    pub fn is_liked(&self, item: &MediaItem) -> bool {
        self.liked.contains(&item.id)
    }

    pub fn toggle_like(&mut self, id: &str) {
        if !self.liked.remove(id) {
            self.liked.insert(id.to_string());
        }
    }

    // ---- Frame upload ----

    fn clear_texture(&mut self) {
        self.video_texture = None;
        self.texture_key = None;
    }

    /// Upload the latest video frame. Only touches the GPU when the frame changed.
    pub fn update_video_texture(&mut self, ctx: &egui::Context) {
        let Some(item_id) = self.session.active_item().map(|i| i.id.clone()) else {
            self.clear_texture();
            return;
        };
        if self.texture_key.as_ref().is_some_and(|(id, _)| *id != item_id) {
            self.clear_texture();
        }
        let Some(frame) = self.session.video().and_then(|v| v.current_frame()) else {
            return;
        };

        let key = (item_id, frame.seq);
        if self.texture_key.as_ref() == Some(&key) {
            return;
        }
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.data,
        );
        self.video_texture = Some(ctx.load_texture("video_frame", color_image, egui::TextureOptions::LINEAR));
        self.texture_key = Some(key);
    }

    /// Keyboard shortcuts
    pub fn handle_input(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Space) {
                self.toggle_play_pause();
            }
            if i.key_pressed(egui::Key::ArrowDown) || i.key_pressed(egui::Key::J) {
                self.dispatch(GestureAction::Next);
            }
            if i.key_pressed(egui::Key::ArrowUp) || i.key_pressed(egui::Key::K) {
                self.dispatch(GestureAction::Previous);
            }
            if i.key_pressed(egui::Key::M) {
                self.session.toggle_mute();
            }
            if i.key_pressed(egui::Key::F) {
                self.sidebar_open = !self.sidebar_open;
            }
        });
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.is_loading() || self.gesture.is_animating() {
            ctx.request_repaint();
        } else if self.session.is_playing() {
            ctx.request_repaint_after(Duration::from_millis(30));
        } else if let Some(remaining) = self.controls.remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }
}

impl<B: MediaBackend> eframe::App for MediaFeedApp<B> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.handle_input(ctx);
        self.poll_loader();
        self.session.pump_status();

        let dt = ctx.input(|i| i.stable_dt);
        self.gesture.step(dt);
        self.controls.update(now, self.session.is_playing(), self.sidebar_open);

        self.update_video_texture(ctx);

        crate::ui::render_screen(self, ctx);

        self.schedule_repaint(ctx, now);
    }
}

impl<B: MediaBackend> Drop for MediaFeedApp<B> {
    fn drop(&mut self) {
        log::info!("Closing feed, releasing playback");
        self.session.shutdown();
    }
}
