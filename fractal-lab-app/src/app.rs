use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{error, info, warn};

use fractal_lab_core::{
    parse_query, ApplicationUiState, FractalParameters, ParameterStore, SubscriptionId,
};
use fractal_lab_render::{RenderBuffer, RenderStats};

use crate::app_state::{AppScreen, IntroStep};
use crate::preferences::AppPreferences;
use crate::render_bridge::{render_worker, RenderPhase, RenderRequest, RenderResponse};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;
/// How long the share button reads "link copied!".
pub(crate) const SHARE_FEEDBACK: Duration = Duration::from_millis(2000);
/// How long export status messages stay on screen.
pub(crate) const STATUS_DURATION: Duration = Duration::from_secs(4);

// ---------------------------------------------------------------------------
// Application struct
// ---------------------------------------------------------------------------

pub(crate) struct FractalLabApp {
    // Parameter store and change notification
    pub(crate) store: ParameterStore,
    pub(crate) store_changed: Arc<AtomicBool>,
    pub(crate) subscription: SubscriptionId,

    // Render thread
    pub(crate) tx_request: mpsc::Sender<RenderRequest>,
    pub(crate) rx_response: mpsc::Receiver<RenderResponse>,
    pub(crate) render_id: u64,
    pub(crate) render_phase: RenderPhase,
    pub(crate) needs_render: bool,

    // Last render
    pub(crate) texture: Option<egui::TextureHandle>,
    /// Pixels of the last completed render and the parameters that produced them.
    pub(crate) last_frame: Option<(RenderBuffer, FractalParameters)>,
    pub(crate) last_stats: Option<RenderStats>,

    // UI state
    pub(crate) panel_size: [u32; 2],
    pub(crate) show_hud: bool,
    pub(crate) share_copied_at: Option<Instant>,
    pub(crate) status: Option<(String, Instant)>,

    // Introduction
    pub(crate) intro_step: IntroStep,
    pub(crate) intro_points: Vec<egui::Pos2>,
    pub(crate) intro_step_since: Instant,

    pub(crate) preferences: AppPreferences,
}

// ---------------------------------------------------------------------------
// Constructor
// ---------------------------------------------------------------------------

impl FractalLabApp {
    pub(crate) fn new(
        egui_ctx: &egui::Context,
        prefs: AppPreferences,
        share_link: Option<&str>,
    ) -> Self {
        let (tx_req, rx_req) = mpsc::channel();
        let (tx_resp, rx_resp) = mpsc::channel();

        let ctx = egui_ctx.clone();
        let slow_render = Duration::from_millis(prefs.slow_render_ms);
        if let Err(e) = thread::Builder::new()
            .name("tree-render".into())
            .spawn(move || render_worker(ctx, rx_req, tx_resp, slow_render))
        {
            error!("Failed to spawn render worker: {e}");
        }

        let mut store = ParameterStore::with_state(ApplicationUiState {
            params: FractalParameters::default(),
            show_introduction: !prefs.has_seen_intro,
        });

        let store_changed = Arc::new(AtomicBool::new(false));
        let flag = store_changed.clone();
        let repaint_ctx = egui_ctx.clone();
        let subscription = store.subscribe(move |_state| {
            flag.store(true, Ordering::Release);
            repaint_ctx.request_repaint();
        });

        if let Some(link) = share_link {
            let applied = store.load_from_query(parse_query(link));
            if applied == 0 {
                warn!(link, "Share link contained no usable parameters");
            }
        }

        let w = prefs.window_width as u32;
        let h = prefs.window_height as u32;

        Self {
            store,
            store_changed,
            subscription,

            tx_request: tx_req,
            rx_response: rx_resp,
            render_id: 0,
            render_phase: RenderPhase::Idle,
            needs_render: true,

            texture: None,
            last_frame: None,
            last_stats: None,

            panel_size: [w, h],
            show_hud: true,
            share_copied_at: None,
            status: None,

            intro_step: IntroStep::default(),
            intro_points: Vec::new(),
            intro_step_since: Instant::now(),

            preferences: prefs,
        }
    }

    pub(crate) fn screen(&self) -> AppScreen {
        AppScreen::from_flag(self.store.show_introduction())
    }

    pub(crate) fn check_resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 && (width != self.panel_size[0] || height != self.panel_size[1])
        {
            self.panel_size = [width, height];
            self.needs_render = true;
        }
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    fn sync_store(&mut self) {
        if self.store_changed.swap(false, Ordering::AcqRel) {
            self.needs_render = true;
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.memory(|m| m.focused().is_some()) {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::H)) {
            self.show_hud = !self.show_hud;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::R)) {
            self.store.reset_params();
        }
    }

    // -- Explorer screen ---------------------------------------------------

    fn update_explorer(&mut self, ctx: &egui::Context) {
        self.sync_store();
        self.poll_responses(ctx);

        self.draw_canvas(ctx);
        self.handle_keyboard(ctx);

        if self.show_hud {
            self.show_header(ctx);
            self.show_controls_panel(ctx);
            self.show_render_stats(ctx);
        }

        let feedback_pending = self
            .share_copied_at
            .is_some_and(|t| t.elapsed() < SHARE_FEEDBACK)
            || self
                .status
                .as_ref()
                .is_some_and(|(_, t)| t.elapsed() < STATUS_DURATION);
        if self.render_phase == RenderPhase::Rendering || feedback_pending {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for FractalLabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        match self.screen() {
            AppScreen::Introduction => self.draw_introduction(ctx),
            AppScreen::Explorer => self.update_explorer(ctx),
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.store.unsubscribe(self.subscription);
        self.preferences.save();
        info!("Saved preferences on exit");
    }
}
