use std::sync::mpsc;
use std::time::Duration;

use eframe::egui;
use tracing::{debug, warn};

use fractal_lab_core::FractalParameters;
use fractal_lab_render::{render_tree, RasterSurface, RenderBuffer, RenderStats, Surface};

use crate::app::FractalLabApp;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderPhase {
    Idle,
    Rendering,
    Done,
}

impl RenderPhase {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Rendering => "Rendering\u{2026}",
            Self::Done => "Done",
        }
    }
}

pub(crate) struct RenderRequest {
    pub(crate) id: u64,
    pub(crate) params: FractalParameters,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

pub(crate) struct RenderResponse {
    pub(crate) id: u64,
    pub(crate) params: FractalParameters,
    pub(crate) buffer: RenderBuffer,
    pub(crate) stats: RenderStats,
}

// ---------------------------------------------------------------------------
// impl FractalLabApp — render dispatch & polling
// ---------------------------------------------------------------------------

impl FractalLabApp {
    pub(crate) fn request_render(&mut self) {
        self.render_id += 1;
        let params = self.store.params();
        let [width, height] = self.panel_size;
        debug!(
            id = self.render_id,
            width,
            height,
            depth = params.depth,
            "Requesting render"
        );

        let req = RenderRequest {
            id: self.render_id,
            params,
            width,
            height,
        };

        if self.tx_request.send(req).is_err() {
            warn!("Render worker is gone; request dropped");
            return;
        }
        self.render_phase = RenderPhase::Rendering;
        self.needs_render = false;
    }

    pub(crate) fn poll_responses(&mut self, ctx: &egui::Context) {
        while let Ok(resp) = self.rx_response.try_recv() {
            if resp.id == self.render_id {
                self.apply_result(ctx, resp);
                self.render_phase = RenderPhase::Done;
            }
        }
    }

    fn apply_result(&mut self, ctx: &egui::Context, resp: RenderResponse) {
        self.last_stats = Some(resp.stats);
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [resp.buffer.width as usize, resp.buffer.height as usize],
            &resp.buffer.pixels,
        );
        match self.texture {
            Some(ref mut tex) => tex.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("fractal_tree", image, egui::TextureOptions::LINEAR));
            }
        }
        self.last_frame = Some((resp.buffer, resp.params));
    }
}

// ---------------------------------------------------------------------------
// Worker thread
// ---------------------------------------------------------------------------

/// Only the newest queued request matters; older ones are superseded.
pub(crate) fn drain_latest<T>(initial: T, rx: &mpsc::Receiver<T>) -> T {
    let mut req = initial;
    while let Ok(newer) = rx.try_recv() {
        req = newer;
    }
    req
}

pub(crate) fn render_worker(
    ctx: egui::Context,
    rx: mpsc::Receiver<RenderRequest>,
    tx: mpsc::Sender<RenderResponse>,
    slow_render: Duration,
) {
    let mut surface = RasterSurface::new(0, 0);

    while let Ok(initial) = rx.recv() {
        let req = drain_latest(initial, &rx);

        if (surface.width(), surface.height()) != (req.width, req.height) {
            surface.resize(req.width, req.height);
        }
        let stats = render_tree(&mut surface, &req.params);
        if stats.elapsed > slow_render {
            warn!(
                elapsed_ms = stats.elapsed.as_secs_f64() * 1000.0,
                segments = stats.segments,
                depth = req.params.depth,
                "Slow render"
            );
        }

        let buffer = surface.to_buffer();
        if tx
            .send(RenderResponse {
                id: req.id,
                params: req.params,
                buffer,
                stats,
            })
            .is_err()
        {
            return;
        }
        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_latest_keeps_only_the_newest() {
        let (tx, rx) = mpsc::channel();
        for i in 2..=5 {
            tx.send(i).unwrap();
        }
        assert_eq!(drain_latest(1, &rx), 5);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn drain_latest_without_backlog_returns_initial() {
        let (_tx, rx) = mpsc::channel::<u32>();
        assert_eq!(drain_latest(7, &rx), 7);
    }

    #[test]
    fn worker_answers_with_latest_request() {
        let ctx = egui::Context::default();
        let (tx_req, rx_req) = mpsc::channel();
        let (tx_resp, rx_resp) = mpsc::channel();
        for id in 1..=3 {
            tx_req
                .send(RenderRequest {
                    id,
                    params: FractalParameters {
                        depth: 5,
                        ..FractalParameters::default()
                    },
                    width: 64,
                    height: 48,
                })
                .unwrap();
        }
        drop(tx_req);
        render_worker(ctx, rx_req, tx_resp, Duration::from_secs(60));

        let responses: Vec<_> = rx_resp.try_iter().collect();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].id, 3);
        assert_eq!(responses[0].stats.segments, 31);
        assert_eq!(responses[0].buffer.pixels.len(), 64 * 48 * 4);
    }
}
