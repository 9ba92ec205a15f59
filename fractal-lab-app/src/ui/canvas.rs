use eframe::egui;

use fractal_lab_core::constants::BACKGROUND_COLOR;

use crate::app::FractalLabApp;
use crate::render_bridge::RenderPhase;
use crate::ui::color32;

impl FractalLabApp {
    /// Full-window tree image. Resizing the window re-renders at the new size.
    pub(crate) fn draw_canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(color32(BACKGROUND_COLOR)))
            .show(ctx, |ui| {
                let available = ui.available_size();
                let pixels_per_point = ctx.pixels_per_point();
                let width = (available.x * pixels_per_point).round().max(1.0) as u32;
                let height = (available.y * pixels_per_point).round().max(1.0) as u32;
                self.check_resize(width, height);

                if self.needs_render {
                    self.request_render();
                }

                let (response, painter) = ui.allocate_painter(available, egui::Sense::click());

                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                if let Some(ref tex) = self.texture {
                    painter.image(tex.id(), response.rect, uv, egui::Color32::WHITE);
                }

                if self.render_phase == RenderPhase::Rendering && self.texture.is_none() {
                    painter.text(
                        response.rect.center(),
                        egui::Align2::CENTER_CENTER,
                        RenderPhase::Rendering.label(),
                        egui::FontId::monospace(14.0),
                        egui::Color32::from_gray(120),
                    );
                }

                if response.double_clicked() {
                    self.show_hud = !self.show_hud;
                }
            });
    }
}
