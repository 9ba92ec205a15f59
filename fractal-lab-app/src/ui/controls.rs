use std::time::Instant;

use eframe::egui;
use tracing::{error, info, warn};

use fractal_lab_core::constants::{ANGLE, DEPTH, SCALE};
use fractal_lab_core::{FractalParameters, Rgb};
use fractal_lab_render::{export_png, ExportMetadata};

use crate::app::{
    FractalLabApp, HUD_CORNER_RADIUS, HUD_MARGIN, SHARE_FEEDBACK, STATUS_DURATION,
};
use crate::app_dir::images_directory;
use crate::ui::color32;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x5E, 0xE6, 0xEB);
const HINT: egui::Color32 = egui::Color32::from_gray(130);
const GRADIENT_STEPS: usize = 48;

impl FractalLabApp {
    // -- Top-left: title -------------------------------------------------------

    pub(crate) fn show_header(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("hud_header"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN * 3.0, HUD_MARGIN * 3.0])
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new("fractal lab")
                        .monospace()
                        .size(22.0)
                        .color(color32(self.store.params().color_start)),
                );
                ui.label(egui::RichText::new("drag the sliders to grow the tree").color(HINT));
            });
    }

    // -- Bottom-centre: parameter controls -----------------------------------

    pub(crate) fn show_controls_panel(&mut self, ctx: &egui::Context) {
        use egui_material_icons::icons::*;

        let hud_alpha = self.preferences.hud_alpha();
        let params = self.store.params();

        let mut angle = params.branch_angle_degrees;
        let mut scale = params.scale_factor;
        let mut depth = params.depth;
        let mut start = <[u8; 3]>::from(params.color_start);
        let mut end = <[u8; 3]>::from(params.color_end);

        let mut share_clicked = false;
        let mut reset_clicked = false;
        let mut export_clicked = false;

        egui::Area::new(egui::Id::new("hud_controls"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -HUD_MARGIN * 3.0])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(hud_alpha))
                    .inner_margin(egui::Margin::same(14))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.set_min_width(420.0);
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));
                        ui.spacing_mut().slider_width = 300.0;

                        section_label(ui, "BRANCH ANGLE", "how wide the tree spreads");
                        ui.add(
                            egui::Slider::new(&mut angle, ANGLE.min..=ANGLE.max)
                                .step_by(ANGLE.step)
                                .fixed_decimals(1)
                                .suffix("\u{b0}"),
                        );

                        section_label(ui, "SCALE FACTOR", "how much smaller each branch gets");
                        ui.add(
                            egui::Slider::new(&mut scale, SCALE.min..=SCALE.max)
                                .step_by(SCALE.step)
                                .fixed_decimals(2),
                        );

                        section_label(ui, "RECURSION DEPTH", "how many times to repeat");
                        ui.add(egui::Slider::new(&mut depth, DEPTH.min..=DEPTH.max));

                        section_label(ui, "COLOR SPECTRUM", "root to tips");
                        ui.horizontal(|ui| {
                            egui::color_picker::color_edit_button_srgb(ui, &mut start)
                                .on_hover_text("root");
                            gradient_strip(ui, Rgb::from(start), Rgb::from(end));
                            egui::color_picker::color_edit_button_srgb(ui, &mut end)
                                .on_hover_text("tips");
                        });

                        ui.add_space(6.0);
                        ui.separator();
                        ui.horizontal(|ui| {
                            let copied = self
                                .share_copied_at
                                .is_some_and(|t| t.elapsed() < SHARE_FEEDBACK);
                            let share_label = if copied {
                                format!("{ICON_CHECK} link copied!")
                            } else {
                                format!("{ICON_SHARE} share this fractal")
                            };
                            share_clicked = ui
                                .button(share_label)
                                .on_hover_text("Copy a link that recreates this tree")
                                .clicked();
                            reset_clicked = ui
                                .button(format!("{ICON_RESTART_ALT} reset"))
                                .on_hover_text("Back to the default tree (R)")
                                .clicked();
                            export_clicked = ui
                                .add_enabled(
                                    self.last_frame.is_some(),
                                    egui::Button::new(format!("{ICON_SAVE} export png")),
                                )
                                .clicked();
                        });

                        if let Some((message, at)) = &self.status {
                            if at.elapsed() < STATUS_DURATION {
                                ui.label(egui::RichText::new(message).small().color(HINT));
                            }
                        }
                    });
            });

        self.apply_control_edits(&params, angle, scale, depth, start, end);

        if share_clicked {
            self.copy_share_link(ctx);
        }
        if reset_clicked {
            self.store.reset_params();
        }
        if export_clicked {
            self.export_current_png();
        }
    }

    /// Push widget values that differ from the store back into it.
    fn apply_control_edits(
        &mut self,
        before: &FractalParameters,
        angle: f64,
        scale: f64,
        depth: u32,
        start: [u8; 3],
        end: [u8; 3],
    ) {
        if angle != before.branch_angle_degrees {
            self.store.set_branch_angle(angle);
        }
        if scale != before.scale_factor {
            self.store.set_scale_factor(scale);
        }
        if depth != before.depth {
            self.store.set_depth(depth);
        }
        if Rgb::from(start) != before.color_start {
            self.store.set_color_start(Rgb::from(start));
        }
        if Rgb::from(end) != before.color_end {
            self.store.set_color_end(Rgb::from(end));
        }
    }

    // -- Bottom-left: render stats -------------------------------------------

    pub(crate) fn show_render_stats(&mut self, ctx: &egui::Context) {
        let Some(stats) = self.last_stats else {
            return;
        };
        let slow = stats.elapsed.as_millis() as u64 > self.preferences.slow_render_ms;
        egui::Area::new(egui::Id::new("hud_render"))
            .anchor(egui::Align2::LEFT_BOTTOM, [HUD_MARGIN, -HUD_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(self.preferences.hud_alpha()))
                    .inner_margin(egui::Margin::same(6))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(200, 200, 200));
                        ui.label(
                            egui::RichText::new(self.render_phase.label())
                                .small()
                                .color(ACCENT),
                        );
                        let time_color = if slow {
                            egui::Color32::from_rgb(255, 180, 50)
                        } else {
                            egui::Color32::from_rgb(200, 200, 200)
                        };
                        ui.colored_label(
                            time_color,
                            format!(
                                "{} segments \u{2022} {:.1} ms",
                                stats.segments,
                                stats.elapsed.as_secs_f64() * 1000.0
                            ),
                        );
                        ui.label(format!("{}x{}", stats.width, stats.height));
                    });
            });
    }

    // -- Actions ---------------------------------------------------------------

    fn copy_share_link(&mut self, ctx: &egui::Context) {
        let url = self.store.share_url(&self.preferences.share_base_url);
        info!(url = url.as_str(), "Copied share link");
        ctx.copy_text(url);
        self.share_copied_at = Some(Instant::now());
    }

    fn export_current_png(&mut self) {
        let Some((buffer, params)) = self.last_frame.as_ref() else {
            return;
        };

        let dir = images_directory();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("Could not create {}: {e}", dir.display());
        }
        let mut dialog = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name(export_file_name(params));
        if dir.is_dir() {
            dialog = dialog.set_directory(&dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };

        let base = self.preferences.share_base_url.trim();
        let metadata = ExportMetadata {
            params: *params,
            share_base: (!base.is_empty()).then(|| base.to_string()),
        };
        let message = match export_png(buffer, &path, &metadata) {
            Ok(()) => {
                info!("Exported {}", path.display());
                format!("Saved {}", path.display())
            }
            Err(e) => {
                error!("PNG export failed: {e}");
                format!("Export failed: {e}")
            }
        };
        self.set_status(message);
    }
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

fn section_label(ui: &mut egui::Ui, title: &str, hint: &str) {
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(title).monospace().strong().color(ACCENT));
        ui.label(egui::RichText::new(hint).italics().small().color(HINT));
    });
}

/// Root-to-tip preview of the branch colors.
fn gradient_strip(ui: &mut egui::Ui, start: Rgb, end: Rgb) {
    let size = egui::vec2(240.0, 14.0);
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let step_w = rect.width() / GRADIENT_STEPS as f32;
    for i in 0..GRADIENT_STEPS {
        let t = i as f64 / (GRADIENT_STEPS - 1) as f64;
        let x = rect.min.x + i as f32 * step_w;
        let cell = egui::Rect::from_min_max(
            egui::pos2(x, rect.min.y),
            egui::pos2(x + step_w + 0.5, rect.max.y),
        );
        painter.rect_filled(cell, 0.0, color32(start.lerp(end, t)));
    }
}

/// Suggested file name, e.g. `fractal-tree-a25.0-s0.70-d10.png`.
fn export_file_name(params: &FractalParameters) -> String {
    format!(
        "fractal-tree-a{:.1}-s{:.2}-d{}.png",
        params.branch_angle_degrees, params.scale_factor, params.depth
    )
}
