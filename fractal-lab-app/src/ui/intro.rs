use std::time::{Duration, Instant};

use eframe::egui;
use tracing::info;

use fractal_lab_core::constants::DEFAULT_COLOR_START;

use crate::app::FractalLabApp;
use crate::app_state::{IntroStep, INTRO_POINT_COUNT};
use crate::ui::color32;

const INTRO_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x05, 0x05, 0x05);
/// Pause between the last point and the closing message.
const CLOSING_DELAY: Duration = Duration::from_millis(500);
/// How long the closing message stays up.
const CLOSING_HOLD: Duration = Duration::from_millis(2000);

impl FractalLabApp {
    pub(crate) fn draw_introduction(&mut self, ctx: &egui::Context) {
        let neon = color32(DEFAULT_COLOR_START);
        let muted = egui::Color32::from_gray(130);

        let mut skip = false;
        egui::Area::new(egui::Id::new("intro_skip"))
            .anchor(egui::Align2::RIGHT_TOP, [-24.0, 24.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                skip = ui
                    .button(egui::RichText::new("skip intro \u{2192}").monospace())
                    .clicked();
            });
        if skip {
            self.finish_introduction();
            return;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(INTRO_BACKGROUND))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click());
                let rect = response.rect;

                painter.text(
                    rect.left_top() + egui::vec2(24.0, 24.0),
                    egui::Align2::LEFT_TOP,
                    step_indicator(self.intro_step, self.intro_points.len()),
                    egui::FontId::monospace(11.0),
                    muted,
                );

                match self.intro_step {
                    IntroStep::Origin => {
                        let center = rect.center();
                        glow_dot(&painter, center - egui::vec2(0.0, 40.0), 12.0, neon);
                        painter.text(
                            center,
                            egui::Align2::CENTER_CENTER,
                            "this dot is at position (0,0)",
                            egui::FontId::proportional(20.0),
                            egui::Color32::WHITE,
                        );
                        painter.text(
                            center + egui::vec2(0.0, 28.0),
                            egui::Align2::CENTER_CENTER,
                            "click anywhere to place your first point",
                            egui::FontId::proportional(15.0),
                            muted,
                        );
                    }
                    IntroStep::PlacingPoints => {
                        let line = egui::Stroke::new(2.0, neon.gamma_multiply(0.5));
                        for pair in self.intro_points.windows(2) {
                            painter.line_segment([pair[0], pair[1]], line);
                        }
                        for p in &self.intro_points {
                            glow_dot(&painter, *p, 10.0, neon);
                            let local = *p - rect.min;
                            painter.text(
                                *p + egui::vec2(15.0, -8.0),
                                egui::Align2::LEFT_TOP,
                                format!("({}, {})", local.x.round(), local.y.round()),
                                egui::FontId::monospace(13.0),
                                neon,
                            );
                        }
                        let bottom = rect.center_bottom() - egui::vec2(0.0, 80.0);
                        painter.text(
                            bottom,
                            egui::Align2::CENTER_CENTER,
                            placement_prompt(self.intro_points.len()),
                            egui::FontId::proportional(17.0),
                            egui::Color32::WHITE,
                        );
                        painter.text(
                            bottom + egui::vec2(0.0, 24.0),
                            egui::Align2::CENTER_CENTER,
                            "these are coordinates - numbers that describe positions",
                            egui::FontId::proportional(13.0),
                            muted,
                        );
                    }
                    IntroStep::Closing => {
                        let center = rect.center();
                        painter.text(
                            center - egui::vec2(0.0, 30.0),
                            egui::Align2::CENTER_CENTER,
                            "that's all math is",
                            egui::FontId::proportional(30.0),
                            neon,
                        );
                        painter.text(
                            center + egui::vec2(0.0, 8.0),
                            egui::Align2::CENTER_CENTER,
                            "numbers describing where things are",
                            egui::FontId::proportional(19.0),
                            egui::Color32::from_gray(180),
                        );
                        painter.text(
                            center + egui::vec2(0.0, 36.0),
                            egui::Align2::CENTER_CENTER,
                            "fractals are next",
                            egui::FontId::proportional(13.0),
                            muted,
                        );
                    }
                }

                if response.clicked() {
                    let pos = response.interact_pointer_pos();
                    self.intro_click(pos);
                }
            });

        self.advance_introduction_timers(ctx);
    }

    fn intro_click(&mut self, pos: Option<egui::Pos2>) {
        match self.intro_step {
            IntroStep::Origin => self.set_intro_step(IntroStep::PlacingPoints),
            IntroStep::PlacingPoints if self.intro_points.len() < INTRO_POINT_COUNT => {
                if let Some(pos) = pos {
                    self.intro_points.push(pos);
                    self.intro_step_since = Instant::now();
                }
            }
            _ => {}
        }
    }

    fn advance_introduction_timers(&mut self, ctx: &egui::Context) {
        let waited = self.intro_step_since.elapsed();
        match self.intro_step {
            IntroStep::PlacingPoints if self.intro_points.len() >= INTRO_POINT_COUNT => {
                if waited >= CLOSING_DELAY {
                    self.set_intro_step(IntroStep::Closing);
                }
                ctx.request_repaint_after(Duration::from_millis(50));
            }
            IntroStep::Closing => {
                if waited >= CLOSING_HOLD {
                    self.finish_introduction();
                } else {
                    ctx.request_repaint_after(Duration::from_millis(50));
                }
            }
            _ => {}
        }
    }

    fn set_intro_step(&mut self, step: IntroStep) {
        self.intro_step = step;
        self.intro_step_since = Instant::now();
    }

    /// Leave the introduction for good: remembered across launches.
    fn finish_introduction(&mut self) {
        info!("Introduction finished");
        self.preferences.has_seen_intro = true;
        self.preferences.save();
        self.intro_points.clear();
        self.set_intro_step(IntroStep::Origin);
        self.store.dismiss_introduction();
    }
}

fn glow_dot(painter: &egui::Painter, center: egui::Pos2, radius: f32, color: egui::Color32) {
    for (scale, alpha) in [(3.0, 0.08), (2.0, 0.18), (1.4, 0.35)] {
        painter.circle_filled(center, radius * scale, color.gamma_multiply(alpha));
    }
    painter.circle_filled(center, radius, color);
}

fn step_indicator(step: IntroStep, points: usize) -> String {
    let n = match step {
        IntroStep::Origin => 0,
        IntroStep::PlacingPoints => 1,
        IntroStep::Closing => 2,
    };
    if points > 0 {
        format!("step {n}/3 \u{2022} {points}/{INTRO_POINT_COUNT} points")
    } else {
        format!("step {n}/3")
    }
}

fn placement_prompt(placed: usize) -> &'static str {
    match placed {
        0 => "click anywhere to place point 1 of 3",
        1 => "nice! now place point 2 of 3",
        2 => "one more! place point 3 of 3",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_counts_points_once_placing() {
        assert_eq!(step_indicator(IntroStep::Origin, 0), "step 0/3");
        assert_eq!(
            step_indicator(IntroStep::PlacingPoints, 2),
            "step 1/3 \u{2022} 2/3 points"
        );
    }

    #[test]
    fn prompts_follow_placement() {
        assert_eq!(placement_prompt(0), "click anywhere to place point 1 of 3");
        assert_eq!(placement_prompt(2), "one more! place point 3 of 3");
        assert_eq!(placement_prompt(3), "");
    }
}
