mod canvas;
mod controls;
mod intro;

use eframe::egui;

use fractal_lab_core::Rgb;

pub(crate) fn color32(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}
