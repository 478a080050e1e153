use eframe::egui;
use egui::Color32;

pub const BACKGROUND: Color32 = Color32::BLACK;

pub const KNOB_FILL: Color32 = Color32::from_rgb(97, 18, 167);
pub const KNOB_RIM: Color32 = Color32::from_rgb(255, 154, 1);
pub const KNOB_LABEL: Color32 = Color32::from_rgb(0, 182, 1);
pub const ACTIVE_GREEN: Color32 = Color32::from_rgb(0, 172, 1);

pub const DARK_GREY: Color32 = Color32::from_rgb(85, 85, 85);
pub const GREY: Color32 = Color32::from_rgb(128, 128, 128);
pub const DIM_GREY: Color32 = Color32::from_rgb(105, 105, 105);
pub const LIGHT_GREY: Color32 = Color32::from_rgb(211, 211, 211);

pub const LEFT_SPECTRUM: Color32 = Color32::from_rgb(135, 206, 235);
pub const RIGHT_SPECTRUM: Color32 = Color32::from_rgb(255, 255, 224);
pub const CURVE_BORDER: Color32 = Color32::from_rgb(255, 165, 0);
pub const RESPONSE: Color32 = Color32::WHITE;

pub const TEXT_HEIGHT: f32 = 14.0;
pub const GRID_TEXT_HEIGHT: f32 = 10.0;

pub fn setup_global_style(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    //
    // Black editor background.
    //
    style.visuals.panel_fill = BACKGROUND;
    style.visuals.window_fill = BACKGROUND;

    //
    // Controls are painted by hand; keep any stock widgets square.
    //
    style.visuals.widgets.noninteractive.rounding = egui::Rounding::ZERO;
    style.visuals.widgets.active.rounding = egui::Rounding::ZERO;
    style.visuals.widgets.inactive.rounding = egui::Rounding::ZERO;
    style.visuals.widgets.hovered.rounding = egui::Rounding::ZERO;

    ctx.set_style(style);
}
