pub mod theme;
pub mod widgets;

use crate::audio::AudioInput;
use eframe::egui::{self, Rect};
use eqscope::filter::ChainSettings;
use eqscope::params::{ParamId, ParameterStore};
use eqscope::render::ResponseCurveComponent;
use std::sync::Arc;
use widgets::{Control, CurveDisplay, RotaryControl, ToggleControl, ToggleKind};

const BUTTON_HEIGHT: f32 = 25.0;
const RESPONSE_RATIO: f32 = 0.25;

fn take_top(rect: &mut Rect, height: f32) -> Rect {
    let height = height.clamp(0.0, rect.height());
    let top = Rect::from_min_max(rect.min, egui::pos2(rect.max.x, rect.min.y + height));
    rect.min.y += height;
    top
}

fn take_left(rect: &mut Rect, width: f32) -> Rect {
    let width = width.clamp(0.0, rect.width());
    let left = Rect::from_min_max(rect.min, egui::pos2(rect.min.x + width, rect.max.y));
    rect.min.x += width;
    left
}

fn take_right(rect: &mut Rect, width: f32) -> Rect {
    let width = width.clamp(0.0, rect.width());
    let right = Rect::from_min_max(egui::pos2(rect.max.x - width, rect.min.y), rect.max);
    rect.max.x -= width;
    right
}

/// Screen areas of every control for one editor size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorLayout {
    pub analyzer_toggle: Rect,
    pub response: Rect,
    pub low_cut_toggle: Rect,
    pub low_cut_freq: Rect,
    pub low_cut_slope: Rect,
    pub peak_toggle: Rect,
    pub peak_freq: Rect,
    pub peak_gain: Rect,
    pub peak_quality: Rect,
    pub high_cut_toggle: Rect,
    pub high_cut_freq: Rect,
    pub high_cut_slope: Rect,
}

impl EditorLayout {
    pub fn new(bounds: Rect) -> Self {
        let mut rest = bounds;

        let mut analyzer_toggle = take_top(&mut rest, BUTTON_HEIGHT);
        analyzer_toggle.min.x = bounds.min.x + 5.0;
        analyzer_toggle.max.x = (analyzer_toggle.min.x + 100.0).min(bounds.max.x);
        take_top(&mut analyzer_toggle, 2.0);

        take_top(&mut rest, 5.0);
        let response_height = rest.height() * RESPONSE_RATIO;
        let response = take_top(&mut rest, response_height);
        take_top(&mut rest, 5.0);

        let low_cut_width = rest.width() * 0.33;
        let mut low_cut = take_left(&mut rest, low_cut_width);
        let high_cut_width = rest.width() * 0.5;
        let mut high_cut = take_right(&mut rest, high_cut_width);
        let column_height = rest.height();

        let low_cut_toggle = take_top(&mut low_cut, BUTTON_HEIGHT);
        let low_cut_freq = take_top(&mut low_cut, column_height * 0.5);
        let high_cut_toggle = take_top(&mut high_cut, BUTTON_HEIGHT);
        let high_cut_freq = take_top(&mut high_cut, column_height * 0.5);

        let peak_toggle = take_top(&mut rest, BUTTON_HEIGHT);
        let peak_freq_height = rest.height() * 0.33;
        let peak_freq = take_top(&mut rest, peak_freq_height);
        let peak_gain_height = rest.height() * 0.5;
        let peak_gain = take_top(&mut rest, peak_gain_height);

        Self {
            analyzer_toggle,
            response,
            low_cut_toggle,
            low_cut_freq,
            low_cut_slope: low_cut,
            peak_toggle,
            peak_freq,
            peak_gain,
            peak_quality: rest,
            high_cut_toggle,
            high_cut_freq,
            high_cut_slope: high_cut,
        }
    }

    /// Controls for the current settings; a bypassed section's rotaries
    /// are disabled.
    pub fn controls(&self, settings: &ChainSettings) -> Vec<Control> {
        let rotary = |param, rect, enabled| Control::Rotary(RotaryControl { param, rect, enabled });
        let power = |param, rect| {
            Control::Toggle(ToggleControl {
                param,
                kind: ToggleKind::Power,
                rect,
            })
        };

        vec![
            Control::Toggle(ToggleControl {
                param: ParamId::AnalyzerEnabled,
                kind: ToggleKind::Analyzer,
                rect: self.analyzer_toggle,
            }),
            Control::Curve(CurveDisplay {
                rect: self.response,
            }),
            power(ParamId::LowCutBypassed, self.low_cut_toggle),
            rotary(ParamId::LowCutFreq, self.low_cut_freq, !settings.low_cut_bypassed),
            rotary(ParamId::LowCutSlope, self.low_cut_slope, !settings.low_cut_bypassed),
            power(ParamId::PeakBypassed, self.peak_toggle),
            rotary(ParamId::PeakFreq, self.peak_freq, !settings.peak_bypassed),
            rotary(ParamId::PeakGain, self.peak_gain, !settings.peak_bypassed),
            rotary(ParamId::PeakQuality, self.peak_quality, !settings.peak_bypassed),
            power(ParamId::HighCutBypassed, self.high_cut_toggle),
            rotary(ParamId::HighCutFreq, self.high_cut_freq, !settings.high_cut_bypassed),
            rotary(ParamId::HighCutSlope, self.high_cut_slope, !settings.high_cut_bypassed),
        ]
    }
}

pub struct EqEditorApp {
    store: Arc<ParameterStore>,
    curve: ResponseCurveComponent,
    _input: AudioInput,
}

impl EqEditorApp {
    pub fn new(store: Arc<ParameterStore>, curve: ResponseCurveComponent, input: AudioInput) -> Self {
        Self {
            store,
            curve,
            _input: input,
        }
    }
}

impl eframe::App for EqEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(theme::BACKGROUND))
            .show(ctx, |ui| {
                let layout = EditorLayout::new(ui.max_rect());

                //
                // The curve ticker renders for the size seen here on its
                // next tick and requests a repaint when the frame is ready.
                //
                self.curve.set_bounds(widgets::to_bounds(layout.response));
                let frame = self.curve.latest_frame();

                let settings = self.store.snapshot();
                for control in layout.controls(&settings) {
                    control.show(ui, &self.store, frame.as_deref());
                }
            });
    }
}
