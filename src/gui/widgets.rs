use super::theme;
use eframe::egui::{self, Align2, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Vec2};
use eqscope::analysis::RenderPath;
use eqscope::filter::Slope;
use eqscope::geometry::{Bounds, Point};
use eqscope::params::{ParamId, ParameterStore};
use eqscope::render::grid::{format_frequency, format_gain};
use eqscope::render::{CurveFrame, LabelAnchor};
use std::f32::consts::{PI, TAU};

// Pointer sweep from 7:30 to 4:30, clockwise from 12 o'clock.
const START_ANGLE: f32 = PI + PI / 4.0;
const END_ANGLE: f32 = PI - PI / 4.0 + TAU;
const DRAG_SPEED: f32 = 0.005;

pub fn to_pos(p: Point) -> Pos2 {
    Pos2::new(p.x, p.y)
}

pub fn to_rect(b: Bounds) -> Rect {
    Rect::from_min_size(Pos2::new(b.x, b.y), Vec2::new(b.width, b.height))
}

pub fn to_bounds(r: Rect) -> Bounds {
    Bounds::new(r.min.x, r.min.y, r.width(), r.height())
}

fn point_on_circle(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + Vec2::new(angle.sin(), -angle.cos()) * radius
}

/// Labels drawn under the start and end of a rotary's sweep.
pub fn range_labels(param: ParamId) -> (String, String) {
    let range = param.range();
    match param {
        ParamId::LowCutFreq | ParamId::PeakFreq | ParamId::HighCutFreq => {
            (format_frequency(range.min), format_frequency(range.max))
        }
        ParamId::PeakGain => (
            format!("{}dB", format_gain(range.min)),
            format!("{}dB", format_gain(range.max)),
        ),
        ParamId::PeakQuality => (format!("{:.1}", range.min), format!("{:.1}", range.max)),
        ParamId::LowCutSlope | ParamId::HighCutSlope => {
            let first = Slope::ALL[0].db_per_octave();
            let last = Slope::ALL[Slope::ALL.len() - 1].db_per_octave();
            (first.to_string(), last.to_string())
        }
        _ => (String::new(), String::new()),
    }
}

pub struct RotaryControl {
    pub param: ParamId,
    pub rect: Rect,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleKind {
    /// Lit while the section is active, i.e. the bypass parameter is off.
    Power,
    /// Lit while the analyzer is enabled.
    Analyzer,
}

pub struct ToggleControl {
    pub param: ParamId,
    pub kind: ToggleKind,
    pub rect: Rect,
}

pub struct CurveDisplay {
    pub rect: Rect,
}

/// Every widget on the editor.
pub enum Control {
    Rotary(RotaryControl),
    Toggle(ToggleControl),
    Curve(CurveDisplay),
}

impl Control {
    pub fn show(&self, ui: &mut egui::Ui, store: &ParameterStore, frame: Option<&CurveFrame>) {
        match self {
            Control::Rotary(rotary) => rotary.show(ui, store),
            Control::Toggle(toggle) => toggle.show(ui, store),
            Control::Curve(curve) => curve.show(ui, frame),
        }
    }
}

impl RotaryControl {
    fn show(&self, ui: &mut egui::Ui, store: &ParameterStore) {
        let id = ui.id().with(self.param.name());
        let sense = if self.enabled {
            Sense::click_and_drag()
        } else {
            Sense::hover()
        };
        let response = ui.interact(self.rect, id, sense);
        let range = self.param.range();

        //
        // Vertical or horizontal drag moves the normalised position; the
        // unrounded position is kept so choice parameters can be dragged
        // through.
        //
        if response.drag_started() {
            let start = range.to_normalized(store.get(self.param));
            ui.data_mut(|d| d.insert_temp(id, start));
        }
        if response.dragged() {
            let delta = response.drag_delta();
            let current = ui
                .data(|d| d.get_temp::<f32>(id))
                .unwrap_or_else(|| range.to_normalized(store.get(self.param)));
            let next = (current + (delta.x - delta.y) * DRAG_SPEED).clamp(0.0, 1.0);
            ui.data_mut(|d| d.insert_temp(id, next));
            store.set(self.param, range.from_normalized(next));
        }
        if response.double_clicked() {
            store.set(self.param, range.default);
        }

        self.paint(ui.painter(), store.get(self.param));
    }

    fn paint(&self, painter: &Painter, value: f32) {
        let text_height = theme::TEXT_HEIGHT;
        let size = self.rect.width().min(self.rect.height()) - text_height * 2.0;
        if size <= 0.0 {
            return;
        }

        let knob = Rect::from_center_size(
            Pos2::new(self.rect.center().x, self.rect.top() + 2.0 + size / 2.0),
            Vec2::splat(size),
        );
        let center = knob.center();
        let radius = size / 2.0;
        let font = FontId::proportional(text_height);

        let (fill, rim, box_fill, text) = if self.enabled {
            (theme::KNOB_FILL, theme::KNOB_RIM, egui::Color32::BLACK, egui::Color32::WHITE)
        } else {
            (theme::DARK_GREY, theme::GREY, theme::DARK_GREY, theme::LIGHT_GREY)
        };

        painter.circle_filled(center, radius, fill);
        painter.circle_stroke(center, radius, Stroke::new(1.0, rim));

        let angle = START_ANGLE + self.param.range().to_normalized(value) * (END_ANGLE - START_ANGLE);
        painter.line_segment(
            [
                point_on_circle(center, text_height * 1.5, angle),
                point_on_circle(center, radius, angle),
            ],
            Stroke::new(4.0, rim),
        );

        //
        // Value readout in a box over the knob centre.
        //
        let label = self.param.display_string(value);
        let galley = painter.layout_no_wrap(label.clone(), font.clone(), text);
        let readout = Rect::from_center_size(center, galley.size() + Vec2::new(4.0, 2.0));
        painter.rect_filled(readout, 0.0, box_fill);
        painter.text(center, Align2::CENTER_CENTER, label, font.clone(), text);

        let (min_label, max_label) = range_labels(self.param);
        for (pos, label) in [(0.0, min_label), (1.0, max_label)] {
            let angle = START_ANGLE + pos * (END_ANGLE - START_ANGLE);
            let at = point_on_circle(center, radius + text_height * 0.5 + 1.0, angle)
                + Vec2::new(0.0, text_height);
            painter.text(at, Align2::CENTER_CENTER, label, font.clone(), theme::KNOB_LABEL);
        }
    }
}

impl ToggleControl {
    fn show(&self, ui: &mut egui::Ui, store: &ParameterStore) {
        let id = ui.id().with(self.param.name());
        let response = ui.interact(self.rect, id, Sense::click());
        if response.clicked() {
            let on = store.get(self.param) >= 0.5;
            store.set(self.param, if on { 0.0 } else { 1.0 });
        }

        let on = store.get(self.param) >= 0.5;
        let painter = ui.painter();
        match self.kind {
            ToggleKind::Power => self.paint_power(painter, on),
            ToggleKind::Analyzer => self.paint_analyzer(painter, on),
        }
    }

    fn paint_power(&self, painter: &Painter, bypassed: bool) {
        let size = self.rect.width().min(self.rect.height()) - 6.0;
        if size <= 7.0 {
            return;
        }
        let r = Rect::from_center_size(self.rect.center(), Vec2::splat(size));
        let color = if bypassed {
            theme::DIM_GREY
        } else {
            theme::ACTIVE_GREEN
        };
        let stroke = Stroke::new(2.0, color);

        //
        // Open arc with a gap at the top, and the stem through the gap.
        //
        let arc_radius = (size - 7.0) * 0.5;
        let gap = 25f32.to_radians();
        let steps = 32;
        let arc: Vec<Pos2> = (0..=steps)
            .map(|i| {
                let angle = gap + (TAU - 2.0 * gap) * i as f32 / steps as f32;
                point_on_circle(r.center(), arc_radius, angle)
            })
            .collect();
        painter.add(Shape::line(arc, stroke));
        painter.line_segment([Pos2::new(r.center().x, r.top()), r.center()], stroke);
        painter.circle_stroke(r.center(), size * 0.5, stroke);
    }

    fn paint_analyzer(&self, painter: &Painter, enabled: bool) {
        let color = if enabled {
            theme::ACTIVE_GREEN
        } else {
            theme::DIM_GREY
        };
        painter.rect_stroke(self.rect, 0.0, Stroke::new(1.0, color));

        // Fixed jagged trace standing in for a spectrum.
        let inner = self.rect.shrink(4.0);
        let points: Vec<Pos2> = (0..)
            .map(|i| inner.left() + 2.0 * i as f32)
            .take_while(|&x| x <= inner.right())
            .enumerate()
            .map(|(i, x)| {
                let level = ((i * 7919 + 3) % 13) as f32 / 12.0;
                Pos2::new(x, inner.top() + inner.height() * level)
            })
            .collect();
        if points.len() > 1 {
            painter.add(Shape::line(points, Stroke::new(1.0, color)));
        }
    }
}

impl CurveDisplay {
    fn show(&self, ui: &mut egui::Ui, frame: Option<&CurveFrame>) {
        let painter = ui.painter_at(self.rect);
        painter.rect_filled(self.rect, 0.0, theme::BACKGROUND);

        let Some(frame) = frame else {
            return;
        };

        //
        // Background grid and labels.
        //
        for line in &frame.grid.lines {
            let vertical = line.from.x == line.to.x;
            let color = if line.emphasized {
                theme::ACTIVE_GREEN
            } else if vertical {
                theme::DIM_GREY
            } else {
                theme::DARK_GREY
            };
            painter.line_segment([to_pos(line.from), to_pos(line.to)], Stroke::new(1.0, color));
        }

        let font = FontId::proportional(theme::GRID_TEXT_HEIGHT);
        for label in &frame.grid.labels {
            let align = match label.anchor {
                LabelAnchor::Center => Align2::CENTER_CENTER,
                LabelAnchor::Left => Align2::LEFT_CENTER,
                LabelAnchor::Right => Align2::RIGHT_CENTER,
            };
            let color = if label.emphasized {
                theme::ACTIVE_GREEN
            } else {
                theme::LIGHT_GREY
            };
            painter.text(to_pos(label.position), align, &label.text, font.clone(), color);
        }

        //
        // Spectrum paths, then the response curve on top.
        //
        let area = to_rect(frame.render_area);
        let clipped = painter.with_clip_rect(area);
        if let Some(path) = &frame.left {
            stroke_path(&clipped, path, Stroke::new(1.0, theme::LEFT_SPECTRUM));
        }
        if let Some(path) = &frame.right {
            stroke_path(&clipped, path, Stroke::new(1.0, theme::RIGHT_SPECTRUM));
        }

        painter.rect_stroke(area, 4.0, Stroke::new(1.0, theme::CURVE_BORDER));
        stroke_path(&clipped, &frame.response, Stroke::new(2.0, theme::RESPONSE));
    }
}

fn stroke_path(painter: &Painter, path: &RenderPath, stroke: Stroke) {
    if path.len() < 2 {
        return;
    }
    let points: Vec<Pos2> = path.points().iter().map(|&p| to_pos(p)).collect();
    painter.add(Shape::line(points, stroke));
}
