use super::generator::SpectralFrame;
use crate::fifo::Fifo;
use crate::geometry::{jmap, map_to_log10, Bounds, Point};

/// Polyline in pixel coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPath {
    points: Vec<Point>,
}

impl RenderPath {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.points.push(Point::new(x, y));
    }
}

/// Linear interpolation between neighbouring bins at a fractional index.
fn sample_bins(bins: &[f32], position: f32) -> f32 {
    let last = bins.len() - 1;
    let position = position.clamp(0.0, last as f32);
    let index = position.floor() as usize;
    if index >= last {
        return bins[last];
    }
    let frac = position - index as f32;
    bins[index] + (bins[index + 1] - bins[index]) * frac
}

/// Turns spectral frames into smoothed screen-space paths.
pub struct PathGenerator {
    paths: Fifo<RenderPath>,
    smoothing_rate: f32,
    min_frequency: f32,
    max_frequency: f32,
    levels: Vec<f32>,
}

impl PathGenerator {
    pub fn new(capacity: usize, smoothing_rate: f32, min_frequency: f32, max_frequency: f32) -> Self {
        Self {
            paths: Fifo::new(capacity, RenderPath::default),
            smoothing_rate,
            min_frequency,
            max_frequency,
            levels: Vec::new(),
        }
    }

    /// Maps one frame onto `bounds`, one point per pixel column.
    ///
    /// Each column's level moves `smoothing_rate` of the way towards the new
    /// value. The first frame, or one drawn at a new width, is used as is.
    /// Levels are kept in dB, so moving or resizing `bounds` vertically
    /// never leaves points outside it.
    pub fn generate_path(
        &mut self,
        frame: &SpectralFrame,
        bounds: Bounds,
        fft_size: usize,
        bin_width: f32,
        floor_db: f32,
    ) {
        let columns = bounds.columns();
        let bins = &frame.as_slice()[..frame.len().min(fft_size / 2 + 1)];
        if columns == 0 || bins.is_empty() || !(bin_width > 0.0) {
            return;
        }

        let fresh = self.levels.len() != columns;
        if fresh {
            self.levels.clear();
            self.levels.resize(columns, floor_db);
        }

        for (col, level) in self.levels.iter_mut().enumerate() {
            let t = col as f32 / columns as f32;
            let freq = map_to_log10(t, self.min_frequency, self.max_frequency);
            let target = sample_bins(bins, freq / bin_width).clamp(floor_db, 0.0);
            *level = if fresh {
                target
            } else {
                *level + self.smoothing_rate * (target - *level)
            };
        }

        let levels = &self.levels;
        self.paths.push_with(|path| {
            path.clear();
            for (col, &db) in levels.iter().enumerate() {
                let y = jmap(db, floor_db, 0.0, bounds.bottom(), bounds.top())
                    .clamp(bounds.top(), bounds.bottom());
                path.line_to(bounds.left() + col as f32, y);
            }
        });
    }

    pub fn available_paths(&self) -> usize {
        self.paths.len()
    }

    /// Most recent completed path; older ones are discarded.
    pub fn pull_latest(&self, out: &mut RenderPath) -> bool {
        self.paths.pop_latest(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOR: f32 = -48.0;

    fn flat_frame(db: f32) -> SpectralFrame {
        SpectralFrame::from_decibels(vec![db; 9])
    }

    fn generate(generator: &mut PathGenerator, frame: &SpectralFrame, bounds: Bounds) -> RenderPath {
        generator.generate_path(frame, bounds, 16, 3_000.0, FLOOR);
        let mut path = RenderPath::default();
        assert!(generator.pull_latest(&mut path));
        path
    }

    #[test]
    fn one_point_per_column_inside_bounds() {
        let bounds = Bounds::new(10.0, 5.0, 50.0, 40.0);
        let mut generator = PathGenerator::new(4, 0.2, 20.0, 20_000.0);
        let path = generate(&mut generator, &flat_frame(-12.0), bounds);

        assert_eq!(path.len(), 50);
        assert_eq!(path.points()[0].x, 10.0);
        assert_eq!(path.points()[49].x, 59.0);
        // -12 dB is a quarter of the way down from the top.
        for p in path.points() {
            assert!((p.y - 15.0).abs() < 1e-4);
        }
    }

    #[test]
    fn levels_above_zero_are_clamped_to_top() {
        let bounds = Bounds::new(0.0, 0.0, 8.0, 48.0);
        let mut generator = PathGenerator::new(4, 0.2, 20.0, 20_000.0);
        let path = generate(&mut generator, &flat_frame(6.0), bounds);
        assert!(path.points().iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn smoothing_converges_without_overshoot() {
        let bounds = Bounds::new(0.0, 0.0, 4.0, 48.0);
        let mut generator = PathGenerator::new(4, 0.2, 20.0, 20_000.0);

        let start = generate(&mut generator, &flat_frame(-40.0), bounds).points()[0].y;
        let target_frame = flat_frame(-8.0);
        let target = 8.0;
        assert!((start - 40.0).abs() < 1e-4);

        let mut previous = start;
        for _ in 0..60 {
            let y = generate(&mut generator, &target_frame, bounds).points()[0].y;
            assert!(y <= previous, "not monotonic");
            assert!(y >= target - 1e-4 && y <= start + 1e-4, "overshoot");
            previous = y;
        }
        assert!((previous - target).abs() < 0.01);

        // First step covers exactly `rate` of the distance.
        let mut generator = PathGenerator::new(4, 0.2, 20.0, 20_000.0);
        generate(&mut generator, &flat_frame(-40.0), bounds);
        let first = generate(&mut generator, &target_frame, bounds).points()[0].y;
        assert!((first - (40.0 + 0.2 * (target - 40.0))).abs() < 1e-4);
    }

    #[test]
    fn width_change_restarts_smoothing() {
        let mut generator = PathGenerator::new(4, 0.2, 20.0, 20_000.0);
        generate(&mut generator, &flat_frame(-40.0), Bounds::new(0.0, 0.0, 4.0, 48.0));
        let path = generate(&mut generator, &flat_frame(0.0), Bounds::new(0.0, 0.0, 6.0, 48.0));
        assert_eq!(path.len(), 6);
        assert_eq!(path.points()[0].y, 0.0);
    }

    #[test]
    fn height_change_keeps_points_inside_bounds() {
        let mut generator = PathGenerator::new(4, 0.2, 20.0, 20_000.0);
        let tall = generate(&mut generator, &flat_frame(FLOOR), Bounds::new(0.0, 0.0, 4.0, 400.0));
        assert!(tall.points().iter().all(|p| p.y == 400.0));

        let short = Bounds::new(0.0, 20.0, 4.0, 100.0);
        let path = generate(&mut generator, &flat_frame(FLOOR), short);
        for p in path.points() {
            assert!(p.y >= short.top() && p.y <= short.bottom(), "y={} outside bounds", p.y);
        }
        assert!(path.points().iter().all(|p| p.y == short.bottom()));

        // Smoothing carries on across the move instead of restarting.
        let path = generate(&mut generator, &flat_frame(0.0), short);
        let expected = jmap(FLOOR + 0.2 * (0.0 - FLOOR), FLOOR, 0.0, short.bottom(), short.top());
        assert!((path.points()[0].y - expected).abs() < 1e-3);
    }

    #[test]
    fn consumer_gets_only_the_latest_path() {
        let bounds = Bounds::new(0.0, 0.0, 4.0, 48.0);
        let mut generator = PathGenerator::new(4, 1.0, 20.0, 20_000.0);
        generator.generate_path(&flat_frame(-40.0), bounds, 16, 3_000.0, FLOOR);
        generator.generate_path(&flat_frame(-10.0), bounds, 16, 3_000.0, FLOOR);
        assert_eq!(generator.available_paths(), 2);

        let mut path = RenderPath::default();
        assert!(generator.pull_latest(&mut path));
        assert!((path.points()[0].y - 10.0).abs() < 1e-4);
        assert_eq!(generator.available_paths(), 0);
    }

    #[test]
    fn interpolates_between_bins() {
        assert_eq!(sample_bins(&[0.0, 10.0], 0.25), 2.5);
        assert_eq!(sample_bins(&[0.0, 10.0], 5.0), 10.0);
        assert_eq!(sample_bins(&[4.0], 0.7), 4.0);
    }
}
