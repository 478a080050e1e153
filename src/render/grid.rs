use crate::geometry::{jmap, map_from_log10, Bounds, Point};

pub const GRID_FREQUENCIES: [f32; 10] = [
    20.0, 50.0, 100.0, 200.0, 500.0, 1_000.0, 2_000.0, 5_000.0, 10_000.0, 20_000.0,
];
pub const GRID_GAINS: [f32; 5] = [-24.0, -12.0, 0.0, 12.0, 24.0];

const LABEL_HEIGHT: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAnchor {
    Center,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
    /// The 0 dB line.
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLabel {
    pub position: Point,
    pub anchor: LabelAnchor,
    pub text: String,
    pub emphasized: bool,
}

/// Static background: frequency and gain lines plus their labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    pub lines: Vec<GridLine>,
    pub labels: Vec<GridLabel>,
}

/// "20Hz", "500Hz", "1kHz", "20kHz".
pub fn format_frequency(frequency: f32) -> String {
    if frequency > 999.0 {
        format!("{}kHz", frequency / 1000.0)
    } else {
        format!("{}Hz", frequency)
    }
}

/// "+12", "0", "-24".
pub fn format_gain(gain_db: f32) -> String {
    if gain_db > 0.0 {
        format!("+{}", gain_db)
    } else {
        format!("{}", gain_db)
    }
}

/// Lays the grid out over `render_area`. Labels sit in the margins of
/// `bounds`: frequencies along the top, response gains on the right and
/// spectrum levels (gain shifted down by `db_range`) on the left.
pub fn build_grid(
    bounds: Bounds,
    render_area: Bounds,
    min_frequency: f32,
    max_frequency: f32,
    db_range: f32,
) -> Grid {
    let mut grid = Grid::default();
    if render_area.width <= 0.0 || render_area.height <= 0.0 {
        return grid;
    }

    for &freq in GRID_FREQUENCIES
        .iter()
        .filter(|&&f| f >= min_frequency && f <= max_frequency)
    {
        let t = map_from_log10(freq, min_frequency, max_frequency);
        let x = render_area.left() + render_area.width * t;
        grid.lines.push(GridLine {
            from: Point::new(x, render_area.top()),
            to: Point::new(x, render_area.bottom()),
            emphasized: false,
        });
        grid.labels.push(GridLabel {
            position: Point::new(x, bounds.top() + 1.0 + LABEL_HEIGHT / 2.0),
            anchor: LabelAnchor::Center,
            text: format_frequency(freq),
            emphasized: false,
        });
    }

    for &gain in GRID_GAINS.iter().filter(|g| g.abs() <= db_range) {
        let y = jmap(gain, -db_range, db_range, render_area.bottom(), render_area.top());
        let emphasized = gain == 0.0;
        grid.lines.push(GridLine {
            from: Point::new(render_area.left(), y),
            to: Point::new(render_area.right(), y),
            emphasized,
        });
        grid.labels.push(GridLabel {
            position: Point::new(bounds.right() - 1.0, y),
            anchor: LabelAnchor::Right,
            text: format_gain(gain),
            emphasized,
        });
        grid.labels.push(GridLabel {
            position: Point::new(bounds.left() + 1.0, y),
            anchor: LabelAnchor::Left,
            text: format_gain(gain - db_range),
            emphasized: false,
        });
    }

    grid
}
