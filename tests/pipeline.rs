use eqscope::analysis::Channel;
use eqscope::config::AnalyzerConfig;
use eqscope::engine::{AudioTap, BlockAssembler};
use eqscope::filter::{ChainSettings, Slope};
use eqscope::geometry::{jmap, map_from_log10, Bounds};
use eqscope::params::{ParamId, ParameterStore};
use eqscope::render::{analysis_area, ResponseCurveRenderer};
use std::f32::consts::PI;
use std::sync::Arc;

const SAMPLE_RATE: f64 = 48_000.0;

fn feed_tone(tap: &AudioTap, freq: f32, samples: usize) {
    let mut assembler = BlockAssembler::new(tap.block_size());
    for i in 0..samples {
        let s = 0.5 * (2.0 * PI * freq * i as f32 / SAMPLE_RATE as f32).sin();
        assembler.push_frame(s, s * 0.25, tap);
    }
}

#[test]
fn tone_shows_up_in_the_spectrum_path() {
    let config = AnalyzerConfig::default();
    let tap = AudioTap::new(&config, SAMPLE_RATE).unwrap();
    let store = Arc::new(ParameterStore::default());
    let mut renderer = ResponseCurveRenderer::new(config.clone(), store, tap.clone()).unwrap();

    feed_tone(&tap, 1_000.0, config.window_size);
    assert_eq!(tap.fifo(Channel::Left).len(), config.window_size / config.block_size);

    let bounds = Bounds::new(0.0, 0.0, 600.0, 240.0);
    let frame = renderer.tick(bounds);

    assert_eq!(frame.response.len(), analysis_area(bounds).columns());
    let left = frame.left.as_ref().unwrap();
    let right = frame.right.as_ref().unwrap();
    assert_eq!(left.len(), frame.analysis_area.columns());
    assert_eq!(right.len(), left.len());

    // Highest point (smallest y) of the left path sits near 1 kHz.
    let area = frame.analysis_area;
    let peak = left
        .points()
        .iter()
        .min_by(|a, b| a.y.total_cmp(&b.y))
        .unwrap();
    let expected_x = area.left() + area.width * map_from_log10(1_000.0, 20.0, 20_000.0);
    assert!((peak.x - expected_x).abs() < 6.0, "peak at x={} expected {}", peak.x, expected_x);

    // The quieter right channel peaks lower on screen.
    let right_peak = right
        .points()
        .iter()
        .map(|p| p.y)
        .fold(f32::INFINITY, f32::min);
    assert!(right_peak > peak.y);

    assert_eq!(renderer.analyzer(Channel::Left).transforms(), 8);
    assert!(tap.fifo(Channel::Left).is_empty());
}

#[test]
fn response_tracks_parameter_edits() {
    let config = AnalyzerConfig::default();
    let tap = AudioTap::new(&config, SAMPLE_RATE).unwrap();
    let store = Arc::new(ParameterStore::new(ChainSettings {
        low_cut_bypassed: true,
        peak_bypassed: true,
        high_cut_bypassed: true,
        ..Default::default()
    }));
    let mut renderer = ResponseCurveRenderer::new(config, store.clone(), tap).unwrap();
    let bounds = Bounds::new(0.0, 0.0, 440.0, 214.0);

    //
    // Fully bypassed: flat line on the 0 dB grid line.
    //
    let frame = renderer.tick(bounds);
    let area = frame.analysis_area;
    let zero_db = jmap(0.0, -24.0, 24.0, area.bottom(), area.top());
    assert!(frame
        .response
        .points()
        .iter()
        .all(|p| (p.y - zero_db).abs() < 1e-3));

    //
    // Enable a steep low cut at 1 kHz: low frequencies drop below the floor
    // of the display, high frequencies stay at 0 dB.
    //
    store.update(|s| {
        s.low_cut_bypassed = false;
        s.low_cut_freq = 1_000.0;
        s.low_cut_slope = Slope::Db48;
    });
    let frame = renderer.tick(bounds);
    let points = frame.response.points();
    assert!(points[0].y > area.bottom());
    assert!((points[points.len() - 1].y - zero_db).abs() < 0.5);

    // Bypassing it again restores the flat line.
    store.set(ParamId::LowCutBypassed, 1.0);
    let frame = renderer.tick(bounds);
    assert!(frame
        .response
        .points()
        .iter()
        .all(|p| (p.y - zero_db).abs() < 1e-3));
}
