mod audio;
mod gui;

use audio::{AudioInput, SyntheticSource};
use eqscope::config::AnalyzerConfig;
use eqscope::engine::AudioTap;
use eqscope::params::ParameterStore;
use eqscope::render::{ResponseCurveComponent, ResponseCurveRenderer};
use gui::EqEditorApp;
use std::error::Error;
use std::sync::Arc;

// Used until a device reports its own rate.
const FALLBACK_SAMPLE_RATE: f64 = 48_000.0;

fn main() -> Result<(), Box<dyn Error>> {
    //
    // Initialize logging with default filter set to "info".
    //
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting equalizer response display...");

    let config = AnalyzerConfig::default();
    config.validate()?;
    log::info!(
        "Analyzer: N={} ({:?}), block {}, floor {} dB, {} Hz tick",
        config.window_size,
        config.window_kind,
        config.block_size,
        config.db_floor,
        config.tick_hz
    );

    let store = Arc::new(ParameterStore::default());
    let tap = AudioTap::new(&config, FALLBACK_SAMPLE_RATE)?;

    //
    // Initialize audio capture, falling back to a generated tone.
    //
    log::info!("Initializing audio capture...");
    let input = match audio::start_capture(&tap) {
        Ok(stream) => AudioInput::Device(stream),
        Err(e) => {
            log::warn!("Audio capture unavailable: {}. Using synthetic tone.", e);
            AudioInput::Synthetic(SyntheticSource::start(tap.clone())?)
        }
    };

    let tick_hz = config.tick_hz;
    let renderer = ResponseCurveRenderer::new(config, store.clone(), tap)?;

    //
    // Initialize GUI configuration.
    //
    log::info!("Initializing GUI...");
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([600.0, 480.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title("eqscope"),
        ..Default::default()
    };

    eframe::run_native(
        "eqscope",
        options,
        Box::new(move |cc| {
            gui::theme::setup_global_style(&cc.egui_ctx);

            //
            // The curve component owns the repaint ticker; it asks egui for
            // a repaint whenever a new frame is ready.
            //
            let ctx = cc.egui_ctx.clone();
            let curve = ResponseCurveComponent::new(renderer, tick_hz, move || ctx.request_repaint())?;

            Ok(Box::new(EqEditorApp::new(store, curve, input)))
        }),
    )?;

    log::info!("Shutting down");
    Ok(())
}
