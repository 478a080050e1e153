use super::{CurveFrame, RenderError, ResponseCurveRenderer, Ticker};
use crate::geometry::Bounds;
use parking_lot::Mutex;
use std::sync::Arc;

/// Runs a [`ResponseCurveRenderer`] on its own ticker and keeps the most
/// recent frame for the display to pick up.
///
/// The ticker starts in [`new`](Self::new) and is stopped and joined when the
/// component is dropped.
pub struct ResponseCurveComponent {
    renderer: Arc<Mutex<ResponseCurveRenderer>>,
    latest: Arc<Mutex<Option<Arc<CurveFrame>>>>,
    bounds: Arc<Mutex<Bounds>>,
    ticker: Ticker,
}

impl ResponseCurveComponent {
    /// `on_frame` runs on the ticker thread after each new frame, e.g. to
    /// request a repaint.
    pub fn new<F>(renderer: ResponseCurveRenderer, tick_hz: u32, on_frame: F) -> Result<Self, RenderError>
    where
        F: Fn() + Send + 'static,
    {
        let renderer = Arc::new(Mutex::new(renderer));
        let latest = Arc::new(Mutex::new(None));
        let bounds = Arc::new(Mutex::new(Bounds::default()));

        let ticker = {
            let renderer = renderer.clone();
            let latest = latest.clone();
            let bounds = bounds.clone();
            Ticker::start("curve-ticker", tick_hz, move || {
                let size = *bounds.lock();
                let frame = renderer.lock().tick(size);
                *latest.lock() = Some(Arc::new(frame));
                on_frame();
            })?
        };

        Ok(Self {
            renderer,
            latest,
            bounds,
            ticker,
        })
    }

    /// Display size used from the next tick on.
    pub fn set_bounds(&self, bounds: Bounds) {
        *self.bounds.lock() = bounds;
    }

    pub fn latest_frame(&self) -> Option<Arc<CurveFrame>> {
        self.latest.lock().clone()
    }

    /// Runs one tick on the calling thread, outside the ticker schedule.
    pub fn tick_now(&self) -> Arc<CurveFrame> {
        let size = *self.bounds.lock();
        let frame = Arc::new(self.renderer.lock().tick(size));
        *self.latest.lock() = Some(frame.clone());
        frame
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn stop(&mut self) {
        self.ticker.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::engine::AudioTap;
    use crate::params::ParameterStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn publishes_frames_until_stopped() {
        let config = AnalyzerConfig::default();
        let tap = AudioTap::new(&config, 48_000.0).unwrap();
        let renderer =
            ResponseCurveRenderer::new(config, Arc::new(ParameterStore::default()), tap).unwrap();

        let frames = Arc::new(AtomicUsize::new(0));
        let counter = frames.clone();
        let mut component = ResponseCurveComponent::new(renderer, 200, move || {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        component.set_bounds(Bounds::new(0.0, 0.0, 240.0, 120.0));

        std::thread::sleep(Duration::from_millis(100));
        component.stop();
        assert!(!component.is_running());
        assert!(frames.load(Ordering::Relaxed) > 0);

        let frame = component.tick_now();
        assert_eq!(frame.response.len(), 200);
        assert!(Arc::ptr_eq(&frame, &component.latest_frame().unwrap()));
    }
}
