use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Fixed-rate callback on a dedicated thread.
///
/// Ticks that overrun their slot are coalesced: the schedule skips ahead
/// instead of firing a burst of late ticks. Dropping the ticker stops and
/// joins the thread.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    period: Duration,
}

impl Ticker {
    pub fn start<F>(name: &str, rate_hz: u32, mut on_tick: F) -> std::io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let period = Duration::from_nanos(1_000_000_000 / u64::from(rate_hz.max(1)));
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();

        let handle = thread::Builder::new().name(name.into()).spawn(move || {
            let mut deadline = Instant::now() + period;
            while !flag.load(Ordering::Acquire) {
                on_tick();

                let now = Instant::now();
                if deadline > now {
                    thread::sleep(deadline - now);
                    deadline += period;
                } else {
                    let behind = (now - deadline).as_nanos() / period.as_nanos().max(1);
                    deadline += period * (behind as u32 + 1);
                }
            }
        })?;

        log::debug!("Started ticker '{}' at {} Hz", name, rate_hz);
        Ok(Self {
            stop,
            handle: Some(handle),
            period,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Signals the thread and waits for the tick in flight to finish.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
