use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use eqscope::engine::{AudioTap, BlockAssembler};
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no audio input device found")]
    NoInputDevice,

    #[error("failed to get default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported audio sample format: {0:?}")]
    UnsupportedFormat(SampleFormat),
}

/// Whatever is feeding the tap; dropping it stops the audio.
#[allow(dead_code)]
pub enum AudioInput {
    Device(cpal::Stream),
    Synthetic(SyntheticSource),
}

/// Starts capture on the default input device and publishes its sample rate
/// to the tap. Stereo input is split into the two channels; mono input feeds
/// both.
pub fn start_capture(tap: &AudioTap) -> Result<cpal::Stream, CaptureError> {
    let host = cpal::default_host();

    //
    // Log all available input devices for debugging.
    //
    log::info!("--- AVAILABLE INPUT DEVICES ---");
    if let Ok(devices) = host.input_devices() {
        for (i, dev) in devices.enumerate() {
            let name = dev.name().unwrap_or_else(|_| "Unknown".into());
            log::info!("  [{}]: {}", i, name);
        }
    }
    log::info!("-------------------------------");

    let device = host
        .default_input_device()
        .ok_or(CaptureError::NoInputDevice)?;

    log::info!(
        "Selected audio device: {}",
        device.name().unwrap_or_else(|_| "Unknown".into())
    );

    let supported_config = device.default_input_config()?;
    let sample_format = supported_config.sample_format();
    let config: cpal::StreamConfig = supported_config.into();

    log::info!(
        "Audio config: {:?} @ {}Hz, Channels: {}",
        sample_format,
        config.sample_rate.0,
        config.channels
    );
    tap.set_sample_rate(f64::from(config.sample_rate.0));

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, tap.clone())?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, tap.clone())?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, tap.clone())?,
        other => return Err(CaptureError::UnsupportedFormat(other)),
    };

    stream.play()?;
    Ok(stream)
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    tap: AudioTap,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = usize::from(config.channels).max(1);
    let mut assembler = BlockAssembler::new(tap.block_size());

    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            for frame in data.chunks_exact(channels) {
                let left = f32::from_sample(frame[0]);
                let right = frame.get(1).map_or(left, |&s| f32::from_sample(s));
                assembler.push_frame(left, right, &tap);
            }
        },
        |err| log::error!("Audio input error: {}", err),
        None,
    )
}

/// Test signal: a sine per channel plus a quieter shared partial.
struct ToneGenerator {
    sample_rate: f32,
    phases: [f32; 3],
}

impl ToneGenerator {
    const FREQUENCIES: [f32; 3] = [440.0, 1_000.0, 5_000.0];

    fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            phases: [0.0; 3],
        }
    }

    fn fill(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let [a, b, c] = self.phases.map(f32::sin);
            *l = 0.5 * a + 0.05 * c;
            *r = 0.5 * b + 0.05 * c;

            for (phase, freq) in self.phases.iter_mut().zip(Self::FREQUENCIES) {
                *phase = (*phase + TAU * freq / self.sample_rate) % TAU;
            }
        }
    }
}

/// Feeds a synthetic tone into the tap at real-time pace, for machines
/// without a usable input device.
pub struct SyntheticSource {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SyntheticSource {
    pub fn start(tap: AudioTap) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();

        let handle = thread::Builder::new()
            .name("synthetic-audio".into())
            .spawn(move || {
                let block = tap.block_size();
                let sample_rate = tap.sample_rate();
                let period = Duration::from_secs_f64(block as f64 / sample_rate);
                let mut tone = ToneGenerator::new(sample_rate as f32);
                let (mut left, mut right) = (vec![0.0; block], vec![0.0; block]);

                log::info!("Synthetic source running at {} Hz", sample_rate);
                let mut deadline = Instant::now();
                while !flag.load(Ordering::Acquire) {
                    tone.fill(&mut left, &mut right);
                    tap.push_stereo(&left, &right);

                    deadline += period;
                    let now = Instant::now();
                    if deadline > now {
                        thread::sleep(deadline - now);
                    } else {
                        deadline = now;
                    }
                }
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
