#[cfg(feature = "use_fftw")]
pub mod fftw;
pub mod naive;
pub mod radix2;
pub mod window;

pub use window::WindowKind;

use lazy_static::lazy_static;
use num_complex::Complex32;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::f32::consts::PI;
use std::sync::Arc;

/// Base interface for all DFT implementations.
pub trait DFTBase: Send + Sync {
    /// Forward transform of `input` into `output`; both hold `size()` values.
    fn xform(&self, input: &[Complex32], output: &mut [Complex32]);

    /// Default in-place transform: temporary buffer copy.
    fn xform_inplace(&self, buffer: &mut [Complex32]) {
        let temp = buffer.to_vec();
        self.xform(&temp, buffer);
    }

    fn name(&self) -> String;
    fn size(&self) -> usize;
}

/// Twiddle factor `e^(-2πik/n)`.
pub(crate) fn w(k: usize, n: usize) -> Complex32 {
    let angle = -2.0 * PI * (k as f32) / (n as f32);
    Complex32::from_polar(1.0, angle)
}

lazy_static! {
    static ref PLAN_CACHE: Mutex<HashMap<usize, Arc<dyn DFTBase>>> = Mutex::new(HashMap::new());
}

/// Returns a DFT plan for size `n`, using caching and heuristic selection.
pub fn find_dft(n: usize) -> Arc<dyn DFTBase> {
    // Cached plan lookup.
    {
        let cache = PLAN_CACHE.lock();
        if let Some(plan) = cache.get(&n) {
            return plan.clone();
        }
    }

    // Strategy selection.
    let plan: Arc<dyn DFTBase> = if cfg!(feature = "use_fftw") {
        #[cfg(feature = "use_fftw")]
        {
            Arc::new(fftw::DFTFftw::new(n))
        }
        #[cfg(not(feature = "use_fftw"))]
        {
            unreachable!()
        }
    } else if n.is_power_of_two() {
        Arc::new(radix2::DFTRadix2::new(n))
    } else {
        Arc::new(naive::DFTNaive::new(n))
    };

    log::debug!("Planned {} for N={}", plan.name(), n);

    // Cache the plan.
    let mut cache = PLAN_CACHE.lock();
    cache.insert(n, plan.clone());
    plan
}
