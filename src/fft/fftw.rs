use super::DFTBase;
use fftw::array::AlignedVec;
use fftw::plan::{C2CPlan, C2CPlan32};
use fftw::types::{c32, Flag, Sign};
use num_complex::Complex32;
use parking_lot::Mutex;

/// FFTW3 wrapper providing a dedicated internal buffer and plan.
/// The internal state is guarded by a mutex because FFTW plan/buffer
/// combinations are not thread-safe under concurrent writes.
pub struct DFTFftw {
    n: usize,
    state: Mutex<InternalState>,
}

struct InternalState {
    plan: C2CPlan32,
    //
    // Aligned staging buffers the plan was measured against.
    //
    input: AlignedVec<c32>,
    output: AlignedVec<c32>,
}

impl DFTFftw {
    pub fn new(n: usize) -> Self {
        //
        // Create a forward FFT plan with MEASURE.
        //
        let plan = C2CPlan::aligned(&[n], Sign::Forward, Flag::MEASURE)
            .expect("Failed to create FFTW plan");

        Self {
            n,
            state: Mutex::new(InternalState {
                plan,
                input: AlignedVec::new(n),
                output: AlignedVec::new(n),
            }),
        }
    }
}

impl DFTBase for DFTFftw {
    fn name(&self) -> String {
        format!("FFTW({})", self.n)
    }

    fn size(&self) -> usize {
        self.n
    }

    fn xform(&self, input: &[Complex32], output: &mut [Complex32]) {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        state.input.copy_from_slice(&input[..self.n]);
        if let Err(err) = state.plan.c2c(&mut state.input, &mut state.output) {
            log::error!("FFTW execution failed: {:?}", err);
            output[..self.n].fill(Complex32::default());
            return;
        }
        output[..self.n].copy_from_slice(&state.output);
    }

    fn xform_inplace(&self, buffer: &mut [Complex32]) {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        state.input.copy_from_slice(&buffer[..self.n]);
        if let Err(err) = state.plan.c2c(&mut state.input, &mut state.output) {
            log::error!("FFTW execution failed: {:?}", err);
            return;
        }
        buffer[..self.n].copy_from_slice(&state.output);
    }
}
