use super::{w, DFTBase};
use num_complex::Complex32;

//
// Direct O(n²) transform, used for sizes without a fast path.
//
pub struct DFTNaive {
    n: usize,
    wtable: Vec<Complex32>,
}

impl DFTNaive {
    pub fn new(n: usize) -> Self {
        //
        // Precompute one full turn of twiddle values.
        //
        let wtable = (0..n).map(|k| w(k, n)).collect();
        Self { n, wtable }
    }
}

impl DFTBase for DFTNaive {
    fn name(&self) -> String {
        format!("Direct({})", self.n)
    }
    fn size(&self) -> usize {
        self.n
    }

    fn xform(&self, input: &[Complex32], output: &mut [Complex32]) {
        for (k, out) in output.iter_mut().enumerate().take(self.n) {
            let mut acc = Complex32::default();
            for (j, &x) in input.iter().enumerate().take(self.n) {
                acc += x * self.wtable[(k * j) % self.n];
            }
            *out = acc;
        }
    }
}
