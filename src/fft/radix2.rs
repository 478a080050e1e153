use super::{w, DFTBase};
use num_complex::Complex32;

//
// Iterative radix-2 Cooley–Tukey for power-of-two sizes.
//
pub struct DFTRadix2 {
    n: usize,
    wtable: Vec<Complex32>,
}

impl DFTRadix2 {
    pub fn new(n: usize) -> Self {
        debug_assert!(n.is_power_of_two());

        //
        // Twiddles for the largest butterfly; smaller stages stride through it.
        //
        let wtable = (0..n / 2).map(|k| w(k, n)).collect();
        Self { n, wtable }
    }

    fn bit_reverse(&self, buffer: &mut [Complex32]) {
        let mut j = 0;
        for i in 1..self.n {
            let mut bit = self.n >> 1;
            while j & bit != 0 {
                j ^= bit;
                bit >>= 1;
            }
            j |= bit;
            if i < j {
                buffer.swap(i, j);
            }
        }
    }
}

impl DFTBase for DFTRadix2 {
    fn name(&self) -> String {
        format!("Radix2({})", self.n)
    }
    fn size(&self) -> usize {
        self.n
    }

    fn xform(&self, input: &[Complex32], output: &mut [Complex32]) {
        output[..self.n].copy_from_slice(&input[..self.n]);
        self.xform_inplace(&mut output[..self.n]);
    }

    fn xform_inplace(&self, buffer: &mut [Complex32]) {
        let n = self.n;
        self.bit_reverse(buffer);

        //
        // Butterfly passes, doubling the span each time.
        //
        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let stride = n / len;
            for start in (0..n).step_by(len) {
                for k in 0..half {
                    let tw = self.wtable[k * stride];
                    let u = buffer[start + k];
                    let v = buffer[start + k + half] * tw;
                    buffer[start + k] = u + v;
                    buffer[start + k + half] = u - v;
                }
            }
            len <<= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::naive::DFTNaive;
    use crate::fft::test_util::*;

    #[test]
    fn matches_direct_transform() {
        for n in [1, 2, 4, 8, 64, 256] {
            let input = ramp(n);
            let mut fast = vec![Complex32::default(); n];
            let mut direct = vec![Complex32::default(); n];

            DFTRadix2::new(n).xform(&input, &mut fast);
            DFTNaive::new(n).xform(&input, &mut direct);
            assert_close(&fast, &direct, 1e-3 * n as f32);
        }
    }

    #[test]
    fn cosine_lands_in_its_bin() {
        let n = 32;
        let mut buffer: Vec<Complex32> = (0..n)
            .map(|i| Complex32::new((2.0 * std::f32::consts::PI * 4.0 * i as f32 / n as f32).cos(), 0.0))
            .collect();
        DFTRadix2::new(n).xform_inplace(&mut buffer);

        assert!((buffer[4].norm() - n as f32 / 2.0).abs() < 1e-3);
        assert!((buffer[n - 4].norm() - n as f32 / 2.0).abs() < 1e-3);
        assert!(buffer[5].norm() < 1e-3);
    }
}
