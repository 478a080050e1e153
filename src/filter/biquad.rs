use num_complex::Complex64;
use std::f64::consts::PI;

/// Biquad coefficient set, normalised so that `a0 == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Coefficients {
    /// Pass-through section.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a0: 1.0,
        a1: 0.0,
        a2: 0.0,
    };

    fn normalized(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a0: 1.0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// RBJ peaking EQ.
    pub fn peak(sample_rate: f64, frequency: f64, q: f64, gain_db: f64) -> Self {
        let a = 10f64.powf(gain_db / 40.0);
        let omega = 2.0 * PI * frequency.max(2.0) / sample_rate;
        let alpha = omega.sin() / (2.0 * q);
        let c2 = -2.0 * omega.cos();

        Self::normalized(
            1.0 + alpha * a,
            c2,
            1.0 - alpha * a,
            1.0 + alpha / a,
            c2,
            1.0 - alpha / a,
        )
    }

    /// Second-order high-pass section.
    pub fn high_pass(sample_rate: f64, frequency: f64, q: f64) -> Self {
        let omega = 2.0 * PI * frequency / sample_rate;
        let cosw = omega.cos();
        let alpha = omega.sin() / (2.0 * q);

        Self::normalized(
            (1.0 + cosw) / 2.0,
            -(1.0 + cosw),
            (1.0 + cosw) / 2.0,
            1.0 + alpha,
            -2.0 * cosw,
            1.0 - alpha,
        )
    }

    /// Second-order low-pass section.
    pub fn low_pass(sample_rate: f64, frequency: f64, q: f64) -> Self {
        let omega = 2.0 * PI * frequency / sample_rate;
        let cosw = omega.cos();
        let alpha = omega.sin() / (2.0 * q);

        Self::normalized(
            (1.0 - cosw) / 2.0,
            1.0 - cosw,
            (1.0 - cosw) / 2.0,
            1.0 + alpha,
            -2.0 * cosw,
            1.0 - alpha,
        )
    }

    /// `|H(e^jω)|` at `frequency`.
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        let omega = 2.0 * PI * frequency / sample_rate;
        let z1 = Complex64::from_polar(1.0, -omega);
        let z2 = z1 * z1;

        let numerator = self.b0 + z1 * self.b1 + z2 * self.b2;
        let denominator = self.a0 + z1 * self.a1 + z2 * self.a2;
        numerator.norm() / denominator.norm()
    }
}

/// Q of each section in an even-order Butterworth cascade.
fn butterworth_qs(order: usize) -> impl Iterator<Item = f64> {
    (0..order / 2).map(move |i| {
        1.0 / (2.0 * ((2.0 * i as f64 + 1.0) * PI / (order as f64 * 2.0)).cos())
    })
}

/// High-pass Butterworth of even `order`, as `order / 2` biquads.
pub fn butterworth_high_pass(frequency: f64, sample_rate: f64, order: usize) -> Vec<Coefficients> {
    butterworth_qs(order)
        .map(|q| Coefficients::high_pass(sample_rate, frequency, q))
        .collect()
}

/// Low-pass Butterworth of even `order`, as `order / 2` biquads.
pub fn butterworth_low_pass(frequency: f64, sample_rate: f64, order: usize) -> Vec<Coefficients> {
    butterworth_qs(order)
        .map(|q| Coefficients::low_pass(sample_rate, frequency, q))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 48_000.0;

    fn db(gain: f64) -> f64 {
        20.0 * gain.log10()
    }

    #[test]
    fn identity_is_flat() {
        for f in [20.0, 1_000.0, 20_000.0] {
            assert_eq!(Coefficients::IDENTITY.magnitude_at(f, SR), 1.0);
        }
    }

    #[test]
    fn peak_hits_its_gain_at_center() {
        let peak = Coefficients::peak(SR, 1_000.0, 1.0, 6.0);
        assert!((db(peak.magnitude_at(1_000.0, SR)) - 6.0).abs() < 1e-6);
        assert!(db(peak.magnitude_at(20.0, SR)).abs() < 0.1);

        let flat = Coefficients::peak(SR, 1_000.0, 1.0, 0.0);
        assert!((flat.magnitude_at(3_000.0, SR) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn butterworth_is_3db_down_at_cutoff() {
        for order in [2, 4, 6, 8] {
            let stages = butterworth_high_pass(500.0, SR, order);
            assert_eq!(stages.len(), order / 2);
            let mag: f64 = stages.iter().map(|c| c.magnitude_at(500.0, SR)).product();
            assert!((db(mag) + 3.0103).abs() < 0.01, "order {}", order);

            let stages = butterworth_low_pass(5_000.0, SR, order);
            let mag: f64 = stages.iter().map(|c| c.magnitude_at(5_000.0, SR)).product();
            assert!((db(mag) + 3.0103).abs() < 0.01, "order {}", order);
        }
    }

    #[test]
    fn steeper_orders_attenuate_more() {
        let at = |order| -> f64 {
            butterworth_high_pass(1_000.0, SR, order)
                .iter()
                .map(|c| c.magnitude_at(250.0, SR))
                .product()
        };
        assert!(at(4) < at(2));
        assert!(at(8) < at(6));
        // Two octaves below a 12 dB/oct corner.
        assert!((db(at(2)) + 24.0).abs() < 1.0);
    }
}
