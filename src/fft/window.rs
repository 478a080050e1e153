use std::f32::consts::PI;

/// Analysis window applied before the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowKind {
    #[default]
    BlackmanHarris,
    Hann,
}

impl WindowKind {
    /// Symmetric window table of length `n`.
    pub fn build(self, n: usize) -> Vec<f32> {
        if n < 2 {
            return vec![1.0; n];
        }
        let denom = (n - 1) as f32;
        (0..n)
            .map(|i| {
                let phase = 2.0 * PI * i as f32 / denom;
                match self {
                    WindowKind::Hann => 0.5 * (1.0 - phase.cos()),
                    WindowKind::BlackmanHarris => {
                        0.35875 - 0.48829 * phase.cos() + 0.14128 * (2.0 * phase).cos()
                            - 0.01168 * (3.0 * phase).cos()
                    }
                }
            })
            .collect()
    }
}
