/// Interpolation kernel used by the separable resizer.
pub trait InterpolationKernel {
    /// Half-width of the kernel support in source samples.
    fn radius(&self) -> usize;
    /// Kernel weight at signed distance `t` from the sample position.
    fn weight(&self, t: f64) -> f64;
}

/// Keys cubic convolution kernel with free parameter `a`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicKernel {
    a: f64,
}

impl Default for CubicKernel {
    fn default() -> Self {
        CATMULL_ROM
    }
}

impl CubicKernel {
    pub const fn new(a: f64) -> Self {
        Self { a }
    }
}

impl InterpolationKernel for CubicKernel {
    #[inline]
    fn radius(&self) -> usize {
        2
    }

    #[inline]
    fn weight(&self, t: f64) -> f64 {
        let a = self.a;
        let t = t.abs();
        if t <= 1.0 {
            ((a + 2.0) * t - (a + 3.0)) * t * t + 1.0
        } else if t < 2.0 {
            ((a * t - 5.0 * a) * t + 8.0 * a) * t - 4.0 * a
        } else {
            0.0
        }
    }
}

/// Catmull-Rom spline (`a = -0.5`); reproduces constant and linear signals.
pub const CATMULL_ROM: CubicKernel = CubicKernel::new(-0.5);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_partition_unity_and_first_moment() {
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let ws: Vec<f64> = (-1..=2).map(|k| CATMULL_ROM.weight(t - k as f64)).collect();
            let sum: f64 = ws.iter().sum();
            let moment: f64 = ws.iter().zip(-1..=2).map(|(w, k)| w * k as f64).sum();
            assert!((sum - 1.0).abs() < 1e-12, "sum={sum} at t={t}");
            assert!((moment - t).abs() < 1e-12, "moment={moment} at t={t}");
        }
    }

    #[test]
    fn interpolates_at_integer_offsets() {
        assert_eq!(CATMULL_ROM.weight(0.0), 1.0);
        assert_eq!(CATMULL_ROM.weight(1.0), 0.0);
        assert_eq!(CATMULL_ROM.weight(2.0), 0.0);
    }
}
