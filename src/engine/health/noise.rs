use rand::Rng;

/// Differentially private additive noise: `x + Laplace(0, 1/epsilon)`,
/// clamped to zero because every published quantity is a count or a rate.
/// `epsilon <= 0` disables the mechanism, which tests rely on.
pub fn add_noise(x: f64, epsilon: f64) -> f64 {
    if epsilon <= 0.0 {
        return x;
    }
    let noise = sample_laplace(1.0 / epsilon, &mut rand::thread_rng());
    (x + noise).max(0.0)
}

/// Inverse-CDF sampling of Laplace(0, scale).
fn sample_laplace<R: Rng>(scale: f64, rng: &mut R) -> f64 {
    // u uniform in (-0.5, 0.5); the open bounds avoid ln(0).
    let mut u: f64 = rng.gen_range(0.0..1.0) - 0.5;
    if u == -0.5 {
        u = 0.0;
    }
    -scale * u.signum() * (1.0 - 2.0 * u.abs()).ln()
}

#[cfg(test)]
mod tests {
    use super::add_noise;

    #[test]
    fn zero_epsilon_is_identity() {
        assert_eq!(add_noise(42.0, 0.0), 42.0);
        assert_eq!(add_noise(0.0, 0.0), 0.0);
    }

    #[test]
    fn noise_never_goes_negative() {
        for _ in 0..1_000 {
            assert!(add_noise(0.5, 1.0) >= 0.0);
        }
    }

    #[test]
    fn noise_is_centered_on_input() {
        let n = 10_000;
        let sum: f64 = (0..n).map(|_| add_noise(100.0, 1.0)).sum();
        let mean = sum / n as f64;
        // Laplace(0, 1) has stdev sqrt(2); the sample mean stays close.
        assert!((mean - 100.0).abs() < 1.0, "mean drifted to {mean}");
    }
}
