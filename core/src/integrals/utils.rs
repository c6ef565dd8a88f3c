//! Recurrences shared by the McMurchie-Davidson integrals.
//! Reference:
//!
//! [1] Goings, J. Integrals. https://joshuagoings.com/2017/04/28/integrals/

use nalgebra::Vector3;

/// Hermite Gaussian expansion coefficient E_t^{ij} for two primitives with
/// exponents `a`, `b` separated by `distance` along one axis.
pub(crate) fn hermite_expansion([i, j, t]: [i32; 3], distance: f64, a: f64, b: f64) -> f64 {
    let p = a + b;
    let q = a * b / p;

    if t < 0 || t > i + j {
        0.0
    } else if i == 0 && j == 0 && t == 0 {
        (-q * distance * distance).exp()
    } else if j == 0 {
        // decrement index i
        (2.0 * p).recip() * hermite_expansion([i - 1, j, t - 1], distance, a, b)
            - (q * distance / a) * hermite_expansion([i - 1, j, t], distance, a, b)
            + (t + 1) as f64 * hermite_expansion([i - 1, j, t + 1], distance, a, b)
    } else {
        // decrement index j
        (2.0 * p).recip() * hermite_expansion([i, j - 1, t - 1], distance, a, b)
            + (q * distance / b) * hermite_expansion([i, j - 1, t], distance, a, b)
            + (t + 1) as f64 * hermite_expansion([i, j - 1, t + 1], distance, a, b)
    }
}

/// Hermite Coulomb auxiliary integral R_{tuv}^n for a combined exponent `p`
/// and a separation `diff` between the composite centers.
pub(crate) fn coulomb_auxiliary(t: i32, u: i32, v: i32, n: i32, p: f64, diff: Vector3<f64>) -> f64 {
    if t < 0 || u < 0 || v < 0 {
        0.0
    } else if t == 0 && u == 0 && v == 0 {
        (-2.0 * p).powi(n) * boys::micb25::boys(n as u64, p * diff.norm_squared())
    } else if t > 0 {
        (t - 1) as f64 * coulomb_auxiliary(t - 2, u, v, n + 1, p, diff)
            + diff.x * coulomb_auxiliary(t - 1, u, v, n + 1, p, diff)
    } else if u > 0 {
        (u - 1) as f64 * coulomb_auxiliary(t, u - 2, v, n + 1, p, diff)
            + diff.y * coulomb_auxiliary(t, u - 1, v, n + 1, p, diff)
    } else {
        (v - 1) as f64 * coulomb_auxiliary(t, u, v - 2, n + 1, p, diff)
            + diff.z * coulomb_auxiliary(t, u, v - 1, n + 1, p, diff)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::{coulomb_auxiliary, hermite_expansion};

    #[test]
    fn trivial_hermite_coefficient_is_gaussian_prefactor() {
        // E_0^{00} = exp(-q d^2) with q = ab / (a + b)
        let value = hermite_expansion([0, 0, 0], 1.0, 1.0, 1.0);
        assert_relative_eq!(value, (-0.5f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn out_of_range_hermite_coefficient_vanishes() {
        assert_eq!(hermite_expansion([1, 0, 2], 0.3, 1.0, 1.0), 0.0);
        assert_eq!(hermite_expansion([0, 0, -1], 0.3, 1.0, 1.0), 0.0);
    }

    #[test]
    fn auxiliary_integral_at_zero_separation_is_boys_value() {
        // R_000^0(p, 0) = F_0(0) = 1
        let value = coulomb_auxiliary(0, 0, 0, 0, 1.0, Vector3::zeros());
        assert_relative_eq!(value, 1.0, epsilon = 1e-10);
    }
}
