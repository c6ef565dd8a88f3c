//! McMurchie-Davidson integration scheme.
//! Reference:
//!
//! [1] Goings, J. Integrals. https://joshuagoings.com/2017/04/28/integrals/
use nalgebra::Vector3;

use crate::{
    atom::Atom,
    basis::{BasisFunction, Gaussian},
};

use super::{
    utils::{coulomb_auxiliary, hermite_expansion},
    Integrator,
};

#[derive(Default)]
pub struct McMurchieDavidson;

impl Integrator for McMurchieDavidson {
    type Item = BasisFunction;

    fn overlap(&self, functions: (&Self::Item, &Self::Item)) -> f64 {
        let (basis_a, basis_b) = functions;
        let diff = basis_b.position - basis_a.position;

        let mut output = 0.0;
        for (&primitive_a, &primitive_b) in itertools::iproduct!(
            &basis_a.contracted_gaussian.0,
            &basis_b.contracted_gaussian.0
        ) {
            output += primitive_a.coefficient
                * primitive_b.coefficient
                * primitive_overlap(primitive_a, primitive_b, diff);
        }
        output
    }

    fn kinetic(&self, functions: (&Self::Item, &Self::Item)) -> f64 {
        let (basis_a, basis_b) = functions;
        let diff = basis_b.position - basis_a.position;

        let mut output = 0.0;
        for (&primitive_a, &primitive_b) in itertools::iproduct!(
            &basis_a.contracted_gaussian.0,
            &basis_b.contracted_gaussian.0
        ) {
            output += primitive_a.coefficient
                * primitive_b.coefficient
                * primitive_kinetic(primitive_a, primitive_b, diff);
        }
        output
    }

    fn nuclear(&self, functions: (&Self::Item, &Self::Item), nuclei: &[Atom]) -> f64 {
        let (basis_a, basis_b) = functions;
        let diff = basis_b.position - basis_a.position;

        let mut output = 0.0;
        for (nucleus, &primitive_a, &primitive_b) in itertools::iproduct!(
            nuclei,
            &basis_a.contracted_gaussian.0,
            &basis_b.contracted_gaussian.0
        ) {
            let product_center = product_center(
                basis_a.position,
                primitive_a.exponent,
                basis_b.position,
                primitive_b.exponent,
            );

            output += primitive_a.coefficient
                * primitive_b.coefficient
                * primitive_nuclear(primitive_a, primitive_b, diff, product_center, nucleus)
        }

        output
    }

    fn electron_repulsion(
        &self,
        functions: (&Self::Item, &Self::Item, &Self::Item, &Self::Item),
    ) -> f64 {
        let (basis_a, basis_b, basis_c, basis_d) = functions;
        let diff_ab = basis_b.position - basis_a.position;
        let diff_cd = basis_d.position - basis_c.position;

        let mut output = 0.0;
        for (&primitive_a, &primitive_b, &primitive_c, &primitive_d) in itertools::iproduct!(
            &basis_a.contracted_gaussian.0,
            &basis_b.contracted_gaussian.0,
            &basis_c.contracted_gaussian.0,
            &basis_d.contracted_gaussian.0
        ) {
            let product_center_ab = product_center(
                basis_a.position,
                primitive_a.exponent,
                basis_b.position,
                primitive_b.exponent,
            );

            let product_center_cd = product_center(
                basis_c.position,
                primitive_c.exponent,
                basis_d.position,
                primitive_d.exponent,
            );

            let diff_product = product_center_cd - product_center_ab;

            output += primitive_a.coefficient
                * primitive_b.coefficient
                * primitive_c.coefficient
                * primitive_d.coefficient
                * primitive_electron(
                    primitive_a,
                    primitive_b,
                    primitive_c,
                    primitive_d,
                    diff_ab,
                    diff_cd,
                    diff_product,
                )
        }
        output
    }

    fn dipole(&self, functions: (&Self::Item, &Self::Item)) -> Vector3<f64> {
        let (basis_a, basis_b) = functions;
        let diff = basis_b.position - basis_a.position;

        let mut output = Vector3::zeros();
        for (&primitive_a, &primitive_b) in itertools::iproduct!(
            &basis_a.contracted_gaussian.0,
            &basis_b.contracted_gaussian.0
        ) {
            let product_center = product_center(
                basis_a.position,
                primitive_a.exponent,
                basis_b.position,
                primitive_b.exponent,
            );

            output += primitive_a.coefficient
                * primitive_b.coefficient
                * primitive_dipole(primitive_a, primitive_b, diff, product_center);
        }
        output
    }
}

fn primitive_overlap(primitive_a: Gaussian, primitive_b: Gaussian, diff: Vector3<f64>) -> f64 {
    let Gaussian {
        exponent: exp_a,
        angular: (l1, m1, n1),
        ..
    } = primitive_a;

    let Gaussian {
        exponent: exp_b,
        angular: (l2, m2, n2),
        ..
    } = primitive_b;

    hermite_expansion([l1, l2, 0], diff.x, exp_a, exp_b)
        * hermite_expansion([m1, m2, 0], diff.y, exp_a, exp_b)
        * hermite_expansion([n1, n2, 0], diff.z, exp_a, exp_b)
        * (std::f64::consts::PI / (exp_a + exp_b)).powi(3).sqrt()
}

fn primitive_kinetic(primitive_a: Gaussian, primitive_b: Gaussian, diff: Vector3<f64>) -> f64 {
    let Gaussian {
        exponent: b_exp,
        angular: (l, m, n),
        ..
    } = primitive_b;

    let angular_step =
        |i, j, k| primitive_overlap(primitive_a, add_angular(primitive_b, [i, j, k]), diff);

    let term_0 =
        b_exp * (2 * (l + m + n) + 3) as f64 * primitive_overlap(primitive_a, primitive_b, diff);
    let term_1 = -2.0
        * b_exp.powi(2)
        * (angular_step(2, 0, 0) + angular_step(0, 2, 0) + angular_step(0, 0, 2));
    let term_2 = -0.5
        * ((l * (l - 1)) as f64 * angular_step(-2, 0, 0)
            + (m * (m - 1)) as f64 * angular_step(0, -2, 0)
            + (n * (n - 1)) as f64 * angular_step(0, 0, -2));
    term_0 + term_1 + term_2
}

fn primitive_nuclear(
    primitive_a: Gaussian,
    primitive_b: Gaussian,
    // difference of the positions of the two basis functions: b - a
    diff: Vector3<f64>,
    // the product center of the two basis functions
    product_center: Vector3<f64>,
    nucleus: &Atom,
) -> f64 {
    let Gaussian {
        exponent: a,
        angular: (l1, m1, n1),
        ..
    } = primitive_a;

    let Gaussian {
        exponent: b,
        angular: (l2, m2, n2),
        ..
    } = primitive_b;

    let p = a + b;
    let diff_nucleus = *nucleus.position() - product_center;

    let mut sum = 0.0;
    for (t, u, v) in itertools::iproduct!(0..=l1 + l2, 0..=m1 + m2, 0..=n1 + n2) {
        let e1 = hermite_expansion([l1, l2, t], diff.x, a, b);
        let e2 = hermite_expansion([m1, m2, u], diff.y, a, b);
        let e3 = hermite_expansion([n1, n2, v], diff.z, a, b);
        sum += e1 * e2 * e3 * coulomb_auxiliary(t, u, v, 0, p, diff_nucleus)
    }
    (-nucleus.nuclear_charge() as f64 * std::f64::consts::TAU / p) * sum
}

fn primitive_electron(
    primitive_a: Gaussian,
    primitive_b: Gaussian,
    primitive_c: Gaussian,
    primitive_d: Gaussian,
    diff_ab: Vector3<f64>,
    diff_cd: Vector3<f64>,
    diff_product: Vector3<f64>,
) -> f64 {
    let Gaussian {
        exponent: a,
        angular: (l1, m1, n1),
        ..
    } = primitive_a;
    let Gaussian {
        exponent: b,
        angular: (l2, m2, n2),
        ..
    } = primitive_b;
    let Gaussian {
        exponent: c,
        angular: (l3, m3, n3),
        ..
    } = primitive_c;
    let Gaussian {
        exponent: d,
        angular: (l4, m4, n4),
        ..
    } = primitive_d;

    let p = a + b;
    let q = c + d;
    let alpha = p * q / (p + q);

    let mut sum = 0.0;
    for (t1, u1, v1) in itertools::iproduct!(0..=l1 + l2, 0..=m1 + m2, 0..=n1 + n2) {
        let e1 = hermite_expansion([l1, l2, t1], diff_ab.x, a, b);
        let e2 = hermite_expansion([m1, m2, u1], diff_ab.y, a, b);
        let e3 = hermite_expansion([n1, n2, v1], diff_ab.z, a, b);

        for (t2, u2, v2) in itertools::iproduct!(0..=l3 + l4, 0..=m3 + m4, 0..=n3 + n4) {
            let e4 = hermite_expansion([l3, l4, t2], diff_cd.x, c, d);
            let e5 = hermite_expansion([m3, m4, u2], diff_cd.y, c, d);
            let e6 = hermite_expansion([n3, n4, v2], diff_cd.z, c, d);

            sum += e1
                * e2
                * e3
                * e4
                * e5
                * e6
                * coulomb_auxiliary(t1 + t2, u1 + u2, v1 + v2, 0, alpha, diff_product)
                * if (t2 + u2 + v2) % 2 == 0 { 1.0 } else { -1.0 }
        }
    }

    2.0 * std::f64::consts::PI.powi(5).sqrt() * (p * q * (p + q).sqrt()).recip() * sum
}

fn primitive_dipole(
    primitive_a: Gaussian,
    primitive_b: Gaussian,
    diff: Vector3<f64>,
    product_center: Vector3<f64>,
) -> Vector3<f64> {
    let Gaussian {
        exponent: a,
        angular: (l1, m1, n1),
        ..
    } = primitive_a;

    let Gaussian {
        exponent: b,
        angular: (l2, m2, n2),
        ..
    } = primitive_b;

    let prefactor = (std::f64::consts::PI / (a + b)).powi(3).sqrt();

    let s_x = hermite_expansion([l1, l2, 0], diff.x, a, b);
    let s_y = hermite_expansion([m1, m2, 0], diff.y, a, b);
    let s_z = hermite_expansion([n1, n2, 0], diff.z, a, b);

    // <a| w |b> = (E_1 + P_w E_0) along the moment axis, overlap elsewhere
    let d_x = hermite_expansion([l1, l2, 1], diff.x, a, b) + product_center.x * s_x;
    let d_y = hermite_expansion([m1, m2, 1], diff.y, a, b) + product_center.y * s_y;
    let d_z = hermite_expansion([n1, n2, 1], diff.z, a, b) + product_center.z * s_z;

    Vector3::new(d_x * s_y * s_z, s_x * d_y * s_z, s_x * s_y * d_z) * prefactor
}

#[inline(always)]
fn add_angular(gaussian: Gaussian, [i, j, k]: [i32; 3]) -> Gaussian {
    let Gaussian {
        angular: (l, m, n), ..
    } = gaussian;

    Gaussian {
        angular: (l + i, m + j, n + k),
        ..gaussian
    }
}

#[inline(always)]
fn product_center(
    a_pos: Vector3<f64>,
    a_exp: f64,
    b_pos: Vector3<f64>,
    b_exp: f64,
) -> Vector3<f64> {
    (a_exp * a_pos + b_exp * b_pos) / (a_exp + b_exp)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use crate::basis::Gaussian;

    fn s_primitive() -> Gaussian {
        Gaussian {
            exponent: 1.0,
            coefficient: 1.0,
            angular: (0, 0, 0),
        }
    }

    #[test]
    fn primitive_overlap_of_unit_gaussians() {
        assert_relative_eq!(
            super::primitive_overlap(s_primitive(), s_primitive(), Vector3::new(1.0, 0.0, 0.0)),
            1.194077663824459,
            epsilon = 1e-12
        );
    }

    #[test]
    // for equal unit exponents the 1/(2p) and X_PA*X_PB contributions
    // cancel exactly at unit separation
    fn p_orbital_overlap_cancels_at_unit_separation() {
        let p_x = Gaussian {
            angular: (1, 0, 0),
            ..s_primitive()
        };
        assert_relative_eq!(
            super::primitive_overlap(p_x, p_x, Vector3::new(1.0, 0.0, 0.0)),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn dipole_of_centered_s_function_vanishes() {
        let dipole =
            super::primitive_dipole(s_primitive(), s_primitive(), Vector3::zeros(), Vector3::zeros());
        assert_relative_eq!(dipole.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn dipole_of_shifted_s_pair_is_center_times_overlap() {
        // for two s primitives the moment reduces to P_w * S
        let diff = Vector3::new(0.0, 0.0, 1.0);
        let center = Vector3::new(0.0, 0.0, 0.5);
        let overlap = super::primitive_overlap(s_primitive(), s_primitive(), diff);
        let dipole = super::primitive_dipole(s_primitive(), s_primitive(), diff, center);

        assert_relative_eq!(dipole.z, 0.5 * overlap, epsilon = 1e-12);
        assert_relative_eq!(dipole.x, 0.0, epsilon = 1e-12);
    }
}
