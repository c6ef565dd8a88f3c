use nalgebra::DMatrix;

const MAX_SWEEPS: usize = 100;
const GAIN_TOLERANCE: f64 = 1e-10;

/// Jacobi rotations that maximize the sum of squared diagonal elements of
/// a family of symmetric operators, represented here in the orbital basis.
/// Returns the rotated orbital coefficients.
///
/// For each orbital pair the optimal rotation angle follows from the
/// stationarity condition of the quartic functional, see Edmiston and
/// Ruedenberg, Rev. Mod. Phys. 35, 457 (1963).
pub(super) fn maximize_diagonal_squares(
    coefficients: &DMatrix<f64>,
    operators: &[DMatrix<f64>],
) -> DMatrix<f64> {
    let mut coefficients = coefficients.clone();
    let n_orbitals = coefficients.ncols();

    // operators in the current orbital basis, updated in place as the
    // orbitals rotate
    let mut projected: Vec<DMatrix<f64>> = operators
        .iter()
        .map(|operator| coefficients.transpose() * operator * &coefficients)
        .collect();

    for sweep in 0..MAX_SWEEPS {
        let mut largest_gain = 0.0_f64;

        for i in 0..n_orbitals {
            for j in i + 1..n_orbitals {
                let mut a = 0.0;
                let mut b = 0.0;
                for m in &projected {
                    let off = m[(i, j)];
                    let diff = m[(i, i)] - m[(j, j)];
                    a += off * off - 0.25 * diff * diff;
                    b += off * diff;
                }

                let gain = a + (a * a + b * b).sqrt();
                largest_gain = largest_gain.max(gain);
                if gain <= GAIN_TOLERANCE {
                    continue;
                }

                let angle = 0.25 * b.atan2(-a);
                rotate_pair(&mut coefficients, &mut projected, i, j, angle);
            }
        }

        log::debug!("localization sweep {sweep}: largest pair gain {largest_gain:1.3e}");
        if largest_gain <= GAIN_TOLERANCE {
            break;
        }
    }

    coefficients
}

fn rotate_pair(
    coefficients: &mut DMatrix<f64>,
    projected: &mut [DMatrix<f64>],
    i: usize,
    j: usize,
    angle: f64,
) {
    let (cos, sin) = (angle.cos(), angle.sin());

    let n_basis = coefficients.nrows();
    for row in 0..n_basis {
        let (ci, cj) = (coefficients[(row, i)], coefficients[(row, j)]);
        coefficients[(row, i)] = cos * ci + sin * cj;
        coefficients[(row, j)] = cos * cj - sin * ci;
    }

    let n_orbitals = projected.first().map_or(0, |m| m.ncols());
    for m in projected {
        // two-sided givens update of the symmetric operator
        for k in 0..n_orbitals {
            let (mki, mkj) = (m[(k, i)], m[(k, j)]);
            m[(k, i)] = cos * mki + sin * mkj;
            m[(k, j)] = cos * mkj - sin * mki;
        }
        for k in 0..n_orbitals {
            let (mik, mjk) = (m[(i, k)], m[(j, k)]);
            m[(i, k)] = cos * mik + sin * mjk;
            m[(j, k)] = cos * mjk - sin * mik;
        }
    }
}
