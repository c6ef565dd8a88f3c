//! Change of basis for the hamiltonian integrals, from atomic orbitals
//! into a set of molecular orbitals.

use std::ops::Index;

use nalgebra::DMatrix;

use crate::{error::Error, integrals::ElectronTensor};

/// Transforms a one-electron operator into the orbital basis spanned by the
/// columns of `coefficients`.
pub fn transform_one_electron(
    operator: &DMatrix<f64>,
    coefficients: &DMatrix<f64>,
) -> Result<DMatrix<f64>, Error> {
    if operator.nrows() != coefficients.nrows() || !operator.is_square() {
        return Err(Error::Dimension(format!(
            "cannot transform a {}x{} operator with {} basis functions per orbital",
            operator.nrows(),
            operator.ncols(),
            coefficients.nrows()
        )));
    }

    Ok(coefficients.transpose() * operator * coefficients)
}

/// The two-electron repulsion integrals in a molecular orbital basis,
/// dense over all four indices.
pub struct MoEri {
    data: Vec<f64>,
    size: usize,
}

impl MoEri {
    /// Transforms the atomic orbital repulsion integrals into the orbital
    /// basis spanned by the columns of `coefficients`, one index at a time.
    /// Runs in `O(n^5)` rather than the naive `O(n^8)`.
    pub fn transform(
        electron: &ElectronTensor,
        coefficients: &DMatrix<f64>,
    ) -> Result<Self, Error> {
        let n_ao = electron.size();
        if coefficients.nrows() != n_ao {
            return Err(Error::Dimension(format!(
                "repulsion integrals are over {} atomic orbitals, coefficients over {}",
                n_ao,
                coefficients.nrows()
            )));
        }
        let n_mo = coefficients.ncols();

        let index =
            |size: [usize; 4], i: usize, j: usize, k: usize, l: usize| -> usize {
                ((i * size[1] + j) * size[2] + k) * size[3] + l
            };

        // (pq|rs) -> (iq|rs)
        let mut quarter = vec![0.0; n_mo * n_ao * n_ao * n_ao];
        for i in 0..n_mo {
            for q in 0..n_ao {
                for r in 0..n_ao {
                    for s in 0..n_ao {
                        let mut sum = 0.0;
                        for p in 0..n_ao {
                            sum += coefficients[(p, i)] * electron[(p, q, r, s)];
                        }
                        quarter[index([n_mo, n_ao, n_ao, n_ao], i, q, r, s)] = sum;
                    }
                }
            }
        }

        // (iq|rs) -> (ij|rs)
        let mut half = vec![0.0; n_mo * n_mo * n_ao * n_ao];
        for i in 0..n_mo {
            for j in 0..n_mo {
                for r in 0..n_ao {
                    for s in 0..n_ao {
                        let mut sum = 0.0;
                        for q in 0..n_ao {
                            sum += coefficients[(q, j)]
                                * quarter[index([n_mo, n_ao, n_ao, n_ao], i, q, r, s)];
                        }
                        half[index([n_mo, n_mo, n_ao, n_ao], i, j, r, s)] = sum;
                    }
                }
            }
        }
        drop(quarter);

        // (ij|rs) -> (ij|ks)
        let mut three_quarter = vec![0.0; n_mo * n_mo * n_mo * n_ao];
        for i in 0..n_mo {
            for j in 0..n_mo {
                for k in 0..n_mo {
                    for s in 0..n_ao {
                        let mut sum = 0.0;
                        for r in 0..n_ao {
                            sum += coefficients[(r, k)]
                                * half[index([n_mo, n_mo, n_ao, n_ao], i, j, r, s)];
                        }
                        three_quarter[index([n_mo, n_mo, n_mo, n_ao], i, j, k, s)] = sum;
                    }
                }
            }
        }
        drop(half);

        // (ij|ks) -> (ij|kl)
        let mut data = vec![0.0; n_mo * n_mo * n_mo * n_mo];
        for i in 0..n_mo {
            for j in 0..n_mo {
                for k in 0..n_mo {
                    for l in 0..n_mo {
                        let mut sum = 0.0;
                        for s in 0..n_ao {
                            sum += coefficients[(s, l)]
                                * three_quarter[index([n_mo, n_mo, n_mo, n_ao], i, j, k, s)];
                        }
                        data[index([n_mo, n_mo, n_mo, n_mo], i, j, k, l)] = sum;
                    }
                }
            }
        }

        Ok(Self { data, size: n_mo })
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Index<(usize, usize, usize, usize)> for MoEri {
    type Output = f64;

    fn index(&self, (i, j, k, l): (usize, usize, usize, usize)) -> &Self::Output {
        &self.data[((i * self.size + j) * self.size + k) * self.size + l]
    }
}
