use std::ops::Index;

use crate::basis::BasisFunction;

use super::Integrator;

/// An integral index used in the two-electron integrals of a basis set.
///
/// The index represents the four indices (i, j, k, l) of a two-electron
/// integral in chemists' notation, (ij|kl). Two-electron integrals over real
/// orbitals have an 8-fold permutational symmetry; the constructor folds any
/// index tuple onto its canonical representative so that each unique integral
/// is stored exactly once.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct IntegralIndex(usize, usize, usize, usize);

impl IntegralIndex {
    pub(crate) const fn new(index: (usize, usize, usize, usize)) -> Self {
        let (i, j, k, l) = Self::canonical(index);
        Self(i, j, k, l)
    }

    #[inline(always)]
    const fn canonical(
        (i, j, k, l): (usize, usize, usize, usize),
    ) -> (usize, usize, usize, usize) {
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        let (k, l) = if k < l { (k, l) } else { (l, k) };

        // triangular pair index, injective for i <= j
        let ij = j * (j + 1) / 2 + i;
        let kl = l * (l + 1) / 2 + k;

        if ij <= kl {
            (i, j, k, l)
        } else {
            (k, l, i, j)
        }
    }

    fn linear(&self, size: usize) -> usize {
        let &Self(i, j, k, l) = self;
        l * size.pow(3) + k * size.pow(2) + j * size + i
    }
}

/// Electron-electron repulsion integrals over a concrete basis, stored dense
/// and indexed in chemists' notation.
pub struct ElectronTensor {
    data: Vec<f64>,
    /// side length
    size: usize,
}

impl ElectronTensor {
    /// Computes the repulsion integral for every symmetry-unique combination
    /// of four basis functions. With the `rayon` feature the unique integrals
    /// are distributed over a thread pool in chunks.
    pub fn from_basis(
        basis: &[BasisFunction],
        integrator: &(impl Integrator<Item = BasisFunction> + Sync),
    ) -> Self {
        let n_basis = basis.len();
        let mut data = vec![0.0; n_basis.pow(4)];

        let mut to_compute = Vec::new();
        for i in 0..n_basis {
            for j in i..n_basis {
                for k in 0..n_basis {
                    for l in k..n_basis {
                        if j * (j + 1) / 2 + i <= l * (l + 1) / 2 + k {
                            to_compute.push(IntegralIndex(i, j, k, l));
                        }
                    }
                }
            }
        }

        #[cfg(feature = "rayon")]
        {
            use rayon::iter::{ParallelBridge, ParallelIterator};

            to_compute
                .chunks(512)
                .par_bridge()
                .map(|indices| {
                    let mut output = Vec::with_capacity(indices.len());
                    for index @ &IntegralIndex(i, j, k, l) in indices {
                        let integral = integrator
                            .electron_repulsion((&basis[i], &basis[j], &basis[k], &basis[l]));
                        output.push((index.linear(n_basis), integral));
                    }
                    output
                })
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .for_each(|(linear, integral)| data[linear] = integral);
        }

        #[cfg(not(feature = "rayon"))]
        for index @ IntegralIndex(i, j, k, l) in to_compute {
            let integral =
                integrator.electron_repulsion((&basis[i], &basis[j], &basis[k], &basis[l]));
            log::trace!("ERI ({i} {j}|{k} {l}) = {integral:<1.8}");
            data[index.linear(n_basis)] = integral;
        }

        Self {
            data,
            size: n_basis,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Index<(usize, usize, usize, usize)> for ElectronTensor {
    type Output = f64;

    fn index(&self, index: (usize, usize, usize, usize)) -> &Self::Output {
        let index = IntegralIndex::new(index);
        &self.data[index.linear(self.size)]
    }
}

// debug output elides the size^4 data block
impl std::fmt::Debug for ElectronTensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElectronTensor")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{ElectronTensor, IntegralIndex};

    #[test]
    fn canonical_index_respects_eightfold_symmetry() {
        let reference = IntegralIndex::new((0, 1, 2, 3));
        for permuted in [
            (1, 0, 2, 3),
            (0, 1, 3, 2),
            (1, 0, 3, 2),
            (2, 3, 0, 1),
            (3, 2, 0, 1),
            (2, 3, 1, 0),
            (3, 2, 1, 0),
        ] {
            assert_eq!(IntegralIndex::new(permuted), reference);
        }
    }

    #[test]
    fn canonical_index_is_idempotent() {
        // (1 1|0 2) and (0 2|1 1) are the same integral and must share a slot
        let a = IntegralIndex::new((1, 1, 0, 2));
        let b = IntegralIndex::new((0, 2, 1, 1));
        assert_eq!(a, b);

        let IntegralIndex(i, j, k, l) = a;
        assert_eq!(IntegralIndex::new((i, j, k, l)), a);
    }

    #[test]
    fn debug_output_shows_the_dimension_not_the_data() {
        let tensor = ElectronTensor {
            data: vec![0.25],
            size: 1,
        };

        let printed = format!("{tensor:?}");
        assert!(printed.contains("size: 1"));
        assert!(!printed.contains("0.25"));
    }
}
