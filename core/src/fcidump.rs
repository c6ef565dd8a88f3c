//! FCIDUMP export: the molecular orbital hamiltonian in the interchange
//! format most correlated solvers read. A namelist header is followed by
//! `value i j k l` records over the unique repulsion integrals, then the
//! one-electron integrals with `k = l = 0`, and finally the constant core
//! energy with all four indices zero. Indices are 1-based.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use itertools::Itertools;
use nalgebra::DMatrix;

use crate::{ao2mo::MoEri, error::Error, matio::format_scientific};

/// Integrals smaller than this are not worth a record.
const INTEGRAL_TOLERANCE: f64 = 1e-12;

pub fn write_fcidump(
    path: impl AsRef<Path>,
    h1: &DMatrix<f64>,
    eri: &MoEri,
    n_electrons: usize,
    ms2: i32,
    core_energy: f64,
) -> Result<(), Error> {
    let n_orbitals = eri.size();
    if h1.nrows() != n_orbitals || h1.ncols() != n_orbitals {
        return Err(Error::Dimension(format!(
            "one-electron hamiltonian is {}x{}, repulsion integrals are over {} orbitals",
            h1.nrows(),
            h1.ncols(),
            n_orbitals
        )));
    }

    let mut writer = BufWriter::new(File::create(path)?);

    writeln!(
        writer,
        " &FCI NORB={n_orbitals:4},NELEC={n_electrons:3},MS2={ms2},"
    )?;
    writeln!(
        writer,
        "  ORBSYM={},",
        std::iter::repeat("1").take(n_orbitals).join(",")
    )?;
    writeln!(writer, "  ISYM=1,")?;
    writeln!(writer, " &END")?;

    // unique two-electron integrals under the 8-fold permutation symmetry
    // of real orbitals: p >= q, r >= s, pq >= rs
    let pair = |p: usize, q: usize| p * (p + 1) / 2 + q;
    for p in 0..n_orbitals {
        for q in 0..=p {
            for r in 0..=p {
                for s in 0..=r {
                    if pair(p, q) < pair(r, s) {
                        continue;
                    }
                    let value = eri[(p, q, r, s)];
                    if value.abs() > INTEGRAL_TOLERANCE {
                        write_record(&mut writer, value, p + 1, q + 1, r + 1, s + 1)?;
                    }
                }
            }
        }
    }

    for p in 0..n_orbitals {
        for q in 0..=p {
            let value = h1[(p, q)];
            if value.abs() > INTEGRAL_TOLERANCE {
                write_record(&mut writer, value, p + 1, q + 1, 0, 0)?;
            }
        }
    }

    write_record(&mut writer, core_energy, 0, 0, 0, 0)?;

    writer.flush()?;
    Ok(())
}

fn write_record(
    writer: &mut impl Write,
    value: f64,
    p: usize,
    q: usize,
    r: usize,
    s: usize,
) -> Result<(), Error> {
    writeln!(
        writer,
        "{} {p:3} {q:3} {r:3} {s:3}",
        format_scientific(value)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::write_fcidump;
    use crate::{ao2mo, testing};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("fcidump-{name}-{}", std::process::id()))
    }

    #[test]
    fn hydrogen_dump_has_the_expected_layout() {
        let hf = testing::hydrogen_sto_3g();
        let h1 = ao2mo::transform_one_electron(&hf.core_hamiltonian, &hf.coefficients).unwrap();
        let eri = ao2mo::MoEri::transform(&hf.electron, &hf.coefficients).unwrap();

        let path = temp_path("h2");
        write_fcidump(&path, &h1, &eri, 2, 0, hf.nuclear_repulsion).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();

        assert_eq!(lines.next(), Some(" &FCI NORB=   2,NELEC=  2,MS2=0,"));
        assert_eq!(lines.next(), Some("  ORBSYM=1,1,"));
        assert_eq!(lines.next(), Some("  ISYM=1,"));
        assert_eq!(lines.next(), Some(" &END"));

        let records: Vec<(f64, [usize; 4])> = lines
            .map(|line| {
                let mut parts = line.split_whitespace();
                let value: f64 = parts.next().unwrap().parse().unwrap();
                let indices: Vec<usize> =
                    parts.map(|part| part.parse().unwrap()).collect();
                (value, indices.try_into().unwrap())
            })
            .collect();

        // H2 in a minimal basis: 6 unique repulsion integrals, 3 unique
        // one-electron entries (the off-diagonal one vanishes by symmetry
        // in the canonical orbital basis), one core record
        let last = records.last().unwrap();
        assert_eq!(last.1, [0, 0, 0, 0]);
        assert_relative_eq!(last.0, hf.nuclear_repulsion, max_relative = 1e-10);

        let one_electron: Vec<_> = records
            .iter()
            .filter(|(_, [_, _, r, s])| *r == 0 && *s == 0)
            .collect();
        assert!(one_electron
            .iter()
            .any(|(value, indices)| *indices == [1, 1, 0, 0]
                && (value - h1[(0, 0)]).abs() < 1e-9));

        for (value, [p, q, r, s]) in &records {
            if *r == 0 {
                continue;
            }
            assert!(p >= q && r >= s, "indices not in canonical order");
            assert_relative_eq!(
                *value,
                eri[(p - 1, q - 1, r - 1, s - 1)],
                max_relative = 1e-9
            );
        }
    }
}
