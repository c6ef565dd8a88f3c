//! Plain text matrix files. Each row of the matrix is one line; real
//! entries are written in scientific notation padded to 16 columns and
//! followed by a space, complex entries as a parenthesized
//! `(real, imaginary)` pair. Readers are given the expected shape and
//! refuse files that do not match it exactly.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::error::Error;

/// Scientific notation with a ten digit mantissa and a signed two digit
/// exponent, right aligned to 16 columns.
pub(crate) fn format_scientific(value: f64) -> String {
    let raw = format!("{value:.10e}");
    // the standard formatter emits `1.0000000000e0`; rewrite the exponent
    // as `e+00`
    let (mantissa, exponent) = raw
        .rsplit_once('e')
        .unwrap_or_else(|| unreachable!("{{:e}} always contains an exponent"));
    let exponent: i32 = exponent.parse().unwrap_or_else(|_| {
        unreachable!("{{:e}} always emits a valid exponent");
    });
    format!("{:>16}", format!("{mantissa}e{exponent:+03}"))
}

pub fn write_real_matrix(path: impl AsRef<Path>, matrix: &DMatrix<f64>) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path)?);

    for row in 0..matrix.nrows() {
        for col in 0..matrix.ncols() {
            write!(writer, "{} ", format_scientific(matrix[(row, col)]))?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_complex_matrix(
    path: impl AsRef<Path>,
    matrix: &DMatrix<Complex64>,
) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path)?);

    for row in 0..matrix.nrows() {
        for col in 0..matrix.ncols() {
            let entry = matrix[(row, col)];
            write!(
                writer,
                "({}, {}) ",
                format_scientific(entry.re),
                format_scientific(entry.im)
            )?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Reads a real matrix of the given shape. Fails if any entry does not
/// parse, if any row has the wrong number of entries, or if the number of
/// rows is off.
pub fn read_real_matrix(
    path: impl AsRef<Path>,
    rows: usize,
    cols: usize,
) -> Result<DMatrix<f64>, Error> {
    let reader = BufReader::new(File::open(path)?);

    // every line is a row, blank ones included, so the shape check is exact
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    if lines.len() != rows {
        return Err(Error::RowCount {
            found: lines.len(),
            expected: rows,
        });
    }

    let mut matrix = DMatrix::zeros(rows, cols);
    for (row, line) in lines.iter().enumerate() {
        let mut col = 0;
        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|error| Error::MalformedToken {
                line: row + 1,
                token: token.to_string(),
                reason: error.to_string(),
            })?;
            if col >= cols {
                return Err(Error::RowLength {
                    row,
                    found: col + 1,
                    expected: cols,
                });
            }
            matrix[(row, col)] = value;
            col += 1;
        }

        if col != cols {
            return Err(Error::RowLength {
                row,
                found: col,
                expected: cols,
            });
        }
    }

    Ok(matrix)
}

/// Reads a complex matrix of the given shape. Entries are parenthesized
/// `(real, imaginary)` pairs; anything else on a line is an error.
pub fn read_complex_matrix(
    path: impl AsRef<Path>,
    rows: usize,
    cols: usize,
) -> Result<DMatrix<Complex64>, Error> {
    let reader = BufReader::new(File::open(path)?);

    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    if lines.len() != rows {
        return Err(Error::RowCount {
            found: lines.len(),
            expected: rows,
        });
    }

    let mut matrix = DMatrix::zeros(rows, cols);
    for (row, line) in lines.iter().enumerate() {
        let mut col = 0;
        for token in complex_pairs(line, row + 1) {
            let value = token?;
            if col >= cols {
                return Err(Error::RowLength {
                    row,
                    found: col + 1,
                    expected: cols,
                });
            }
            matrix[(row, col)] = value;
            col += 1;
        }

        if col != cols {
            return Err(Error::RowLength {
                row,
                found: col,
                expected: cols,
            });
        }
    }

    Ok(matrix)
}

/// Splits a line into its parenthesized pairs.
fn complex_pairs<'a>(
    line: &'a str,
    line_number: usize,
) -> impl Iterator<Item = Result<Complex64, Error>> + 'a {
    let malformed = move |token: &str, reason: &str| Error::MalformedToken {
        line: line_number,
        token: token.to_string(),
        reason: reason.to_string(),
    };

    let mut rest = line.trim();
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        if !rest.starts_with('(') {
            let token = rest.split_whitespace().next().unwrap_or(rest).to_string();
            rest = "";
            return Some(Err(malformed(&token, "expected a parenthesized pair")));
        }
        let Some(close) = rest.find(')') else {
            let token = rest.to_string();
            rest = "";
            return Some(Err(malformed(&token, "unterminated pair")));
        };

        let token = &rest[..=close];
        let result = parse_pair(token, malformed(token, "expected `(real, imaginary)`"));
        rest = rest[close + 1..].trim_start();
        Some(result)
    })
}

fn parse_pair(token: &str, malformed: Error) -> Result<Complex64, Error> {
    let inner = &token[1..token.len() - 1];
    let Some((real, imaginary)) = inner.split_once(',') else {
        return Err(malformed);
    };
    match (real.trim().parse(), imaginary.trim().parse()) {
        (Ok(re), Ok(im)) => Ok(Complex64::new(re, im)),
        _ => Err(malformed),
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{dmatrix, DMatrix};
    use num_complex::Complex64;

    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("matio-{name}-{}", std::process::id()))
    }

    #[test]
    fn scientific_format_matches_convention() {
        assert_eq!(format_scientific(1.0), "1.0000000000e+00");
        assert_eq!(format_scientific(-2.5), "-2.5000000000e+00");
        assert_eq!(format_scientific(0.0), "0.0000000000e+00");
        assert_eq!(format_scientific(6.02214076e23), "6.0221407600e+23");
        assert_eq!(format_scientific(-1.25e-13), "-1.2500000000e-13");
    }

    #[test]
    fn real_matrix_golden_output() {
        let matrix = dmatrix![1.0, -2.5; 3.333333, 0.0];
        let path = temp_path("real-golden");
        write_real_matrix(&path, &matrix).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "1.0000000000e+00 -2.5000000000e+00 \n3.3333330000e+00 0.0000000000e+00 \n"
        );

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn complex_matrix_golden_output() {
        let matrix = DMatrix::from_element(1, 1, Complex64::new(1.0, 2.0));
        let path = temp_path("complex-golden");
        write_complex_matrix(&path, &matrix).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "(1.0000000000e+00, 2.0000000000e+00) \n");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn real_matrix_round_trip() {
        let matrix = dmatrix![
            1.0, -2.5, 1e-12;
            3.14159265358979, 0.0, -6.02e23
        ];
        let path = temp_path("real-trip");
        write_real_matrix(&path, &matrix).unwrap();

        let read = read_real_matrix(&path, 2, 3).unwrap();
        for (a, b) in matrix.iter().zip(read.iter()) {
            approx::assert_relative_eq!(a, b, max_relative = 1e-10);
        }

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn complex_matrix_round_trip() {
        let matrix = DMatrix::from_fn(2, 2, |i, j| Complex64::new(i as f64 + 0.5, -(j as f64)));
        let path = temp_path("complex-trip");
        write_complex_matrix(&path, &matrix).unwrap();

        let read = read_complex_matrix(&path, 2, 2).unwrap();
        for (a, b) in matrix.iter().zip(read.iter()) {
            approx::assert_relative_eq!(a.re, b.re, max_relative = 1e-10);
            approx::assert_relative_eq!(a.im, b.im, max_relative = 1e-10);
        }

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let path = temp_path("shape");
        std::fs::write(&path, "1.0 2.0 \n3.0 4.0 \n").unwrap();

        assert!(matches!(
            read_real_matrix(&path, 2, 3),
            Err(Error::RowLength { row: 0, found: 2, expected: 3 })
        ));
        assert!(matches!(
            read_real_matrix(&path, 3, 2),
            Err(Error::RowCount { found: 2, expected: 3 })
        ));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn excess_rows_are_counted_in_full() {
        let path = temp_path("excess-rows");
        std::fs::write(&path, "1.0 \n2.0 \n3.0 \n4.0 \n").unwrap();

        assert!(matches!(
            read_real_matrix(&path, 2, 1),
            Err(Error::RowCount { found: 4, expected: 2 })
        ));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn blank_interior_lines_are_a_shape_error() {
        let path = temp_path("blank-line");
        std::fs::write(&path, "1.0 2.0 \n\n3.0 4.0 \n").unwrap();

        assert!(matches!(
            read_real_matrix(&path, 3, 2),
            Err(Error::RowLength { row: 1, found: 0, expected: 2 })
        ));
        // with the blank line counted, the expected two-row read also fails
        assert!(matches!(
            read_real_matrix(&path, 2, 2),
            Err(Error::RowCount { found: 3, expected: 2 })
        ));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let path = temp_path("malformed");
        std::fs::write(&path, "1.0 oops \n").unwrap();
        assert!(matches!(
            read_real_matrix(&path, 1, 2),
            Err(Error::MalformedToken { line: 1, .. })
        ));

        std::fs::write(&path, "(1.0, 2.0) (3.0 \n").unwrap();
        assert!(matches!(
            read_complex_matrix(&path, 1, 2),
            Err(Error::MalformedToken { line: 1, .. })
        ));

        std::fs::remove_file(path).unwrap();
    }
}
