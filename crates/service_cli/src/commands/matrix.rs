//! Matrix inversion and decompositions of a user-supplied matrix

use analytics_core::math::linalg::{
    cholesky_banachiewicz, identity, invert, product, qr_decomposition, rank, rayleigh_quotient,
    triangular_type, InversionMethod, Matrix, QrDecomposition, TriangularType,
};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};

use crate::output::{emit, fmt_num, Report, RunContext};
use crate::{CliError, Result};

const TRIANGULAR_FLOOR: f64 = 1e-12;

/// Inversion strategy selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    /// 2 x 2 closed form
    Cramer,
    /// Gauss-Jordan with row swaps
    Gaussian,
    /// Gauss-Jordan after row-addition regularisation
    RowAddition,
}

impl From<Method> for InversionMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Cramer => InversionMethod::Cramer,
            Method::Gaussian => InversionMethod::GaussianElimination,
            Method::RowAddition => InversionMethod::GaussianRowAddition,
        }
    }
}

/// Arguments of `matrix`
#[derive(Args, Debug, Clone)]
pub struct MatrixArgs {
    /// Rows separated by ';', entries by ','
    #[arg(long, default_value = "4,12,-16;12,37,-43;-16,-43,98")]
    pub rows: String,

    /// Inversion method
    #[arg(long, value_enum, default_value_t = Method::Gaussian)]
    pub method: Method,
}

/// Result of `matrix`
#[derive(Debug, Clone, Serialize)]
pub struct MatrixReport {
    pub matrix: Matrix,
    pub method: InversionMethod,
    pub rank: usize,
    pub triangular_type: TriangularType,
    pub inverse: Matrix,
    /// max |A·A⁻¹ − I|
    pub inverse_residual: f64,
    /// `None` unless the matrix is symmetric positive definite
    pub cholesky: Option<Matrix>,
    pub qr: Option<QrDecomposition>,
    /// Rayleigh quotient at the all-ones vector
    pub rayleigh_quotient: f64,
}

fn print_matrix(label: &str, m: &[Vec<f64>]) {
    println!("{label}:");
    for row in m {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>12}", fmt_num(*v, 6))).collect();
        println!("  {}", cells.join(" "));
    }
}

impl Report for MatrixReport {
    fn title(&self) -> String {
        format!("Matrix Analysis ({:?})", self.method)
    }

    fn print_text(&self) {
        print_matrix("A", &self.matrix);
        println!("{:<20} {}", "Rank:", self.rank);
        println!("{:<20} {:?}", "Triangular type:", self.triangular_type);
        println!("{:<20} {}", "Rayleigh quotient:", fmt_num(self.rayleigh_quotient, 6));
        println!();
        print_matrix("A⁻¹", &self.inverse);
        println!("{:<20} {}", "max |AA⁻¹ - I|:", fmt_num(self.inverse_residual, 2));
        if let Some(l) = &self.cholesky {
            println!();
            print_matrix("Cholesky L", l);
        }
        if let Some(qr) = &self.qr {
            println!();
            print_matrix("Q", &qr.q);
            print_matrix("R", &qr.r);
        }
    }
}

/// Parses `"a,b;c,d"` into rows
pub fn parse_matrix(text: &str) -> Result<Matrix> {
    let matrix = text
        .split(';')
        .map(|row| {
            row.split(',')
                .map(|cell| {
                    cell.trim().parse::<f64>().map_err(|_| {
                        CliError::InvalidArgument(format!("invalid matrix entry '{}'", cell.trim()))
                    })
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Matrix>>()?;
    let n = matrix.len();
    if matrix.iter().any(|row| row.len() != n) {
        return Err(CliError::InvalidArgument(format!(
            "matrix must be square, got {n} rows"
        )));
    }
    Ok(matrix)
}

fn is_symmetric(a: &[Vec<f64>]) -> bool {
    a.iter()
        .enumerate()
        .all(|(i, row)| row.iter().enumerate().all(|(j, &v)| v == a[j][i]))
}

/// Inverts and decomposes the matrix
pub fn compute(args: &MatrixArgs) -> Result<MatrixReport> {
    let matrix = parse_matrix(&args.rows)?;
    let method = InversionMethod::from(args.method);
    let inverse = invert(&matrix, method)?;

    let check = product(&matrix, &inverse)?;
    let inverse_residual = check
        .iter()
        .zip(identity(matrix.len()))
        .flat_map(|(row, id_row)| row.iter().zip(id_row).map(|(a, b)| (a - b).abs()).collect::<Vec<_>>())
        .fold(0.0_f64, f64::max);

    let cholesky = if is_symmetric(&matrix) {
        cholesky_banachiewicz(&matrix)
            .map_err(|e| warn!(error = %e, "matrix is symmetric but not positive definite"))
            .ok()
    } else {
        None
    };

    Ok(MatrixReport {
        rank: rank(&matrix)?,
        triangular_type: triangular_type(&matrix, TRIANGULAR_FLOOR)?,
        qr: qr_decomposition(&matrix).ok(),
        rayleigh_quotient: rayleigh_quotient(&matrix, &vec![1.0; matrix.len()])?,
        matrix,
        method,
        inverse,
        inverse_residual,
        cholesky,
    })
}

/// Run the matrix command
pub fn run(args: &MatrixArgs, ctx: &RunContext) -> Result<()> {
    info!(method = ?args.method, "analysing matrix");
    emit(&compute(args)?, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(rows: &str, method: Method) -> MatrixArgs {
        MatrixArgs {
            rows: rows.to_string(),
            method,
        }
    }

    #[test]
    fn test_parse_matrix() {
        assert_eq!(
            parse_matrix("1, 2; 3,4").unwrap(),
            vec![vec![1.0, 2.0], vec![3.0, 4.0]]
        );
        assert!(parse_matrix("1,2;3").is_err());
        assert!(parse_matrix("1,x;3,4").is_err());
    }

    #[test]
    fn test_default_matrix_cholesky() {
        let report = compute(&args("4,12,-16;12,37,-43;-16,-43,98", Method::Gaussian)).unwrap();
        assert_eq!(report.rank, 3);
        assert_eq!(report.triangular_type, TriangularType::NonTriangular);
        assert!(report.inverse_residual < 1e-10);
        let l = report.cholesky.unwrap();
        let expected = [[2.0, 0.0, 0.0], [6.0, 1.0, 0.0], [-8.0, 5.0, 3.0]];
        for (row, exp) in l.iter().zip(expected) {
            for (v, e) in row.iter().zip(exp) {
                assert!((v - e).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_methods_agree_on_2x2() {
        let cramer = compute(&args("4,7;2,6", Method::Cramer)).unwrap();
        let gauss = compute(&args("4,7;2,6", Method::RowAddition)).unwrap();
        for (a, b) in cramer.inverse.iter().flatten().zip(gauss.inverse.iter().flatten()) {
            assert!((a - b).abs() < 1e-12);
        }
        assert!(cramer.cholesky.is_none());
    }

    #[test]
    fn test_singular_matrix_fails() {
        assert!(matches!(
            compute(&args("1,2;2,4", Method::Gaussian)),
            Err(CliError::Linalg(_))
        ));
    }
}
