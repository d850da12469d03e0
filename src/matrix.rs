//! A tiny row-major matrix over f64. It is a serialized 2-d array, so that
//! the DP and the probability tables share the same memory layout.

/// Floor value standing in for log(0). Adding two floors stays finite,
/// so max-comparisons never see a NaN.
pub const EP: f64 = -100000000000000000000000f64;

/// Guarded natural logarithm. Zero (or anything below f64 resolution)
/// maps to the `EP` floor instead of negative infinity.
pub fn log(x: f64) -> f64 {
    assert!(!x.is_sign_negative(), "{}", x);
    if f64::EPSILON < x.abs() {
        x.ln()
    } else {
        EP
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a new (rows x columns) matrix filled with `default`.
    pub fn new(rows: usize, columns: usize, default: f64) -> Self {
        Self {
            rows,
            columns,
            data: vec![default; rows * columns],
        }
    }
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn columns(&self) -> usize {
        self.columns
    }
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.columns..(i + 1) * self.columns]
    }
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.columns..(i + 1) * self.columns]
    }
    pub fn row_sum(&self, i: usize) -> f64 {
        self.row(i).iter().sum()
    }
    /// Element-wise guarded log, returning a fresh matrix. The probability
    /// matrix a caller might still hold is never mutated.
    pub fn ln(&self) -> Matrix {
        Matrix {
            rows: self.rows,
            columns: self.columns,
            data: self.data.iter().map(|&x| log(x)).collect(),
        }
    }
}

impl std::ops::Index<(usize, usize)> for Matrix {
    type Output = f64;
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        assert!(i < self.rows && j < self.columns);
        &self.data[i * self.columns + j]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        assert!(i < self.rows && j < self.columns);
        &mut self.data[i * self.columns + j]
    }
}

impl std::fmt::Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for i in 0..self.rows {
            let row: Vec<_> = self.row(i).iter().map(|x| format!("{:.3}", x)).collect();
            writeln!(f, "{}", row.join("\t"))?;
        }
        Ok(())
    }
}
