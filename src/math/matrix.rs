use serde::{Deserialize, Serialize};

/// Row-major weight matrix as stored in model artifacts.
///
/// A layer with `IN` inputs and `OUT` neurons stores an `IN × OUT` matrix so
/// that a single input row multiplies straight through: `(1 × IN) · (IN × OUT)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f32>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from nested rows. An empty outer vector yields a 0×0 matrix.
    pub fn from_data(data: Vec<Vec<f32>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map(|r| r.len()).unwrap_or(0),
            data,
        }
    }

    /// Returns a description of the first inconsistency between the declared
    /// `rows`/`cols` and the actual nested data, if any.
    pub fn shape_error(&self) -> Option<String> {
        if self.data.len() != self.rows {
            return Some(format!(
                "declares {} rows but holds {}",
                self.rows,
                self.data.len()
            ));
        }
        self.data
            .iter()
            .position(|row| row.len() != self.cols)
            .map(|i| {
                format!(
                    "row {} has {} values, expected {}",
                    i,
                    self.data[i].len(),
                    self.cols
                )
            })
    }

    /// Multiplies a single input row by this matrix: `(1 × rows) · (rows × cols)`.
    ///
    /// Returns `None` when `input.len() != rows`.
    pub fn row_product(&self, input: &[f32]) -> Option<Vec<f32>> {
        if input.len() != self.rows {
            return None;
        }
        let mut out = vec![0.0f32; self.cols];
        for (x, row) in input.iter().zip(self.data.iter()) {
            if *x == 0.0 {
                continue;
            }
            for (acc, w) in out.iter_mut().zip(row.iter()) {
                *acc += x * w;
            }
        }
        Some(out)
    }
}
