//! Matrix value types shared by every operation.
//!
//! An `EventMatrix` is a T x N grid of booleans: rows are time steps in
//! ascending order, columns are independent series. Nothing in the engine
//! reorders rows or reads across columns. Matrices are values: operations
//! borrow their inputs and return freshly allocated outputs.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{Result, SignalError};

/// `(rows, columns)`.
pub type Shape = (usize, usize);

/// Float matrix (prices) aligned with an `EventMatrix`.
pub type PriceMatrix = Array2<f64>;

/// Boolean occurrence matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMatrix {
    data: Array2<bool>,
}

impl EventMatrix {
    pub fn new(data: Array2<bool>) -> Self {
        Self { data }
    }

    /// All-False matrix of the given shape.
    pub fn empty(shape: Shape) -> Self {
        Self {
            data: Array2::from_elem(shape, false),
        }
    }

    /// All-False matrix with the same shape as `other`.
    pub fn empty_like(other: &EventMatrix) -> Self {
        Self::empty(other.shape())
    }

    /// Single-column matrix.
    pub fn from_column(values: &[bool]) -> Self {
        Self {
            data: Array2::from_shape_fn((values.len(), 1), |(i, _)| values[i]),
        }
    }

    /// Build from row vectors. Ragged rows are rejected.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        for row in rows {
            if row.len() != n_cols {
                return Err(SignalError::ShapeMismatch {
                    what: "row",
                    expected: (1, n_cols),
                    actual: (1, row.len()),
                });
            }
        }
        Ok(Self {
            data: Array2::from_shape_fn((n_rows, n_cols), |(i, j)| rows[i][j]),
        })
    }

    /// Build from row-major flat data.
    pub fn from_flat(shape: Shape, values: Vec<bool>) -> Result<Self> {
        let len = values.len();
        let data = Array2::from_shape_vec(shape, values).map_err(|_| SignalError::ShapeMismatch {
            what: "flat buffer",
            expected: shape,
            actual: (len, 1),
        })?;
        Ok(Self { data })
    }

    pub fn shape(&self) -> Shape {
        self.data.dim()
    }

    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.data[[row, col]]
    }

    pub fn column(&self, col: usize) -> ArrayView1<'_, bool> {
        self.data.index_axis(Axis(1), col)
    }

    pub fn view(&self) -> ArrayView2<'_, bool> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array2<bool> {
        &self.data
    }

    pub fn into_inner(self) -> Array2<bool> {
        self.data
    }

    /// Row indices of the True cells in `col`, ascending.
    pub fn true_indices(&self, col: usize) -> Vec<usize> {
        self.column(col)
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| v.then_some(i))
            .collect()
    }

    /// Column values as an owned vector.
    pub fn column_vec(&self, col: usize) -> Vec<bool> {
        self.column(col).to_vec()
    }

    /// Validate opaque label sequences against the matrix dimensions.
    ///
    /// Labels are never inspected, only counted.
    pub fn check_labels<I, C>(&self, index: Option<&[I]>, columns: Option<&[C]>) -> Result<()> {
        if let Some(index) = index {
            if index.len() != self.n_rows() {
                return Err(SignalError::LabelCount {
                    axis: "index",
                    expected: self.n_rows(),
                    actual: index.len(),
                });
            }
        }
        if let Some(columns) = columns {
            if columns.len() != self.n_cols() {
                return Err(SignalError::LabelCount {
                    axis: "column",
                    expected: self.n_cols(),
                    actual: columns.len(),
                });
            }
        }
        Ok(())
    }
}

impl From<Array2<bool>> for EventMatrix {
    fn from(data: Array2<bool>) -> Self {
        Self::new(data)
    }
}

/// Per-cell integer ranks; 0 means "no rank".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankMatrix {
    data: Array2<u32>,
}

impl RankMatrix {
    pub fn new(data: Array2<u32>) -> Self {
        Self { data }
    }

    pub fn shape(&self) -> Shape {
        self.data.dim()
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.data[[row, col]]
    }

    pub fn column(&self, col: usize) -> ArrayView1<'_, u32> {
        self.data.index_axis(Axis(1), col)
    }

    pub fn column_vec(&self, col: usize) -> Vec<u32> {
        self.column(col).to_vec()
    }

    pub fn as_array(&self) -> &Array2<u32> {
        &self.data
    }

    pub fn into_inner(self) -> Array2<u32> {
        self.data
    }

    /// Largest rank per column (0 for columns without ranks).
    pub fn max_per_column(&self) -> Vec<u32> {
        self.data
            .axis_iter(Axis(1))
            .map(|col| col.iter().copied().max().unwrap_or(0))
            .collect()
    }

    /// Cells whose rank equals `n`.
    pub fn eq_mask(&self, n: u32) -> EventMatrix {
        EventMatrix::new(self.data.mapv(|r| r == n))
    }

    /// Cells whose rank is at least `n`. `n = 0` selects every cell.
    pub fn ge_mask(&self, n: u32) -> EventMatrix {
        EventMatrix::new(self.data.mapv(|r| r >= n))
    }
}

pub(crate) fn ensure_shape(what: &'static str, expected: Shape, actual: Shape) -> Result<()> {
    if expected != actual {
        return Err(SignalError::ShapeMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
