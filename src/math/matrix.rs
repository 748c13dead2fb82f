use rand::Rng;
use std::fmt;

use crate::activation::activation::sigmoid;
use crate::error::{Error, Result};

/// Dense row-major `f64` matrix that owns its buffer.
///
/// Element `(i, j)` lives at `data[i * stride + j]`. Owned matrices are always
/// packed (`stride == cols`); strided access comes from the borrowed
/// [`MatrixView`] / [`MatrixViewMut`] types handed out by `row`, `sub` and
/// friends.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    stride: usize,
    data: Vec<f64>,
}

/// Read-only window into another matrix's storage. Never owns the buffer.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    rows: usize,
    cols: usize,
    stride: usize,
    data: &'a [f64],
}

/// Mutable window into another matrix's storage. Never owns the buffer.
#[derive(Debug)]
pub struct MatrixViewMut<'a> {
    rows: usize,
    cols: usize,
    stride: usize,
    data: &'a mut [f64],
}

/// Number of buffer elements a `rows x cols` window with `stride` spans.
fn span(rows: usize, cols: usize, stride: usize) -> usize {
    if rows == 0 {
        0
    } else {
        (rows - 1) * stride + cols
    }
}

/// The one place `(i, j)` becomes a buffer offset.
fn offset(rows: usize, cols: usize, stride: usize, i: usize, j: usize) -> usize {
    assert!(
        i < rows && j < cols,
        "index ({i}, {j}) out of bounds for a {rows}x{cols} matrix"
    );
    i * stride + j
}

fn check_same_shape(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Result<()> {
    if left != right {
        return Err(Error::ShapeMismatch { op, left, right });
    }
    Ok(())
}

fn check_dot(dst: (usize, usize), a: (usize, usize), b: (usize, usize)) -> Result<()> {
    if a.1 != b.0 {
        return Err(Error::ShapeMismatch { op: "dot", left: a, right: b });
    }
    check_same_shape("dot", dst, (a.0, b.1))
}

impl Matrix {
    /// Allocates a zeroed `rows x cols` matrix.
    ///
    /// Fails with [`Error::Allocation`] when the element count overflows or
    /// the allocator refuses the reservation.
    pub fn alloc(rows: usize, cols: usize) -> Result<Matrix> {
        let len = rows
            .checked_mul(cols)
            .ok_or(Error::Allocation { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::Allocation { rows, cols })?;
        data.resize(len, 0.0);

        Ok(Matrix { rows, cols, stride: cols, data })
    }

    /// Builds a matrix from row vectors. All rows must share one length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        let mut res = Matrix::alloc(rows, cols)?;

        for (i, row) in data.iter().enumerate() {
            check_same_shape("from_data", (1, cols), (1, row.len()))?;
            res.data[i * cols..(i + 1) * cols].copy_from_slice(row);
        }

        Ok(res)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Packed backing buffer in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn view(&self) -> MatrixView<'_> {
        MatrixView {
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
            data: &self.data,
        }
    }

    pub fn view_mut(&mut self) -> MatrixViewMut<'_> {
        MatrixViewMut {
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
            data: &mut self.data,
        }
    }

    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.data[offset(self.rows, self.cols, self.stride, i, j)]
    }

    pub fn at_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.data[offset(self.rows, self.cols, self.stride, i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, x: f64) {
        *self.at_mut(i, j) = x;
    }

    /// Zero-copy view of row `i`.
    pub fn row(&self, i: usize) -> MatrixView<'_> {
        self.view().row(i)
    }

    pub fn row_mut(&mut self, i: usize) -> MatrixViewMut<'_> {
        self.view_mut().into_row(i)
    }

    /// Zero-copy `rows x cols` window starting at `(row, col)`. The window
    /// keeps this matrix's stride, so it may be wider-strided than it is wide.
    pub fn sub(&self, row: usize, col: usize, rows: usize, cols: usize) -> MatrixView<'_> {
        self.view().sub(row, col, rows, cols)
    }

    pub fn sub_mut(&mut self, row: usize, col: usize, rows: usize, cols: usize) -> MatrixViewMut<'_> {
        self.view_mut().into_sub(row, col, rows, cols)
    }

    pub fn fill(&mut self, x: f64) {
        self.view_mut().fill(x);
    }

    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, low: f64, high: f64) {
        self.view_mut().randomize(rng, low, high);
    }

    pub fn copy_from<'b>(&mut self, src: impl Into<MatrixView<'b>>) -> Result<()> {
        self.view_mut().copy_from(src)
    }

    pub fn add_in_place<'b>(&mut self, a: impl Into<MatrixView<'b>>) -> Result<()> {
        self.view_mut().add_in_place(a)
    }

    pub fn dot<'b, 'c>(
        &mut self,
        a: impl Into<MatrixView<'b>>,
        b: impl Into<MatrixView<'c>>,
    ) -> Result<()> {
        self.view_mut().dot(a, b)
    }

    pub fn sigmoid_in_place(&mut self) {
        self.view_mut().sigmoid_in_place();
    }

    pub fn scale(&mut self, factor: f64) {
        self.view_mut().scale(factor);
    }

    pub fn add_scaled<'b>(&mut self, a: impl Into<MatrixView<'b>>, factor: f64) -> Result<()> {
        self.view_mut().add_scaled(a, factor)
    }

    /// Writes `name = [ ... ]` indented by `pad` spaces.
    pub(crate) fn write_named(&self, f: &mut fmt::Formatter<'_>, name: &str, pad: usize) -> fmt::Result {
        if name.is_empty() {
            writeln!(f, "{:pad$}[", "")?;
        } else {
            writeln!(f, "{:pad$}{name} = [", "")?;
        }
        for i in 0..self.rows {
            write!(f, "{:pad$}  ", "")?;
            for j in 0..self.cols {
                write!(f, "{:.6} ", self.at(i, j))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{:pad$}]", "")
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_named(f, "", 0)
    }
}

impl<'a> From<&'a Matrix> for MatrixView<'a> {
    fn from(m: &'a Matrix) -> Self {
        m.view()
    }
}

impl<'a> From<&'a mut Matrix> for MatrixView<'a> {
    fn from(m: &'a mut Matrix) -> Self {
        m.view()
    }
}

impl<'a> MatrixView<'a> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.data[offset(self.rows, self.cols, self.stride, i, j)]
    }

    pub fn row(&self, i: usize) -> MatrixView<'a> {
        self.sub(i, 0, 1, self.cols)
    }

    pub fn sub(&self, row: usize, col: usize, rows: usize, cols: usize) -> MatrixView<'a> {
        assert!(
            row + rows <= self.rows && col + cols <= self.cols,
            "window ({row}, {col}) {rows}x{cols} exceeds a {}x{} matrix",
            self.rows,
            self.cols
        );
        let (stride, data) = (self.stride, self.data);
        let start = if rows == 0 { 0 } else { row * stride + col };
        MatrixView {
            rows,
            cols,
            stride,
            data: &data[start..start + span(rows, cols, stride)],
        }
    }

    /// Copies the window into a freshly allocated, packed matrix.
    pub fn to_matrix(&self) -> Result<Matrix> {
        let mut res = Matrix::alloc(self.rows, self.cols)?;
        res.copy_from(*self)?;
        Ok(res)
    }
}

impl<'a> MatrixViewMut<'a> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_view(&self) -> MatrixView<'_> {
        MatrixView {
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
            data: &*self.data,
        }
    }

    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.data[offset(self.rows, self.cols, self.stride, i, j)]
    }

    pub fn at_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.data[offset(self.rows, self.cols, self.stride, i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, x: f64) {
        *self.at_mut(i, j) = x;
    }

    pub fn row_mut(&mut self, i: usize) -> MatrixViewMut<'_> {
        self.sub_mut(i, 0, 1, self.cols)
    }

    pub fn into_row(self, i: usize) -> MatrixViewMut<'a> {
        let cols = self.cols;
        self.into_sub(i, 0, 1, cols)
    }

    pub fn sub_mut(&mut self, row: usize, col: usize, rows: usize, cols: usize) -> MatrixViewMut<'_> {
        MatrixViewMut {
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
            data: &mut *self.data,
        }
        .into_sub(row, col, rows, cols)
    }

    pub fn into_sub(self, row: usize, col: usize, rows: usize, cols: usize) -> MatrixViewMut<'a> {
        assert!(
            row + rows <= self.rows && col + cols <= self.cols,
            "window ({row}, {col}) {rows}x{cols} exceeds a {}x{} matrix",
            self.rows,
            self.cols
        );
        let MatrixViewMut { stride, data, .. } = self;
        let start = if rows == 0 { 0 } else { row * stride + col };
        MatrixViewMut {
            rows,
            cols,
            stride,
            data: &mut data[start..start + span(rows, cols, stride)],
        }
    }

    /// Applies `f` to every element inside the window, skipping the gap
    /// between `cols` and `stride`.
    fn for_each_mut(&mut self, mut f: impl FnMut(&mut f64)) {
        for i in 0..self.rows {
            let start = i * self.stride;
            self.data[start..start + self.cols].iter_mut().for_each(&mut f);
        }
    }

    pub fn fill(&mut self, x: f64) {
        self.for_each_mut(|e| *e = x);
    }

    /// Independent uniform draw in `[low, high)` per element.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, low: f64, high: f64) {
        self.for_each_mut(|e| *e = rng.gen::<f64>() * (high - low) + low);
    }

    pub fn copy_from<'b>(&mut self, src: impl Into<MatrixView<'b>>) -> Result<()> {
        let src = src.into();
        check_same_shape("copy", self.shape(), src.shape())?;

        for i in 0..self.rows {
            for j in 0..self.cols {
                self.set(i, j, src.at(i, j));
            }
        }
        Ok(())
    }

    pub fn add_in_place<'b>(&mut self, a: impl Into<MatrixView<'b>>) -> Result<()> {
        let a = a.into();
        check_same_shape("add_in_place", self.shape(), a.shape())?;
        self.add_unchecked(a);
        Ok(())
    }

    /// `self[i, j] = Σ_k a[i, k] * b[k, j]`. On a shape error `self` is
    /// left untouched.
    pub fn dot<'b, 'c>(
        &mut self,
        a: impl Into<MatrixView<'b>>,
        b: impl Into<MatrixView<'c>>,
    ) -> Result<()> {
        let (a, b) = (a.into(), b.into());
        check_dot(self.shape(), a.shape(), b.shape())?;
        self.dot_unchecked(a, b);
        Ok(())
    }

    pub fn sigmoid_in_place(&mut self) {
        self.for_each_mut(|e| *e = sigmoid(*e));
    }

    pub fn scale(&mut self, factor: f64) {
        self.for_each_mut(|e| *e *= factor);
    }

    /// `self += factor * a`, elementwise.
    pub fn add_scaled<'b>(&mut self, a: impl Into<MatrixView<'b>>, factor: f64) -> Result<()> {
        let a = a.into();
        check_same_shape("add_scaled", self.shape(), a.shape())?;
        for i in 0..self.rows {
            for j in 0..self.cols {
                *self.at_mut(i, j) += factor * a.at(i, j);
            }
        }
        Ok(())
    }

    /// Shapes are guaranteed by the caller's own invariants.
    pub(crate) fn add_unchecked(&mut self, a: MatrixView<'_>) {
        debug_assert_eq!(self.shape(), a.shape());
        for i in 0..self.rows {
            for j in 0..self.cols {
                *self.at_mut(i, j) += a.at(i, j);
            }
        }
    }

    pub(crate) fn dot_unchecked(&mut self, a: MatrixView<'_>, b: MatrixView<'_>) {
        debug_assert!(check_dot(self.shape(), a.shape(), b.shape()).is_ok());
        let n = a.cols;
        for i in 0..self.rows {
            for j in 0..self.cols {
                let mut sum = 0.0;
                for k in 0..n {
                    sum += a.at(i, k) * b.at(k, j);
                }
                self.set(i, j, sum);
            }
        }
    }
}

impl<'a, 'b> From<&'b MatrixViewMut<'a>> for MatrixView<'b> {
    fn from(m: &'b MatrixViewMut<'a>) -> Self {
        m.as_view()
    }
}
