use crate::error::{Error, Result};
use crate::math::matrix::{Matrix, MatrixView};

/// Samples stored one per row as `[inputs..., targets...]`.
///
/// `inputs()` and `targets()` are strided windows into the same table, so no
/// sample data is copied when the dataset is handed to `cost` or `backprop`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    table: Matrix,
    input_width: usize,
}

impl Dataset {
    pub fn new(table: Matrix, input_width: usize) -> Result<Dataset> {
        if input_width == 0 || input_width >= table.cols() {
            return Err(Error::InvalidDataset(format!(
                "input width {input_width} must leave at least one target column in a {}-column table",
                table.cols()
            )));
        }
        Ok(Dataset { table, input_width })
    }

    pub fn inputs(&self) -> MatrixView<'_> {
        self.table.sub(0, 0, self.table.rows(), self.input_width)
    }

    pub fn targets(&self) -> MatrixView<'_> {
        self.table.sub(
            0,
            self.input_width,
            self.table.rows(),
            self.table.cols() - self.input_width,
        )
    }

    pub fn table(&self) -> &Matrix {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.table.rows() == 0
    }
}

/// Two-input boolean gate over all four input combinations, in the order
/// `00, 01, 10, 11`.
pub fn gate(f: impl Fn(bool, bool) -> bool) -> Result<Dataset> {
    let mut table = Matrix::alloc(4, 3)?;
    for i in 0..4 {
        let (x, y) = (i & 2 != 0, i & 1 != 0);
        table.set(i, 0, x as u8 as f64);
        table.set(i, 1, y as u8 as f64);
        table.set(i, 2, f(x, y) as u8 as f64);
    }
    Dataset::new(table, 2)
}

pub fn xor() -> Result<Dataset> {
    gate(|x, y| x != y)
}

pub fn or() -> Result<Dataset> {
    gate(|x, y| x || y)
}

pub fn and() -> Result<Dataset> {
    gate(|x, y| x && y)
}

pub fn nand() -> Result<Dataset> {
    gate(|x, y| !(x && y))
}

/// Every sum `x + y` of two `bits`-wide unsigned integers.
///
/// Inputs are the bits of `x` then of `y`, least significant first. Targets
/// are the low `bits` bits of `x + y` followed by an overflow flag set when
/// `x + y >= 2^bits`.
pub fn adder(bits: usize) -> Result<Dataset> {
    if !(1..=8).contains(&bits) {
        return Err(Error::InvalidDataset(format!("adder width must be 1..=8 bits, got {bits}")));
    }

    let n = 1usize << bits;
    let mut table = Matrix::alloc(n * n, 2 * bits + bits + 1)?;
    let out = 2 * bits;

    for i in 0..n * n {
        let (x, y) = (i / n, i % n);
        let z = x + y;
        for j in 0..bits {
            table.set(i, j, ((x >> j) & 1) as f64);
            table.set(i, j + bits, ((y >> j) & 1) as f64);
            table.set(i, out + j, ((z >> j) & 1) as f64);
        }
        table.set(i, out + bits, (z >= n) as u8 as f64);
    }

    Dataset::new(table, 2 * bits)
}
