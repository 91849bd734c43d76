use crate::problem::{ProblemError, ProblemResult};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabeledMatrix<T> {
    rows: IndexSet<String>,
    cols: IndexSet<String>,
    data: Vec<T>,
}

pub type CostMatrix<T> = LabeledMatrix<T>;

pub type Allocation<T> = LabeledMatrix<T>;

impl<T> LabeledMatrix<T>
where
    T: Copy,
{
    pub fn filled(rows: IndexSet<String>, cols: IndexSet<String>, value: T) -> Self {
        let data = vec![value; rows.len() * cols.len()];
        Self { rows, cols, data }
    }

    pub fn from_parts(
        rows: IndexSet<String>,
        cols: IndexSet<String>,
        data: Vec<T>,
    ) -> ProblemResult<Self> {
        if data.len() != rows.len() * cols.len() {
            return Err(ProblemError::DimensionMismatch(format!(
                "data length {} != {} rows x {} cols",
                data.len(),
                rows.len(),
                cols.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn with_data<U: Copy>(&self, data: Vec<U>) -> ProblemResult<LabeledMatrix<U>> {
        LabeledMatrix::from_parts(self.rows.clone(), self.cols.clone(), data)
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.cols.len()
    }

    pub fn rows(&self) -> &IndexSet<String> {
        &self.rows
    }

    pub fn cols(&self) -> &IndexSet<String> {
        &self.cols
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn at(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols.len() + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let ncols = self.cols.len();
        self.data[row * ncols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[T] {
        let ncols = self.cols.len();
        &self.data[row * ncols..(row + 1) * ncols]
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = T> + '_ {
        self.data.iter().skip(col).step_by(self.cols.len().max(1)).copied()
    }

    pub fn get(&self, row: &str, col: &str) -> Option<T> {
        let i = self.rows.get_index_of(row)?;
        let j = self.cols.get_index_of(col)?;
        Some(self.at(i, j))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, T)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(i, row)| {
            self.cols
                .iter()
                .enumerate()
                .map(move |(j, col)| (row.as_str(), col.as_str(), self.at(i, j)))
        })
    }
}
