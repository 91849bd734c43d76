use crate::simplex::SolveError;
use std::collections::VecDeque;
use tranship_core::math::RealNumber;
use tranship_core::problem::TransportProblem;
use tranship_core::solution::Cell;

struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

#[derive(Debug, Clone)]
pub struct Potentials<T> {
    pub rows: Vec<T>,
    pub cols: Vec<T>,
}

impl<T> Potentials<T>
where
    T: RealNumber,
{
    pub fn reduced_cost(&self, problem: &TransportProblem<T>, (i, j): Cell) -> T {
        problem.cost(i, j) - self.rows[i] - self.cols[j]
    }
}

#[derive(Debug, Clone)]
pub struct Basis {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    is_basic: Vec<bool>,
}

impl Basis {
    /// Starts from `allocated` (which must be acyclic) and pads with
    /// zero-valued cells joining separate components until the tree spans
    /// every node. Returns the basis and the number of padded cells.
    pub fn spanning(rows: usize, cols: usize, allocated: &[Cell]) -> Result<(Self, usize), SolveError> {
        let target = (rows + cols).saturating_sub(1);
        let mut sets = DisjointSets::new(rows + cols);
        let mut basis = Self {
            rows,
            cols,
            cells: Vec::with_capacity(target),
            is_basic: vec![false; rows * cols],
        };

        for &(i, j) in allocated {
            if i >= rows || j >= cols {
                return Err(SolveError::InvalidBasis(format!(
                    "cell ({i}, {j}) outside a {rows}x{cols} tableau"
                )));
            }
            if !sets.union(i, rows + j) {
                return Err(SolveError::InvalidBasis(format!(
                    "cell ({i}, {j}) closes a cycle"
                )));
            }
            basis.insert((i, j));
        }

        let mut padded = 0;
        'pad: for i in 0..rows {
            for j in 0..cols {
                if basis.cells.len() >= target {
                    break 'pad;
                }
                if !basis.contains((i, j)) && sets.union(i, rows + j) {
                    basis.insert((i, j));
                    padded += 1;
                }
            }
        }

        if basis.cells.len() != target {
            return Err(SolveError::InvalidBasis(format!(
                "{} basic cells, expected {target}",
                basis.cells.len()
            )));
        }
        Ok((basis, padded))
    }

    fn insert(&mut self, (i, j): Cell) {
        self.cells.push((i, j));
        self.is_basic[i * self.cols + j] = true;
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, (i, j): Cell) -> bool {
        self.is_basic[i * self.cols + j]
    }

    pub fn replace(&mut self, leaving: Cell, entering: Cell) -> Result<(), SolveError> {
        let slot = self
            .cells
            .iter()
            .position(|&cell| cell == leaving)
            .ok_or_else(|| {
                SolveError::InvalidBasis(format!("leaving cell {leaving:?} is not basic"))
            })?;
        self.cells[slot] = entering;
        self.is_basic[leaving.0 * self.cols + leaving.1] = false;
        self.is_basic[entering.0 * self.cols + entering.1] = true;
        Ok(())
    }

    fn adjacency(&self) -> Vec<Vec<(usize, Cell)>> {
        let mut adj = vec![Vec::new(); self.rows + self.cols];
        for &(i, j) in &self.cells {
            adj[i].push((self.rows + j, (i, j)));
            adj[self.rows + j].push((i, (i, j)));
        }
        adj
    }

    pub fn potentials<T: RealNumber>(&self, problem: &TransportProblem<T>) -> Potentials<T> {
        let mut rows = vec![T::zero(); self.rows];
        let mut cols = vec![T::zero(); self.cols];
        if self.rows == 0 {
            return Potentials { rows, cols };
        }
        let adj = self.adjacency();
        let mut seen = vec![false; self.rows + self.cols];
        let mut queue = VecDeque::from([0usize]);
        seen[0] = true;
        while let Some(node) = queue.pop_front() {
            for &(next, (i, j)) in &adj[node] {
                if seen[next] {
                    continue;
                }
                seen[next] = true;
                if node < self.rows {
                    cols[j] = problem.cost(i, j) - rows[i];
                } else {
                    rows[i] = problem.cost(i, j) - cols[j];
                }
                queue.push_back(next);
            }
        }
        Potentials { rows, cols }
    }

    /// The tree path closing the cycle opened by `entering`, listed from the
    /// entering column back to the entering row. Cells at even positions
    /// lose flow, cells at odd positions gain it.
    pub fn cycle(&self, entering: Cell) -> Result<Vec<Cell>, SolveError> {
        let (p, q) = entering;
        let start = p;
        let goal = self.rows + q;
        let adj = self.adjacency();
        let mut via: Vec<Option<(usize, Cell)>> = vec![None; self.rows + self.cols];
        let mut seen = vec![false; self.rows + self.cols];
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(node) = queue.pop_front() {
            if node == goal {
                break;
            }
            for &(next, cell) in &adj[node] {
                if !seen[next] {
                    seen[next] = true;
                    via[next] = Some((node, cell));
                    queue.push_back(next);
                }
            }
        }

        let mut path = Vec::new();
        let mut node = goal;
        while node != start {
            let (prev, cell) = via[node].ok_or_else(|| {
                SolveError::InvalidBasis(format!("no tree path closes a cycle with {entering:?}"))
            })?;
            path.push(cell);
            node = prev;
        }
        Ok(path)
    }
}
