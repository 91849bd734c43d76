use itertools::iproduct;
use std::cmp::Ordering;
use tranship_core::math::RealNumber;
use tranship_core::options::InitialMethod;
use tranship_core::problem::TransportProblem;
use tranship_core::solution::Cell;
use tranship_core::traits::InitialSolution;

#[derive(Debug, Clone, Copy, Default)]
pub struct LeastCost;

#[derive(Debug, Clone, Copy, Default)]
pub struct NorthWest;

#[derive(Debug, Clone, Copy, Default)]
pub struct Vogel;

pub fn initial_solution<T: RealNumber>(method: InitialMethod) -> Box<dyn InitialSolution<T>> {
    match method {
        InitialMethod::LeastCost => Box::new(LeastCost),
        InitialMethod::NorthWest => Box::new(NorthWest),
        InitialMethod::Vogel => Box::new(Vogel),
    }
}

struct Remaining {
    supply: Vec<u64>,
    demand: Vec<u64>,
    shipped: Vec<(Cell, u64)>,
}

impl Remaining {
    fn new<T: RealNumber>(problem: &TransportProblem<T>) -> Self {
        Self {
            supply: problem.supply().to_vec(),
            demand: problem.demand().to_vec(),
            shipped: Vec::new(),
        }
    }

    fn ship(&mut self, (i, j): Cell) -> u64 {
        let qty = self.supply[i].min(self.demand[j]);
        if qty > 0 {
            self.supply[i] -= qty;
            self.demand[j] -= qty;
            self.shipped.push(((i, j), qty));
        }
        qty
    }
}

impl<T> InitialSolution<T> for LeastCost
where
    T: RealNumber,
{
    fn name(&self) -> &str {
        "least-cost"
    }

    fn allocate(&self, problem: &TransportProblem<T>) -> Vec<(Cell, u64)> {
        let mut cells: Vec<Cell> = iproduct!(0..problem.nrows(), 0..problem.ncols()).collect();
        cells.sort_by(|&a, &b| {
            problem
                .cost(a.0, a.1)
                .partial_cmp(&problem.cost(b.0, b.1))
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });
        let mut remaining = Remaining::new(problem);
        for cell in cells {
            remaining.ship(cell);
        }
        remaining.shipped
    }
}

impl<T> InitialSolution<T> for NorthWest
where
    T: RealNumber,
{
    fn name(&self) -> &str {
        "north-west"
    }

    fn allocate(&self, problem: &TransportProblem<T>) -> Vec<(Cell, u64)> {
        let mut remaining = Remaining::new(problem);
        let (mut i, mut j) = (0, 0);
        while i < problem.nrows() && j < problem.ncols() {
            if remaining.supply[i] == 0 {
                i += 1;
            } else if remaining.demand[j] == 0 {
                j += 1;
            } else {
                remaining.ship((i, j));
            }
        }
        remaining.shipped
    }
}

/// Index of the cheapest open entry and the gap to the second cheapest. A
/// line with a single open entry uses that entry's cost as its penalty.
fn penalty<T, I>(entries: I) -> Option<(usize, T)>
where
    T: RealNumber,
    I: Iterator<Item = (usize, T)>,
{
    let mut first: Option<(usize, T)> = None;
    let mut second: Option<T> = None;
    for (idx, cost) in entries {
        match first {
            Some((_, best)) if cost < best => {
                second = Some(best);
                first = Some((idx, cost));
            }
            Some(_) => {
                if second.map_or(true, |s| cost < s) {
                    second = Some(cost);
                }
            }
            None => first = Some((idx, cost)),
        }
    }
    first.map(|(idx, best)| (idx, second.map_or(best, |s| s - best)))
}

impl<T> InitialSolution<T> for Vogel
where
    T: RealNumber,
{
    fn name(&self) -> &str {
        "vogel"
    }

    fn allocate(&self, problem: &TransportProblem<T>) -> Vec<(Cell, u64)> {
        let (m, n) = (problem.nrows(), problem.ncols());
        let mut remaining = Remaining::new(problem);
        loop {
            let open_rows: Vec<usize> = (0..m).filter(|&i| remaining.supply[i] > 0).collect();
            let open_cols: Vec<usize> = (0..n).filter(|&j| remaining.demand[j] > 0).collect();
            if open_rows.is_empty() || open_cols.is_empty() {
                break;
            }

            let mut chosen: Option<(T, Cell)> = None;
            let mut consider = |gap: T, cell: Cell| {
                if chosen.map_or(true, |(best, _)| gap > best) {
                    chosen = Some((gap, cell));
                }
            };
            for &i in &open_rows {
                let row = open_cols.iter().map(|&j| (j, problem.cost(i, j)));
                if let Some((j, gap)) = penalty(row) {
                    consider(gap, (i, j));
                }
            }
            for &j in &open_cols {
                let col = open_rows.iter().map(|&i| (i, problem.cost(i, j)));
                if let Some((i, gap)) = penalty(col) {
                    consider(gap, (i, j));
                }
            }

            match chosen {
                Some((_, cell)) => {
                    remaining.ship(cell);
                }
                None => break,
            }
        }
        remaining.shipped
    }
}
