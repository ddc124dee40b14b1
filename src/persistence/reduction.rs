//! Boundary matrix reduction over Z/2.
//!
//! Columns are sorted row-index vectors; adding two columns is their
//! symmetric difference. The pivot table maps a row to the unique column whose
//! lowest entry it currently is, so it stays an injective partial map for the
//! whole reduction.
//!
//! Reference: Edelsbrunner, Letscher, Zomorodian (2002). "Topological
//! Persistence and Simplification". Chen & Kerber (2011) for the clearing
//! ("twist") optimization.

use log::debug;

use super::PersistencePairing;
use crate::topology::FilteredComplex;
use crate::utils::{FiltrationOps, VertexOps, ZeroVec};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReductionAlgorithm {
    /// Left-to-right reduction of every column.
    #[default]
    Standard,
    /// Reduces dimensions from the top down and clears every column whose
    /// index was claimed as a low, since it is bound to reduce to zero.
    Twist,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryMatrixReducer {
    algorithm: ReductionAlgorithm,
}

impl BoundaryMatrixReducer {
    pub fn new(algorithm: ReductionAlgorithm) -> Self {
        BoundaryMatrixReducer { algorithm }
    }

    pub fn algorithm(&self) -> ReductionAlgorithm {
        self.algorithm
    }

    /// Pairs all positions of a sorted, face-closed complex.
    ///
    /// Pairs are reported in ascending destroyer order, followed by the
    /// essential positions in ascending order. Fails with
    /// `TopologyError::InvalidComplex` if the closure invariant is violated.
    pub fn reduce<D, V>(&self, complex: &FilteredComplex<D, V>) -> anyhow::Result<PersistencePairing>
    where
        D: FiltrationOps,
        V: VertexOps,
    {
        let mut matrix = BoundaryMatrix::from_complex(complex)?;
        debug!(
            "reducing boundary matrix with {} columns ({:?})",
            matrix.columns.len(),
            self.algorithm
        );

        match self.algorithm {
            ReductionAlgorithm::Standard => {
                for j in 0..matrix.columns.len() {
                    matrix.reduce_column(j);
                }
            }
            ReductionAlgorithm::Twist => {
                let top = complex.dimension();
                let mut by_dimension: Vec<Vec<usize>> = vec![Vec::new(); top + 1];
                for (position, simplex) in complex.iter().enumerate() {
                    by_dimension[simplex.dimension()].push(position);
                }
                for positions in by_dimension.iter().skip(1).rev() {
                    for &j in positions {
                        if matrix.columns[j].is_empty() {
                            continue;
                        }
                        if let Some(low) = matrix.reduce_column(j) {
                            matrix.columns[low].clear();
                        }
                    }
                }
            }
        }

        let pairing = matrix.into_pairing()?;
        debug!(
            "reduction finished: {} pairs, {} essential",
            pairing.len(),
            pairing.essential().len()
        );
        Ok(pairing)
    }
}

struct BoundaryMatrix {
    columns: Vec<Vec<usize>>,
    /// row -> column whose low it is
    pivots: Vec<Option<usize>>,
    /// column -> its low after reduction
    lows: Vec<Option<usize>>,
    scratch: Vec<usize>,
    additions: usize,
}

impl BoundaryMatrix {
    fn from_complex<D, V>(complex: &FilteredComplex<D, V>) -> anyhow::Result<Self>
    where
        D: FiltrationOps,
        V: VertexOps,
    {
        let n = complex.len();
        let mut columns = Vec::with_capacity(n);
        for position in 0..n {
            columns.push(complex.boundary(position)?);
        }

        let mut pivots = Vec::new();
        pivots.zero_len(n);
        let mut lows = Vec::new();
        lows.zero_len(n);

        Ok(BoundaryMatrix {
            columns,
            pivots,
            lows,
            scratch: Vec::new(),
            additions: 0,
        })
    }

    /// Adds earlier columns to column `j` until its low is unclaimed or the
    /// column vanishes. Returns the low that `j` claims, if any.
    fn reduce_column(&mut self, j: usize) -> Option<usize> {
        while let Some(&low) = self.columns[j].last() {
            match self.pivots[low] {
                Some(k) => self.add_column(j, k),
                None => {
                    self.pivots[low] = Some(j);
                    self.lows[j] = Some(low);
                    return Some(low);
                }
            }
        }
        None
    }

    /// `columns[target] ^= columns[source]`
    fn add_column(&mut self, target: usize, source: usize) {
        let mut merged = std::mem::take(&mut self.scratch);
        symmetric_difference_into(&self.columns[target], &self.columns[source], &mut merged);
        self.scratch = std::mem::replace(&mut self.columns[target], merged);
        self.additions += 1;
    }

    fn into_pairing(self) -> anyhow::Result<PersistencePairing> {
        debug!("{} column additions", self.additions);

        let mut pairing = PersistencePairing::new(self.columns.len());
        for (destroyer, low) in self.lows.iter().enumerate() {
            if let Some(creator) = *low {
                pairing.add_pair(creator, destroyer)?;
            }
        }
        for position in 0..self.columns.len() {
            if pairing.partner(position).is_none() {
                pairing.add_essential(position)?;
            }
        }
        Ok(pairing)
    }
}

fn symmetric_difference_into(a: &[usize], b: &[usize], out: &mut Vec<usize>) {
    out.clear();
    out.reserve(a.len() + b.len());

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else if b[j] < a[i] {
            out.push(b[j]);
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
}
