use std::fmt;

use ndarray::Array2;

use super::PersistencePairing;
use crate::error::TopologyError;
use crate::topology::FilteredComplex;
use crate::utils::{FiltrationOps, VertexOps};

/// A point of a persistence diagram.
///
/// Unpaired points (essential classes) keep their flag even when their death
/// is replaced by a finite sentinel, so Betti numbers stay correct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<D> {
    birth: D,
    death: D,
    unpaired: bool,
}

impl<D: FiltrationOps> Point<D> {
    pub fn paired(birth: D, death: D) -> Self {
        Point {
            birth,
            death,
            unpaired: false,
        }
    }

    pub fn unpaired(birth: D) -> Self {
        Point {
            birth,
            death: D::infinity(),
            unpaired: true,
        }
    }

    pub fn birth(&self) -> D {
        self.birth
    }

    pub fn death(&self) -> D {
        self.death
    }

    pub fn persistence(&self) -> D {
        if self.unpaired {
            D::infinity()
        } else {
            self.death - self.birth
        }
    }

    pub fn is_unpaired(&self) -> bool {
        self.unpaired
    }

    pub fn is_diagonal(&self) -> bool {
        !self.unpaired && self.birth == self.death
    }
}

impl<D: fmt::Display> fmt::Display for Point<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unpaired {
            write!(f, "{}\tinf", self.birth)
        } else {
            write!(f, "{}\t{}", self.birth, self.death)
        }
    }
}

/// Multiset of (birth, death) points of one homological dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceDiagram<D> {
    dimension: usize,
    points: Vec<Point<D>>,
}

impl<D: FiltrationOps> PersistenceDiagram<D> {
    pub fn new(dimension: usize) -> Self {
        PersistenceDiagram {
            dimension,
            points: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn push(&mut self, point: Point<D>) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point<D>] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point<D>> {
        self.points.iter()
    }

    /// Drops paired points with `birth == death`. Unpaired points are kept.
    pub fn remove_diagonal(&mut self) {
        self.points.retain(|p| !p.is_diagonal());
    }

    /// Drops every unpaired point; `betti` is 0 afterwards.
    pub fn remove_unpaired(&mut self) {
        self.points.retain(|p| !p.is_unpaired());
    }

    /// Replaces the death of every unpaired point by `value`. Non-finite
    /// values leave the diagram untouched.
    pub fn set_unpaired_death(&mut self, value: D) {
        if !value.is_finite() {
            return;
        }
        for point in self.points.iter_mut().filter(|p| p.unpaired) {
            point.death = value;
        }
    }

    /// Number of unpaired points.
    pub fn betti(&self) -> usize {
        self.points.iter().filter(|p| p.unpaired).count()
    }

    /// Points as a `k x 2` array of `(birth, death)` rows.
    pub fn to_array(&self) -> Array2<D> {
        let mut array = Array2::zeros((self.points.len(), 2));
        for (mut row, point) in array.rows_mut().into_iter().zip(self.points.iter()) {
            row[0] = point.birth;
            row[1] = point.death;
        }
        array
    }
}

impl<'a, D> IntoIterator for &'a PersistenceDiagram<D> {
    type Item = &'a Point<D>;
    type IntoIter = std::slice::Iter<'a, Point<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<D: fmt::Display> fmt::Display for PersistenceDiagram<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for point in &self.points {
            writeln!(f, "{}", point)?;
        }
        Ok(())
    }
}

/// Groups a pairing into one diagram per dimension `0..=complex.dimension()`.
///
/// Each point lands in the diagram of its creator's dimension. Births and
/// deaths are the filtration values of the creator and destroyer simplices.
pub fn to_diagrams<D, V>(
    pairing: &PersistencePairing,
    complex: &FilteredComplex<D, V>,
) -> anyhow::Result<Vec<PersistenceDiagram<D>>>
where
    D: FiltrationOps,
    V: VertexOps,
{
    if pairing.size() != complex.len() {
        return Err(TopologyError::invalid(
            complex.len(),
            format!(
                "pairing covers {} positions, complex has {}",
                pairing.size(),
                complex.len()
            ),
        )
        .into());
    }
    if complex.is_empty() {
        return Ok(Vec::new());
    }

    let mut diagrams: Vec<PersistenceDiagram<D>> =
        (0..=complex.dimension()).map(PersistenceDiagram::new).collect();

    for &(creator, destroyer) in pairing.iter() {
        let birth = &complex[creator];
        let death = &complex[destroyer];
        diagrams[birth.dimension()].push(Point::paired(birth.data(), death.data()));
    }
    for &position in pairing.essential() {
        let birth = &complex[position];
        diagrams[birth.dimension()].push(Point::unpaired(birth.data()));
    }

    Ok(diagrams)
}

/// Betti numbers, indexed by diagram dimension.
pub fn betti_numbers<D: FiltrationOps>(diagrams: &[PersistenceDiagram<D>]) -> Vec<usize> {
    let top = diagrams.iter().map(|d| d.dimension() + 1).max().unwrap_or(0);
    let mut betti = vec![0; top];
    for diagram in diagrams {
        betti[diagram.dimension()] += diagram.betti();
    }
    betti
}
