//! Persistent homology of filtered complexes over Z/2.
//!
//! `reduce` runs the general boundary matrix reduction and reports one
//! diagram per dimension. `reduce_zero_dimensional` only tracks connected
//! components with a union-find and agrees with the dimension-0 output of
//! `reduce`. The bipartite entry points build a graph complex from a weight
//! matrix and run the union-find on it.

use log::debug;
use ndarray::{ArrayView2, ArrayViewD, Ix2};
use rayon::prelude::*;

mod connected_components;
mod diagram;
mod pairing;
mod reduction;

pub use connected_components::ConnectedComponentsTracker;
pub use diagram::{betti_numbers, to_diagrams, PersistenceDiagram, Point};
pub use pairing::PersistencePairing;
pub use reduction::{BoundaryMatrixReducer, ReductionAlgorithm};

use crate::error::TopologyError;
use crate::topology::{DimensionFirstFiltration, FilteredComplex, Simplex};
use crate::utils::{FiltrationOps, VertexOps};

/// Options for the zero-dimensional persistence of a bipartite weight matrix.
#[derive(Debug, Clone, Copy)]
pub struct BipartiteOptions<D> {
    /// Filter from large weights to small ones.
    pub reverse_order: bool,
    /// Filtration value shared by all vertices.
    pub vertex_weight: D,
    /// Death assigned to unpaired points; +inf keeps them at infinity.
    pub unpaired_sentinel: D,
}

impl<D: FiltrationOps> Default for BipartiteOptions<D> {
    fn default() -> Self {
        BipartiteOptions {
            reverse_order: true,
            vertex_weight: D::one(),
            unpaired_sentinel: D::infinity(),
        }
    }
}

impl<D: FiltrationOps> BipartiteOptions<D> {
    pub fn with_reverse_order(mut self, reverse_order: bool) -> Self {
        self.reverse_order = reverse_order;
        self
    }

    pub fn with_vertex_weight(mut self, vertex_weight: D) -> Self {
        self.vertex_weight = vertex_weight;
        self
    }

    pub fn with_unpaired_sentinel(mut self, unpaired_sentinel: D) -> Self {
        self.unpaired_sentinel = unpaired_sentinel;
        self
    }
}

/// Persistence diagrams of every dimension of a sorted, face-closed complex.
pub fn reduce<D, V>(complex: &FilteredComplex<D, V>) -> anyhow::Result<Vec<PersistenceDiagram<D>>>
where
    D: FiltrationOps,
    V: VertexOps,
{
    reduce_with(complex, &BoundaryMatrixReducer::default())
}

pub fn reduce_with<D, V>(
    complex: &FilteredComplex<D, V>,
    reducer: &BoundaryMatrixReducer,
) -> anyhow::Result<Vec<PersistenceDiagram<D>>>
where
    D: FiltrationOps,
    V: VertexOps,
{
    let pairing = reducer.reduce(complex)?;
    to_diagrams(&pairing, complex)
}

/// Persistence diagram of a single dimension.
pub fn reduce_dimension<D, V>(
    complex: &FilteredComplex<D, V>,
    dimension: usize,
) -> anyhow::Result<PersistenceDiagram<D>>
where
    D: FiltrationOps,
    V: VertexOps,
{
    let available = complex.dimension();
    if dimension > available || complex.is_empty() {
        return Err(TopologyError::DimensionMismatch {
            requested: dimension,
            available,
        }
        .into());
    }
    let mut diagrams = reduce(complex)?;
    Ok(diagrams.swap_remove(dimension))
}

/// Zero-dimensional diagram and pairing via union-find.
///
/// A finite `unpaired_sentinel` replaces the death of unpaired points in the
/// returned diagram; the pairing is left as computed.
pub fn reduce_zero_dimensional<D, V>(
    complex: &FilteredComplex<D, V>,
    unpaired_sentinel: D,
) -> anyhow::Result<(PersistenceDiagram<D>, PersistencePairing)>
where
    D: FiltrationOps,
    V: VertexOps,
{
    let pairing = ConnectedComponentsTracker::new().pairing(complex)?;

    let mut diagram = PersistenceDiagram::new(0);
    for &(creator, destroyer) in pairing.iter() {
        diagram.push(Point::paired(complex[creator].data(), complex[destroyer].data()));
    }
    for &position in pairing.essential() {
        diagram.push(Point::unpaired(complex[position].data()));
    }
    diagram.set_unpaired_death(unpaired_sentinel);

    Ok((diagram, pairing))
}

/// Zero-dimensional diagram of the bipartite graph spanned by a weight matrix.
///
/// Rows become vertices `0..n`, columns vertices `n..n + m`, and every entry
/// `(u, v)` an edge `{u, n + v}` carrying the entry as its weight. Vertices
/// precede all edges; edges are ordered by weight, descending when
/// `reverse_order` is set.
pub fn reduce_bipartite_matrix<D>(
    matrix: ArrayView2<D>,
    options: &BipartiteOptions<D>,
) -> anyhow::Result<PersistenceDiagram<D>>
where
    D: FiltrationOps,
{
    let (n, m) = matrix.dim();
    let mut simplices: Vec<Simplex<D, usize>> = Vec::with_capacity(n + m + n * m);
    for v in 0..n + m {
        simplices.push(Simplex::vertex(v, options.vertex_weight));
    }
    for ((u, v), &weight) in matrix.indexed_iter() {
        simplices.push(Simplex::new([u, n + v], weight)?);
    }

    let mut complex = FilteredComplex::new(simplices);
    complex.sort_with(&DimensionFirstFiltration::new(options.reverse_order));
    debug!(
        "bipartite complex: {} x {} matrix, {} simplices",
        n,
        m,
        complex.len()
    );

    let (diagram, _) = reduce_zero_dimensional(&complex, options.unpaired_sentinel)?;
    Ok(diagram)
}

/// As `reduce_bipartite_matrix`, for arrays of dynamic rank.
pub fn reduce_bipartite_array<D>(
    matrix: ArrayViewD<D>,
    options: &BipartiteOptions<D>,
) -> anyhow::Result<PersistenceDiagram<D>>
where
    D: FiltrationOps,
{
    if matrix.ndim() != 2 {
        return Err(TopologyError::Format(format!(
            "expected a two-dimensional matrix, got {} dimensions",
            matrix.ndim()
        ))
        .into());
    }
    let matrix = matrix
        .into_dimensionality::<Ix2>()
        .map_err(|e| TopologyError::Format(e.to_string()))?;
    reduce_bipartite_matrix(matrix, options)
}

/// As `reduce_bipartite_matrix`, for a row-major buffer with an explicit shape.
pub fn reduce_bipartite_buffer<D>(
    data: &[D],
    shape: &[usize],
    options: &BipartiteOptions<D>,
) -> anyhow::Result<PersistenceDiagram<D>>
where
    D: FiltrationOps,
{
    let (n, m) = match *shape {
        [n, m] => (n, m),
        _ => {
            return Err(TopologyError::Format(format!(
                "only two-dimensional buffers are supported, got shape {:?}",
                shape
            ))
            .into())
        }
    };
    let matrix = ArrayView2::from_shape((n, m), data).map_err(|e| {
        TopologyError::Format(format!(
            "buffer of length {} does not match shape {:?}: {}",
            data.len(),
            shape,
            e
        ))
    })?;
    reduce_bipartite_matrix(matrix, options)
}

/// Reduces independent complexes in parallel.
pub fn reduce_all<D, V>(complexes: &[FilteredComplex<D, V>]) -> Vec<anyhow::Result<Vec<PersistenceDiagram<D>>>>
where
    D: FiltrationOps,
    V: VertexOps,
{
    complexes.par_iter().map(reduce).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, ArrayD, IxDyn};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn s(vertices: &[u32], data: f64) -> Simplex<f64, u32> {
        Simplex::new(vertices.iter().copied(), data).unwrap()
    }

    fn triangle_edges() -> Vec<Simplex<f64, u32>> {
        vec![
            s(&[0], 0.0),
            s(&[1], 0.0),
            s(&[2], 0.0),
            s(&[0, 1], 0.0),
            s(&[0, 1], 0.0),
            s(&[0, 2], 0.0),
            s(&[1, 2], 0.0),
        ]
    }

    /// Flag complex up to dimension 2 of random points in the unit square,
    /// filtered by the longest edge.
    fn random_flag_complex(seed: u64, points: usize, radius: f64) -> FilteredComplex<f64, u32> {
        let mut rng = StdRng::seed_from_u64(seed);
        let coordinates: Vec<(f64, f64)> = (0..points)
            .map(|_| (rng.random::<f64>(), rng.random::<f64>()))
            .collect();
        let distance = |i: usize, j: usize| {
            let (dx, dy) = (
                coordinates[i].0 - coordinates[j].0,
                coordinates[i].1 - coordinates[j].1,
            );
            (dx * dx + dy * dy).sqrt()
        };

        let mut simplices = Vec::new();
        for i in 0..points {
            simplices.push(Simplex::vertex(i as u32, 0.0));
            for j in i + 1..points {
                let dij = distance(i, j);
                if dij > radius {
                    continue;
                }
                simplices.push(Simplex::new([i as u32, j as u32], dij).unwrap());
                for k in j + 1..points {
                    let (dik, djk) = (distance(i, k), distance(j, k));
                    if dik <= radius && djk <= radius {
                        let value = dij.max(dik).max(djk);
                        simplices.push(Simplex::new([i as u32, j as u32, k as u32], value).unwrap());
                    }
                }
            }
        }
        let mut complex = FilteredComplex::new(simplices);
        complex.sort();
        complex
    }

    fn graph_only(complex: &FilteredComplex<f64, u32>) -> FilteredComplex<f64, u32> {
        complex
            .iter()
            .filter(|s| s.dimension() <= 1)
            .cloned()
            .collect()
    }

    #[test]
    fn test_filled_triangle() {
        let mut simplices = triangle_edges();
        simplices.push(s(&[0, 1, 2], 0.0));
        let mut complex = FilteredComplex::new(simplices);
        complex.prepare();

        let diagrams = reduce(&complex).unwrap();
        assert_eq!(diagrams.len(), 3);
        assert_eq!(diagrams[0].betti(), 1);
        assert_eq!(diagrams[1].betti(), 0);
        assert_eq!(betti_numbers(&diagrams), vec![1, 0, 0]);
    }

    #[test]
    fn test_hollow_triangle() {
        let mut complex = FilteredComplex::new(triangle_edges());
        complex.prepare();

        let diagrams = reduce(&complex).unwrap();
        assert_eq!(diagrams.len(), 2);
        assert_eq!(diagrams[0].betti(), 1);
        assert_eq!(diagrams[1].betti(), 1);
        assert_eq!(diagrams[1].points(), &[Point::unpaired(0.0)]);
    }

    #[test]
    fn test_two_vertices_and_edge() {
        let mut complex = FilteredComplex::new(vec![s(&[0], 0.0), s(&[1], 0.0), s(&[0, 1], 1.0)]);
        complex.sort();

        let (diagram, pairing) = reduce_zero_dimensional(&complex, f64::INFINITY).unwrap();
        assert_eq!(pairing.pairs(), &[(1, 2)]);
        assert_eq!(diagram.points(), &[Point::paired(0.0, 1.0), Point::unpaired(0.0)]);
        assert_eq!(diagram.betti(), 1);

        let diagrams = reduce(&complex).unwrap();
        assert_eq!(diagrams[0], diagram);
    }

    #[test]
    fn test_sentinel_only_touches_diagram() {
        let mut complex = FilteredComplex::new(vec![s(&[0], 0.0), s(&[1], 0.5)]);
        complex.sort();

        let (diagram, pairing) = reduce_zero_dimensional(&complex, 10.0).unwrap();
        assert_eq!(pairing.essential(), &[0, 1]);
        assert!(diagram.iter().all(|p| p.death() == 10.0 && p.is_unpaired()));
        assert_eq!(diagram.betti(), 2);
    }

    #[test]
    fn test_remove_diagonal_keeps_betti_after_reduction() {
        let mut simplices = triangle_edges();
        simplices.push(s(&[0, 1, 2], 0.0));
        let mut complex = FilteredComplex::new(simplices);
        complex.prepare();

        let mut diagrams = reduce(&complex).unwrap();
        let before = betti_numbers(&diagrams);
        for diagram in diagrams.iter_mut() {
            diagram.remove_diagonal();
        }
        assert_eq!(betti_numbers(&diagrams), before);
        assert_eq!(diagrams[0].len(), 1);
        assert!(diagrams[1].is_empty());
    }

    #[test]
    fn test_reduce_dimension() {
        let mut complex = FilteredComplex::new(triangle_edges());
        complex.prepare();

        let diagram = reduce_dimension(&complex, 1).unwrap();
        assert_eq!(diagram.dimension(), 1);
        assert_eq!(diagram.betti(), 1);

        let err = reduce_dimension(&complex, 2).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TopologyError>(),
            Some(&TopologyError::DimensionMismatch {
                requested: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_square_cycle_lifetime() {
        let s2 = 2.0_f64.sqrt();
        let mut complex = FilteredComplex::new(vec![
            s(&[0, 1], 1.0),
            s(&[1, 2], 1.0),
            s(&[2, 3], 1.0),
            s(&[0, 3], 1.0),
            s(&[0, 2], s2),
            s(&[0, 1, 2], s2),
            s(&[0, 2, 3], s2),
        ]);
        complex.prepare();

        let mut diagrams = reduce(&complex).unwrap();
        for diagram in diagrams.iter_mut() {
            diagram.remove_diagonal();
        }
        let cycles = diagrams[1].points();
        assert_eq!(cycles.len(), 1);
        assert_relative_eq!(cycles[0].birth(), 1.0);
        assert_relative_eq!(cycles[0].death(), s2);
        assert_eq!(betti_numbers(&diagrams), vec![1, 0, 0]);
    }

    #[test]
    fn test_bipartite_matrix_reversed() {
        let matrix = array![[0.9, 0.1], [0.2, 0.8]];
        let diagram = reduce_bipartite_matrix(matrix.view(), &BipartiteOptions::default()).unwrap();

        // Edges by descending weight: {0,2} 0.9, {1,3} 0.8, {1,2} 0.2, {0,3} 0.1
        let expected = vec![
            Point::paired(1.0, 0.9),
            Point::paired(1.0, 0.8),
            Point::paired(1.0, 0.2),
            Point::unpaired(1.0),
        ];
        assert_eq!(diagram.points(), expected.as_slice());
    }

    #[test]
    fn test_bipartite_matrix_ascending_with_sentinel() {
        let matrix = array![[3.0, 1.0], [2.0, 4.0]];
        let options = BipartiteOptions::default()
            .with_reverse_order(false)
            .with_vertex_weight(0.0)
            .with_unpaired_sentinel(5.0);
        let diagram = reduce_bipartite_matrix(matrix.view(), &options).unwrap();

        let deaths: Vec<f64> = diagram.iter().map(|p| p.death()).collect();
        assert_eq!(deaths, vec![1.0, 2.0, 3.0, 5.0]);
        assert_eq!(diagram.betti(), 1);
    }

    #[test]
    fn test_bipartite_shape_errors() {
        let options = BipartiteOptions::<f64>::default();

        let cube = ArrayD::<f64>::zeros(IxDyn(&[2, 2, 2]));
        let err = reduce_bipartite_array(cube.view(), &options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TopologyError>(),
            Some(TopologyError::Format(_))
        ));

        let square = ArrayD::<f64>::from_elem(IxDyn(&[2, 2]), 0.5);
        assert_eq!(reduce_bipartite_array(square.view(), &options).unwrap().len(), 4);

        let err = reduce_bipartite_buffer(&[0.5; 5], &[2, 3], &options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TopologyError>(),
            Some(TopologyError::Format(_))
        ));
        assert!(reduce_bipartite_buffer(&[0.5; 6], &[6], &options).is_err());
        assert_eq!(
            reduce_bipartite_buffer(&[0.5; 6], &[2, 3], &options).unwrap().len(),
            5
        );
    }

    #[test]
    fn test_properties_on_random_complexes() {
        for seed in 0..8u64 {
            let complex = random_flag_complex(seed, 18, 0.45);
            complex.validate().unwrap();

            let pairing = BoundaryMatrixReducer::default().reduce(&complex).unwrap();

            // Injective matching with creators first
            let mut seen = vec![0usize; complex.len()];
            for &(creator, destroyer) in pairing.iter() {
                assert!(creator < destroyer);
                assert!(complex[creator].data() <= complex[destroyer].data());
                seen[creator] += 1;
                seen[destroyer] += 1;
            }
            for &position in pairing.essential() {
                seen[position] += 1;
            }
            assert!(seen.iter().all(|&count| count == 1));

            // Betti numbers agree with the raw essential positions
            let diagrams = to_diagrams(&pairing, &complex).unwrap();
            for (dimension, betti) in betti_numbers(&diagrams).into_iter().enumerate() {
                let essential = pairing
                    .essential()
                    .iter()
                    .filter(|&&i| complex[i].dimension() == dimension)
                    .count();
                assert_eq!(betti, essential);
            }

            // Euler characteristic
            let chi_simplices: i64 = complex
                .iter()
                .map(|s| if s.dimension() % 2 == 0 { 1 } else { -1 })
                .sum();
            let chi_betti: i64 = betti_numbers(&diagrams)
                .iter()
                .enumerate()
                .map(|(d, &b)| if d % 2 == 0 { b as i64 } else { -(b as i64) })
                .sum();
            assert_eq!(chi_simplices, chi_betti);

            // Determinism and algorithm agreement
            let again = BoundaryMatrixReducer::default().reduce(&complex).unwrap();
            assert_eq!(pairing, again);
            let twist = BoundaryMatrixReducer::new(ReductionAlgorithm::Twist)
                .reduce(&complex)
                .unwrap();
            assert_eq!(pairing, twist);
        }
    }

    #[test]
    fn test_union_find_agrees_with_reduction() {
        for seed in 0..8u64 {
            let complex = graph_only(&random_flag_complex(seed, 25, 0.3));

            let (diagram, pairing) = reduce_zero_dimensional(&complex, f64::INFINITY).unwrap();
            let reduced = BoundaryMatrixReducer::default().reduce(&complex).unwrap();

            let zero_dimensional: Vec<(usize, usize)> = reduced
                .iter()
                .copied()
                .filter(|&(creator, _)| complex[creator].dimension() == 0)
                .collect();
            assert_eq!(pairing.pairs(), zero_dimensional.as_slice());

            let essential_vertices: Vec<usize> = reduced
                .essential()
                .iter()
                .copied()
                .filter(|&i| complex[i].dimension() == 0)
                .collect();
            assert_eq!(pairing.essential(), essential_vertices.as_slice());

            let diagrams = reduce(&complex).unwrap();
            assert_eq!(diagrams[0], diagram);
        }
    }

    #[test]
    fn test_reduce_all_matches_sequential() {
        let complexes: Vec<_> = (0..4u64).map(|seed| random_flag_complex(seed, 12, 0.5)).collect();
        let parallel = reduce_all(&complexes);
        assert_eq!(parallel.len(), complexes.len());
        for (complex, result) in complexes.iter().zip(parallel) {
            assert_eq!(result.unwrap(), reduce(complex).unwrap());
        }
    }
}
