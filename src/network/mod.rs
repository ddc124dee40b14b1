//! Graph adapters: weighted graphs and sparse adjacency matrices as filtered
//! complexes of vertices and edges.
use std::collections::BTreeMap;

use log::debug;
use nalgebra_sparse::CsrMatrix;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

use crate::error::TopologyError;
use crate::topology::{DimensionFirstFiltration, FilteredComplex, Simplex};
use crate::utils::FiltrationOps;

pub type Graph<D> = UnGraph<D, D>;

/// Vertices take their node weight, edges their edge weight. Self-loops are
/// skipped and parallel edges keep their smallest weight. All vertices precede
/// all edges, so node weights above an incident edge weight stay valid.
pub fn complex_from_graph<D>(graph: &Graph<D>) -> anyhow::Result<FilteredComplex<D, usize>>
where
    D: FiltrationOps,
{
    let vertices = graph
        .node_indices()
        .map(|node| Simplex::vertex(node.index(), graph[node]));

    let mut edges: BTreeMap<(usize, usize), D> = BTreeMap::new();
    for edge in graph.edge_references() {
        let (u, v) = (edge.source().index(), edge.target().index());
        if u == v {
            continue;
        }
        insert_edge(&mut edges, u, v, *edge.weight());
    }

    build(vertices.collect(), edges)
}

/// Square sparse matrix as a graph: strictly upper-triangular entries become
/// edges, every row a vertex with `vertex_weight`. Entries mirrored below the
/// diagonal are ignored.
pub fn complex_from_adjacency<D>(
    matrix: &CsrMatrix<D>,
    vertex_weight: D,
) -> anyhow::Result<FilteredComplex<D, usize>>
where
    D: FiltrationOps,
{
    if matrix.nrows() != matrix.ncols() {
        return Err(TopologyError::Format(format!(
            "adjacency matrix must be square, got {} x {}",
            matrix.nrows(),
            matrix.ncols()
        ))
        .into());
    }

    let vertices = (0..matrix.nrows()).map(|v| Simplex::vertex(v, vertex_weight));

    let mut edges: BTreeMap<(usize, usize), D> = BTreeMap::new();
    for (row, col, &weight) in matrix.triplet_iter() {
        if row < col {
            insert_edge(&mut edges, row, col, weight);
        }
    }

    build(vertices.collect(), edges)
}

fn insert_edge<D: FiltrationOps>(edges: &mut BTreeMap<(usize, usize), D>, u: usize, v: usize, weight: D) {
    let key = if u < v { (u, v) } else { (v, u) };
    edges
        .entry(key)
        .and_modify(|w| *w = (*w).min(weight))
        .or_insert(weight);
}

fn build<D: FiltrationOps>(
    mut simplices: Vec<Simplex<D, usize>>,
    edges: BTreeMap<(usize, usize), D>,
) -> anyhow::Result<FilteredComplex<D, usize>> {
    let vertex_count = simplices.len();
    for ((u, v), weight) in edges {
        simplices.push(Simplex::new([u, v], weight)?);
    }
    debug!(
        "graph complex with {} vertices and {} edges",
        vertex_count,
        simplices.len() - vertex_count
    );

    let mut complex = FilteredComplex::new(simplices);
    complex.sort_with(&DimensionFirstFiltration::new(false));
    Ok(complex)
}
