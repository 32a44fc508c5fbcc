use crate::error::CubatureError;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction::{Incoming, Outgoing};

/// split direction, stored as an edge weight the same way the teacher's
/// tree stores a betting `Edge` between `Node`s.
pub type Axis = usize;

/// node-weight payload held per region in the arena.
#[derive(Debug, Clone)]
pub struct RegionData {
    pub center: Vec<f64>,
    pub hwidth: Vec<f64>,
    pub local_result: f64,
    pub local_error: f64,
    pub split_axis: Axis,
    pub depth: usize,
    pub scale: i32,
}

impl RegionData {
    pub fn volume(&self) -> f64 {
        self.hwidth.iter().map(|h| 2.0 * h).product()
    }
}

/// a `Region` is a thin wrapper around a `NodeIndex` and a `&RegionTree`;
/// thin wrappers around an index are cheap to copy, and holding a graph
/// reference keeps navigational methods ergonomic.
#[derive(Debug, Clone, Copy)]
pub struct Region<'arena> {
    index: NodeIndex,
    graph: &'arena DiGraph<RegionData, Axis>,
}

impl<'arena> From<(NodeIndex, &'arena DiGraph<RegionData, Axis>)> for Region<'arena> {
    fn from((index, graph): (NodeIndex, &'arena DiGraph<RegionData, Axis>)) -> Self {
        Self { index, graph }
    }
}

impl<'arena> Region<'arena> {
    pub fn data(&self) -> &RegionData {
        self.graph
            .node_weight(self.index)
            .expect("valid region index")
    }
    pub fn index(&self) -> NodeIndex {
        self.index
    }
    pub fn is_leaf(&self) -> bool {
        self.graph.neighbors_directed(self.index, Outgoing).next().is_none()
    }
    pub fn parent(&self) -> Option<Region<'arena>> {
        self.graph
            .neighbors_directed(self.index, Incoming)
            .next()
            .map(|index| Self::from((index, self.graph)))
    }
    pub fn children(&self) -> Vec<Region<'arena>> {
        self.graph
            .neighbors_directed(self.index, Outgoing)
            .map(|index| Self::from((index, self.graph)))
            .collect()
    }
}

/// append-only arena of regions, exclusively owned by one `Integrator`.
/// Regions are never mutated after their rule evaluation and never
/// deleted; splits only add nodes.
#[derive(Debug)]
pub struct RegionTree {
    graph: DiGraph<RegionData, Axis>,
}

impl RegionTree {
    pub fn with_root(lower: &[f64], upper: &[f64]) -> Result<Self, CubatureError> {
        let dim = lower.len();
        let mut center = Vec::with_capacity(dim);
        let mut hwidth = Vec::with_capacity(dim);
        for axis in 0..dim {
            if upper[axis] <= lower[axis] {
                return Err(CubatureError::InvalidBox {
                    axis,
                    lower: lower[axis],
                    upper: upper[axis],
                });
            }
            center.push((lower[axis] + upper[axis]) / 2.0);
            hwidth.push((upper[axis] - lower[axis]).abs() / 2.0);
        }
        let mut graph = DiGraph::new();
        graph.add_node(RegionData {
            center,
            hwidth,
            local_result: 0.0,
            local_error: 0.0,
            split_axis: 0,
            depth: 0,
            scale: 0,
        });
        Ok(Self { graph })
    }

    pub fn root(&self) -> Region<'_> {
        Region::from((NodeIndex::new(0), &self.graph))
    }

    pub fn get(&self, index: NodeIndex) -> Region<'_> {
        Region::from((index, &self.graph))
    }

    pub fn set_evaluation(&mut self, index: NodeIndex, local_result: f64, local_error: f64, split_axis: Axis, scale: i32) {
        let node = self.graph.node_weight_mut(index).expect("valid region index");
        node.local_result = local_result;
        node.local_error = local_error;
        node.split_axis = split_axis;
        node.scale = node.scale.max(scale);
    }

    /// split `parent` along `axis`, producing (left, right) children whose
    /// half-width on `axis` is halved and whose centres are offset by
    /// +/- the new half-width; every other coordinate is inherited as-is.
    pub fn split(&mut self, parent: NodeIndex, axis: Axis) -> (NodeIndex, NodeIndex) {
        let parent_data = self.graph.node_weight(parent).expect("valid region index").clone();
        let half = parent_data.hwidth[axis] / 2.0;

        let mut left = parent_data.clone();
        left.hwidth[axis] = half;
        left.center[axis] += half;
        left.depth += 1;

        let mut right = parent_data.clone();
        right.hwidth[axis] = half;
        right.center[axis] -= half;
        right.depth += 1;

        let left_idx = self.graph.add_node(left);
        let right_idx = self.graph.add_node(right);
        self.graph.add_edge(parent, left_idx, axis);
        self.graph.add_edge(parent, right_idx, axis);
        (left_idx, right_idx)
    }

    pub fn leaves(&self) -> impl Iterator<Item = Region<'_>> {
        self.graph.node_indices().filter_map(move |index| {
            let region = self.get(index);
            region.is_leaf().then_some(region)
        })
    }

    pub fn region_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn graph(&self) -> &DiGraph<RegionData, Axis> {
        &self.graph
    }
}
