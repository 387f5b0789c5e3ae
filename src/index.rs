use crate::config::SummaryConfig;
use crate::distance::euclidean_distance;
use crate::error::SummaryError;
use crate::node::SummaryNode;
use crate::partition::{KMeansPartitioner, Partitioner};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::collections::HashMap;

/// An incremental, memory-bounded clustering index.
///
/// Feature vectors stream in one at a time through [`insert`]; the index
/// summarizes them into a flat, ordered collection of [`SummaryNode`]s.
/// Despite the tree framing such structures usually carry, this is a
/// deliberate flat list with first-fit scan semantics: the first node
/// whose drift-bounded admission test passes takes the point, so node
/// creation order biases assignment and is observable behavior.
///
/// After (or between) insertions, [`consolidate`] groups the current node
/// centroids into `n_clusters` final clusters and [`predict`] labels
/// arbitrary query points by nearest node centroid. Consolidation is
/// recomputed on every call; label identity is not stable across calls,
/// only the grouping is.
///
/// [`insert`]: SummaryIndex::insert
/// [`consolidate`]: SummaryIndex::consolidate
/// [`predict`]: SummaryIndex::predict
///
/// # Example
///
/// ```
/// use streamcluster_rs::SummaryIndex;
/// use ndarray::array;
///
/// let mut index = SummaryIndex::new(1.0, 50, 2).unwrap();
/// index.insert(&array![0.0f32, 0.0].view()).unwrap();
/// index.insert(&array![0.0f32, 0.1].view()).unwrap();
/// index.insert(&array![10.0f32, 10.0].view()).unwrap();
///
/// let labels = index
///     .predict(&array![[0.0f32, 0.05], [10.0, 10.05]].view())
///     .unwrap();
/// assert_ne!(labels[0], labels[1]);
/// ```
pub struct SummaryIndex<P: Partitioner = KMeansPartitioner> {
    /// Index configuration
    config: SummaryConfig,

    /// Injected k-way partitioning capability
    partitioner: P,

    /// Summary nodes in creation order
    nodes: Vec<SummaryNode>,

    /// Number of features (dimensions), established by the first insert
    d: usize,
}

impl SummaryIndex<KMeansPartitioner> {
    /// Create a new index with the given admission threshold, branching
    /// factor, and final cluster count.
    ///
    /// # Errors
    ///
    /// Returns an error if `threshold` is negative or non-finite, or if
    /// `branching_factor` or `n_clusters` is 0.
    pub fn new(
        threshold: f32,
        branching_factor: usize,
        n_clusters: usize,
    ) -> Result<Self, SummaryError> {
        Self::with_config(SummaryConfig::new(threshold, branching_factor, n_clusters))
    }

    /// Create a new index with a custom configuration, using the default
    /// seeded k-means partitioner.
    pub fn with_config(config: SummaryConfig) -> Result<Self, SummaryError> {
        let partitioner = KMeansPartitioner::new(config.seed).with_verbose(config.verbose);
        Self::with_partitioner(config, partitioner)
    }
}

impl<P: Partitioner> SummaryIndex<P> {
    /// Create a new index with a caller-supplied partitioner.
    pub fn with_partitioner(config: SummaryConfig, partitioner: P) -> Result<Self, SummaryError> {
        config.validate()?;
        Ok(Self {
            config,
            partitioner,
            nodes: Vec::new(),
            d: 0,
        })
    }

    /// Insert one feature vector.
    ///
    /// Existing nodes are scanned in creation order and the first node
    /// whose admission test passes takes the point. If none accepts, a new
    /// node is created at the end of the sequence. When a new node pushes
    /// the node count past `branching_factor`, a maintenance pass replaces
    /// every full node with the output of its split.
    ///
    /// # Errors
    ///
    /// Returns an error if the point's dimensionality differs from the
    /// dimensionality established by the first inserted point.
    pub fn insert(&mut self, point: &ArrayView1<f32>) -> Result<(), SummaryError> {
        let n_features = point.len();

        // Set dimensions on first call, validate on subsequent calls
        if self.d == 0 {
            self.d = n_features;
        } else if n_features != self.d {
            return Err(SummaryError::DimensionMismatch(format!(
                "Expected {} features, got {}",
                self.d, n_features
            )));
        }

        // First-fit scan
        for node in &mut self.nodes {
            if node.add_point(point) {
                return Ok(());
            }
        }

        let mut node = SummaryNode::new(self.config.threshold, self.config.branching_factor);
        node.add_point(point);
        self.nodes.push(node);

        if self.nodes.len() > self.config.branching_factor {
            self.run_maintenance()?;
        }

        Ok(())
    }

    /// Replace every full node with the output of its split; nodes that
    /// are not full are kept unchanged, preserving relative order.
    fn run_maintenance(&mut self) -> Result<(), SummaryError> {
        let nodes = std::mem::take(&mut self.nodes);
        let mut rebuilt = Vec::with_capacity(nodes.len() + 1);
        let mut n_split = 0;

        for node in nodes {
            if node.is_full() {
                n_split += 1;
                rebuilt.extend(node.split(&self.partitioner)?);
            } else {
                rebuilt.push(node);
            }
        }

        if self.config.verbose {
            eprintln!(
                "maintenance pass: split {} full nodes, {} nodes total",
                n_split,
                rebuilt.len()
            );
        }

        self.nodes = rebuilt;
        Ok(())
    }

    /// Group the current node centroids into `n_clusters` final clusters.
    ///
    /// Returns a mapping from each non-empty node's position in the node
    /// sequence to its final cluster label. The mapping is recomputed from
    /// the current centroids on every call and never cached; labels for
    /// the same underlying centroids may permute between calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the index has no non-empty nodes, or if
    /// `n_clusters` exceeds the number of non-empty nodes.
    pub fn consolidate(&self) -> Result<HashMap<usize, usize>, SummaryError> {
        let mut keys = Vec::new();
        let mut rows = Vec::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Some(centroid) = node.centroid() {
                keys.push(idx);
                rows.push(centroid);
            }
        }

        if keys.is_empty() {
            return Err(SummaryError::EmptyStructure(
                "consolidate requires at least one non-empty node".to_string(),
            ));
        }
        if keys.len() < self.config.n_clusters {
            return Err(SummaryError::InvalidConfig(format!(
                "cannot form {} clusters from {} non-empty nodes",
                self.config.n_clusters,
                keys.len()
            )));
        }

        let mut centroids = Array2::zeros((keys.len(), self.d));
        for (row, centroid) in rows.iter().enumerate() {
            centroids.row_mut(row).assign(*centroid);
        }

        if self.config.verbose {
            eprintln!(
                "consolidating {} node centroids into {} clusters",
                keys.len(),
                self.config.n_clusters
            );
        }

        let labels = self
            .partitioner
            .partition(&centroids.view(), self.config.n_clusters)?;

        Ok(keys.into_iter().zip(labels.iter().copied()).collect())
    }

    /// Predict final cluster labels for a batch of query points.
    ///
    /// Consolidates once, then labels each point independently with the
    /// cluster of its nearest node centroid (ties go to the earlier node
    /// in the sequence). A point is reassigned by proximity at query time;
    /// it does not reuse whichever node accepted it during insertion, so
    /// its predicted label can differ from the node it was filed under if
    /// centroids shifted afterward.
    ///
    /// # Errors
    ///
    /// Returns an error if the index has no non-empty nodes, if
    /// `n_clusters` exceeds the number of non-empty nodes, or if the query
    /// dimensionality differs from the index's.
    pub fn predict(&self, points: &ArrayView2<f32>) -> Result<Array1<usize>, SummaryError> {
        let cluster_map = self.consolidate()?;

        let n_features = points.ncols();
        if n_features != self.d {
            return Err(SummaryError::DimensionMismatch(format!(
                "Expected {} features, got {}",
                self.d, n_features
            )));
        }

        let mut labels = Array1::zeros(points.nrows());
        for (i, point) in points.outer_iter().enumerate() {
            labels[i] = self.nearest_label(&point, &cluster_map)?;
        }

        Ok(labels)
    }

    /// Label of the non-empty node whose centroid is nearest to `point`
    fn nearest_label(
        &self,
        point: &ArrayView1<f32>,
        cluster_map: &HashMap<usize, usize>,
    ) -> Result<usize, SummaryError> {
        let mut best: Option<(usize, f32)> = None;

        for (idx, node) in self.nodes.iter().enumerate() {
            let Some(centroid) = node.centroid() else {
                continue;
            };
            let dist = euclidean_distance(point, &centroid.view());
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((idx, dist));
            }
        }

        best.and_then(|(idx, _)| cluster_map.get(&idx).copied())
            .ok_or_else(|| {
                SummaryError::EmptyStructure(
                    "predict requires at least one non-empty node".to_string(),
                )
            })
    }

    /// Number of summary nodes currently held
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The summary nodes, in creation order
    pub fn nodes(&self) -> &[SummaryNode] {
        &self.nodes
    }

    /// Number of features (dimensions); 0 until the first insert
    pub fn d(&self) -> usize {
        self.d
    }

    /// Number of final clusters produced by consolidation
    pub fn n_clusters(&self) -> usize {
        self.config.n_clusters
    }

    /// The index configuration
    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }
}
