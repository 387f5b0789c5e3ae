use crate::distance::euclidean_distance;
use crate::error::SummaryError;
use crate::partition::Partitioner;
use ndarray::{Array1, Array2, ArrayView1};

/// A summary node: a bounded, growing set of feature vectors and their
/// incrementally maintained centroid.
///
/// Admission is drift-bounded, not distance-bounded: a point is accepted
/// when admitting it would move the centroid by at most `threshold`. A
/// large node can therefore accept a point far from its centroid, while a
/// small node can reject a point that over-influences its mean.
#[derive(Debug, Clone)]
pub struct SummaryNode {
    points: Vec<Array1<f32>>,
    centroid: Option<Array1<f32>>,
    threshold: f32,
    branching_factor: usize,
}

impl SummaryNode {
    /// Create an empty node with the given admission threshold and
    /// capacity before it becomes eligible for splitting
    pub fn new(threshold: f32, branching_factor: usize) -> Self {
        Self {
            points: Vec::new(),
            centroid: None,
            threshold,
            branching_factor,
        }
    }

    /// Pure admission test.
    ///
    /// Returns the candidate centroid this node would adopt if it accepted
    /// `point`, or `None` if the admission would drift the centroid past
    /// `threshold`. An empty node accepts unconditionally and the point
    /// becomes its centroid. Does not mutate the node.
    pub fn would_accept(&self, point: &ArrayView1<f32>) -> Option<Array1<f32>> {
        let centroid = match &self.centroid {
            None => return Some(point.to_owned()),
            Some(c) => c,
        };

        let n = self.points.len() as f32;
        let mut candidate = centroid * n;
        candidate += point;
        candidate /= n + 1.0;

        let drift = euclidean_distance(&centroid.view(), &candidate.view());
        if drift <= self.threshold {
            Some(candidate)
        } else {
            None
        }
    }

    /// Try to admit `point`.
    ///
    /// On acceptance the point is appended and the centroid replaced with
    /// the mean of the enlarged point set; on rejection nothing changes.
    /// Returns whether the point was accepted.
    pub fn add_point(&mut self, point: &ArrayView1<f32>) -> bool {
        match self.would_accept(point) {
            Some(candidate) => {
                self.points.push(point.to_owned());
                self.centroid = Some(candidate);
                true
            }
            None => false,
        }
    }

    /// Whether the node has reached its capacity and is eligible for
    /// splitting
    pub fn is_full(&self) -> bool {
        self.points.len() >= self.branching_factor
    }

    /// Number of points held
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the node holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points held, in insertion order
    pub fn points(&self) -> &[Array1<f32>] {
        &self.points
    }

    /// The current centroid, `None` until a first point is accepted
    pub fn centroid(&self) -> Option<&Array1<f32>> {
        self.centroid.as_ref()
    }

    /// Split the node's points into two new nodes.
    ///
    /// A node holding fewer than 2 points is returned unchanged as the
    /// only element of the result. Otherwise the points are partitioned
    /// 2 ways by `partitioner`; each non-empty group becomes a new node
    /// with the same `threshold` and `branching_factor` and a centroid
    /// recomputed as the exact mean of its assigned points. When the
    /// partition leaves one group empty (degenerate input such as all
    /// points identical) the surviving group keeps every point.
    ///
    /// Consumes the node.
    pub fn split<P: Partitioner>(
        self,
        partitioner: &P,
    ) -> Result<Vec<SummaryNode>, SummaryError> {
        if self.points.len() < 2 {
            return Ok(vec![self]);
        }

        let n_features = self.points[0].len();
        let mut data = Array2::zeros((self.points.len(), n_features));
        for (i, point) in self.points.iter().enumerate() {
            data.row_mut(i).assign(point);
        }

        let labels = partitioner.partition(&data.view(), 2)?;

        let mut groups: Vec<Vec<Array1<f32>>> = vec![Vec::new(), Vec::new()];
        for (&label, point) in labels.iter().zip(self.points) {
            groups[label].push(point);
        }

        let nodes = groups
            .into_iter()
            .filter(|group| !group.is_empty())
            .map(|group| SummaryNode {
                centroid: Some(mean_of(&group)),
                points: group,
                threshold: self.threshold,
                branching_factor: self.branching_factor,
            })
            .collect();

        Ok(nodes)
    }
}

/// Exact arithmetic mean of a non-empty set of vectors
fn mean_of(points: &[Array1<f32>]) -> Array1<f32> {
    let mut sum = Array1::zeros(points[0].len());
    for point in points {
        sum += point;
    }
    sum / points.len() as f32
}
