//! # streamcluster-rs
//!
//! An incremental, memory-bounded clustering index in Rust, compatible
//! with ndarray.
//!
//! Feature vectors stream in one at a time and are summarized into a
//! small, flat collection of summary nodes, each maintaining its centroid
//! incrementally under a drift-bounded admission test. A separate
//! consolidation step groups the node centroids into a fixed number of
//! final clusters, which are then used to label arbitrary query points.
//!
//! ## Features
//!
//! - **Single-pass ingestion**: each point is filed into the first node
//!   that can absorb it without drifting its centroid past a threshold;
//!   overfull nodes are split during periodic maintenance passes
//! - **Bounded memory**: the stream is represented by node summaries
//!   rather than a full hierarchy; the node list is kept in check by the
//!   branching factor
//! - **Injected partitioner**: the k-way grouping used for splits and
//!   consolidation is a trait, with a seeded k-means implementation as
//!   the default, so determinism and algorithm choice are explicit
//!   configuration
//! - **ndarray compatible**: points arrive as ndarray views; predictions
//!   come back as ndarray label arrays
//!
//! ## Example
//!
//! ```rust
//! use streamcluster_rs::SummaryIndex;
//! use ndarray::array;
//!
//! let mut index = SummaryIndex::new(1.0, 50, 2).unwrap();
//!
//! // Stream points in; the first two share a node, the third starts its own
//! index.insert(&array![0.0f32, 0.0].view()).unwrap();
//! index.insert(&array![0.0f32, 0.1].view()).unwrap();
//! index.insert(&array![10.0f32, 10.0].view()).unwrap();
//! assert_eq!(index.n_nodes(), 2);
//!
//! // Group node centroids into 2 final clusters and label query points
//! let labels = index
//!     .predict(&array![[0.0f32, 0.05], [10.0, 10.05]].view())
//!     .unwrap();
//! assert_ne!(labels[0], labels[1]);
//! ```
//!
//! ## Custom Configuration
//!
//! ```rust
//! use streamcluster_rs::{SummaryConfig, SummaryIndex};
//! use ndarray::array;
//!
//! let config = SummaryConfig {
//!     threshold: 0.5,
//!     branching_factor: 25,
//!     n_clusters: 2,
//!     seed: 42,
//!     verbose: false,
//! };
//!
//! let mut index = SummaryIndex::with_config(config).unwrap();
//! index.insert(&array![1.0f32, 1.0].view()).unwrap();
//! index.insert(&array![-1.0f32, -1.0].view()).unwrap();
//!
//! let cluster_map = index.consolidate().unwrap();
//! assert_eq!(cluster_map.len(), 2);
//! ```
//!
//! ## Custom Partitioner
//!
//! The grouping capability can be swapped out entirely, e.g. to control
//! iteration counts of the default k-means:
//!
//! ```rust
//! use streamcluster_rs::{KMeansPartitioner, SummaryConfig, SummaryIndex};
//!
//! let partitioner = KMeansPartitioner::new(7).with_max_iters(100).with_tol(1e-10);
//! let index = SummaryIndex::with_partitioner(
//!     SummaryConfig::new(0.5, 50, 3),
//!     partitioner,
//! ).unwrap();
//! # let _ = index;
//! ```

mod config;
mod distance;
mod error;
mod index;
mod node;
mod partition;

pub use config::SummaryConfig;
pub use error::SummaryError;
pub use index::SummaryIndex;
pub use node::SummaryNode;
pub use partition::{KMeansPartitioner, Partitioner};
