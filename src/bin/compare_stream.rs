//! Binary for comparing streamcluster-rs output with the Python reference
//!
//! This binary reads input points from a .npy file, streams every row
//! through a summary index, and saves the predicted labels to another
//! .npy file for comparison.
//!
//! Usage: `compare-stream <input.npy> <output.npy> <threshold> <branching_factor> <n_clusters> <seed>`

use ndarray::{Array1, Array2};
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use std::env;
use std::fs::File;
use std::io::BufReader;
use streamcluster_rs::{SummaryConfig, SummaryIndex};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 7 {
        eprintln!(
            "Usage: {} <input.npy> <output.npy> <threshold> <branching_factor> <n_clusters> <seed>",
            args[0]
        );
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];
    let threshold: f32 = args[3].parse()?;
    let branching_factor: usize = args[4].parse()?;
    let n_clusters: usize = args[5].parse()?;
    let seed: u64 = args[6].parse()?;

    // Read input data
    let reader = BufReader::new(File::open(input_path)?);
    let data: Array2<f32> = Array2::read_npy(reader)?;

    let n_samples = data.nrows();
    let n_features = data.ncols();

    eprintln!(
        "Loaded data: {} samples x {} features",
        n_samples, n_features
    );
    eprintln!(
        "Streaming with threshold={}, branching_factor={}, n_clusters={}, seed={}",
        threshold, branching_factor, n_clusters, seed
    );

    let config = SummaryConfig {
        threshold,
        branching_factor,
        n_clusters,
        seed,
        verbose: true,
    };

    let mut index = SummaryIndex::with_config(config)?;
    for row in data.outer_iter() {
        index.insert(&row)?;
    }

    eprintln!("Ingested stream into {} summary nodes", index.n_nodes());

    let labels = index.predict(&data.view())?;
    let labels: Array1<i64> = labels.mapv(|label| label as i64);

    // Save labels
    let output_file = File::create(output_path)?;
    labels.write_npy(output_file)?;

    eprintln!("Saved {} labels to {}", labels.len(), output_path);

    Ok(())
}
