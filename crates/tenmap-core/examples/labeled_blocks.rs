//! Building and querying labeled block tensors.
//!
//! This example demonstrates the core functionality of tenmap-core:
//! - Creating labels, blocks with gradients, and tensor maps
//! - Looking up blocks with full and partial keys
//! - Extracting unique metadata and splitting per system
//!
//! Run with:
//! ```bash
//! cargo run --example labeled_blocks
//! ```

use anyhow::Result;
use tenmap_core::ops::{split, unique_metadata, MetadataAxis};
use tenmap_core::{Array, DenseArray, Labels, TensorBlock, TensorMap};

fn main() -> Result<()> {
    println!("=== TenMap Core: Labeled Blocks ===\n");

    let tensor = build_tensor()?;
    println!("keys:\n{}\n", tensor.keys());

    example_lookup(&tensor)?;
    example_unique(&tensor)?;
    example_split(&tensor)?;

    println!("\n=== All examples completed successfully! ===");
    Ok(())
}

fn build_tensor() -> Result<TensorMap<DenseArray<f64>>> {
    let properties = Labels::range("n", 4)?;

    let mut blocks = Vec::new();
    for (n_systems, n_atoms) in [(2, 3), (3, 1)] {
        let entries = (0..n_systems)
            .flat_map(|s| (0..n_atoms).map(move |a| vec![s, a]))
            .collect::<Vec<_>>();
        let samples = Labels::new(&["system", "atom"], entries)?;

        let values = DenseArray::random_uniform(&[samples.len(), properties.len()], -1.0, 1.0);
        blocks.push(TensorBlock::new(
            values,
            samples,
            Vec::<Labels>::new(),
            properties.clone(),
        )?);
    }

    let keys = Labels::new(&["center_type", "l"], vec![vec![1, 0], vec![8, 0]])?;
    Ok(TensorMap::new(keys, blocks)?)
}

fn example_lookup(tensor: &TensorMap<DenseArray<f64>>) -> Result<()> {
    println!("--- Block lookup ---");

    let hydrogen = tensor.block(&[("center_type", 1), ("l", 0)])?;
    println!("full key (1, 0): shape {:?}", hydrogen.values().shape());

    let oxygen = tensor.block(&[("center_type", 8)])?;
    println!("partial key center_type = 8: shape {:?}", oxygen.values().shape());

    match tensor.block(&[("l", 0)]) {
        Ok(_) => println!("l = 0 matched a single block"),
        Err(e) => println!("l = 0: {e}"),
    }
    Ok(())
}

fn example_unique(tensor: &TensorMap<DenseArray<f64>>) -> Result<()> {
    println!("\n--- Unique metadata ---");

    let systems = unique_metadata(tensor, MetadataAxis::Samples, &["system"], None)?;
    println!("systems:\n{systems}");

    let properties = unique_metadata(tensor, MetadataAxis::Properties, &["n"], None)?;
    println!("{} distinct properties", properties.len());
    Ok(())
}

fn example_split(tensor: &TensorMap<DenseArray<f64>>) -> Result<()> {
    println!("\n--- Split per system ---");

    let systems = unique_metadata(tensor, MetadataAxis::Samples, &["system"], None)?;
    let groups = systems
        .iter()
        .map(|entry| Labels::new(&["system"], vec![entry.to_vec()]))
        .collect::<tenmap_core::Result<Vec<_>>>()?;

    for (entry, part) in systems.iter().zip(split(tensor, MetadataAxis::Samples, &groups)?) {
        let n_samples: usize = part.blocks().iter().map(|b| b.samples().len()).sum();
        println!("system {}: {n_samples} samples", entry[0]);
    }
    Ok(())
}
