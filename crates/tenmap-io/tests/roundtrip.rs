//! Save/load round trips through files and buffers

use std::env;
use std::sync::Arc;

use anyhow::Result;
use tenmap_core::{DenseArray, Element, Labels, TensorBlock, TensorMap};
use tenmap_io::{load, load_buffer, save, save_buffer, IoError};

/// Two blocks with an `xyz` component and position gradients; the second
/// block has no samples at all
fn tensor<T: Element>() -> Result<TensorMap<DenseArray<T>>> {
    let xyz = Arc::new(Labels::range("xyz", 3)?);
    let properties = Arc::new(Labels::new(&["n", "l"], vec![vec![0, 0], vec![1, 0]])?);

    let mut blocks = Vec::new();
    for n_samples in [3usize, 0] {
        let samples = Labels::range("system", n_samples)?;
        let data = (0..n_samples * 3 * 2).map(|x| T::narrow(x as f64 * 0.5)).collect();
        let block = TensorBlock::new(
            DenseArray::from_shape_vec(&[n_samples, 3, 2], data)?,
            samples,
            vec![xyz.clone()],
            properties.clone(),
        )?;

        let gradient_samples = (0..n_samples as i32).map(|s| vec![s, 2 * s]).collect();
        let gradient = TensorBlock::new(
            DenseArray::from_elem(&[n_samples, 3, 3, 2], T::narrow(-1.0)),
            Labels::new(&["sample", "atom"], gradient_samples)?,
            vec![Arc::new(Labels::range("direction", 3)?), xyz.clone()],
            properties.clone(),
        )?;
        blocks.push(block.with_gradient("positions", gradient)?);
    }

    let keys = Labels::new(&["center_type"], vec![vec![1], vec![6]])?;
    Ok(TensorMap::new(keys, blocks)?)
}

#[test]
fn test_buffer_roundtrip_f64() -> Result<()> {
    let tensor = tensor::<f64>()?;
    let buffer = save_buffer(&tensor)?;
    let loaded = load_buffer::<f64>(&buffer)?;
    assert_eq!(loaded, tensor);

    // saving again gives the same bytes
    assert_eq!(save_buffer(&loaded)?, buffer);
    Ok(())
}

#[test]
fn test_buffer_roundtrip_f32() -> Result<()> {
    let tensor = tensor::<f32>()?;
    let loaded = load_buffer::<f32>(&save_buffer(&tensor)?)?;
    assert_eq!(loaded, tensor);
    Ok(())
}

#[test]
fn test_zero_length_samples_survive() -> Result<()> {
    let tensor = tensor::<f64>()?;
    let loaded = load_buffer::<f64>(&save_buffer(&tensor)?)?;

    let empty = loaded.block(&[("center_type", 6)])?;
    assert_eq!(empty.samples().len(), 0);
    assert_eq!(empty.samples().names(), ["system"]);
    assert_eq!(empty.properties().len(), 2);

    let gradient = empty.gradient("positions")?;
    assert_eq!(gradient.samples().names(), ["sample", "atom"]);
    assert_eq!(gradient.components().len(), 2);
    Ok(())
}

#[test]
fn test_empty_tensor_roundtrip() -> Result<()> {
    let tensor = TensorMap::<DenseArray<f64>>::new(Labels::empty(&["key"])?, vec![])?;
    let loaded = load_buffer::<f64>(&save_buffer(&tensor)?)?;
    assert!(loaded.is_empty());
    assert_eq!(loaded.keys().names(), ["key"]);
    Ok(())
}

#[test]
fn test_file_roundtrip() -> Result<()> {
    let path = env::temp_dir().join("tenmap_io_file_roundtrip.tmap");
    let tensor = tensor::<f64>()?;

    save(&path, &tensor)?;
    let loaded = load::<_, f64>(&path)?;
    assert_eq!(loaded, tensor);

    std::fs::remove_file(&path).ok();
    Ok(())
}

#[test]
fn test_missing_file() {
    let path = env::temp_dir().join("tenmap_io_does_not_exist.tmap");
    std::fs::remove_file(&path).ok();
    assert!(matches!(load::<_, f64>(&path), Err(IoError::Io(_))));
}
