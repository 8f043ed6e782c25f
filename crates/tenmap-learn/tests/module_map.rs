//! ModuleMap applied to tensor maps with gradients

use std::sync::Arc;

use anyhow::Result;
use tenmap_core::{Array, DenseArray, Labels, TensorBlock, TensorMap};
use tenmap_learn::{Linear, Module, ModuleMap, Sequential, Sigmoid};

type Dense = DenseArray<f64>;

/// Small network: linear, sigmoid, then a single output feature
fn network(in_features: usize, hidden: usize) -> Box<dyn Module<Dense>> {
    Box::new(Sequential::<Dense>::new(vec![
        Box::new(Linear::random(in_features, hidden)),
        Box::new(Sigmoid),
        Box::new(Linear::random(hidden, 1)),
    ]))
}

fn tensor() -> Result<TensorMap<Dense>> {
    let properties = Arc::new(Labels::range("n", 3)?);

    let mut blocks = Vec::new();
    for n_samples in [2usize, 4] {
        let block = TensorBlock::new(
            DenseArray::random_uniform(&[n_samples, 3], -1.0, 1.0),
            Labels::range("system", n_samples)?,
            Vec::<Labels>::new(),
            properties.clone(),
        )?;
        let gradient = TensorBlock::new(
            DenseArray::random_uniform(&[1, 3, 3], -1.0, 1.0),
            Labels::new(&["sample", "atom"], vec![vec![1, 0]])?,
            vec![Labels::range("xyz", 3)?],
            properties.clone(),
        )?;
        blocks.push(block.with_gradient("positions", gradient)?);
    }

    Ok(TensorMap::new(Labels::range("key", 2)?, blocks)?)
}

#[test]
fn test_default_properties() -> Result<()> {
    let tensor = tensor()?;
    let modules: Vec<Box<dyn Module<Dense>>> = vec![
        Box::new(Linear::random(3, 5)),
        Box::new(Linear::random(3, 5)),
    ];
    let map = ModuleMap::new(tensor.keys().clone(), modules, None)?;
    let output = map.forward(&tensor)?;

    assert_eq!(output.keys(), tensor.keys());

    let first = output.block_by_id(0)?;
    assert_eq!(first.samples().len(), 2);
    assert_eq!(first.properties(), &Labels::range("_", 5)?);
    assert_eq!(first.values().shape(), &[2, 5]);

    let gradient = first.gradient("positions")?;
    assert_eq!(gradient.properties(), first.properties());
    assert_eq!(gradient.values().shape(), &[1, 3, 5]);
    Ok(())
}

#[test]
fn test_values_match_modules() -> Result<()> {
    let tensor = tensor()?;
    let modules = vec![network(3, 5), network(3, 8)];
    let map = ModuleMap::new(tensor.keys().clone(), modules, None)?;
    let output = map.forward(&tensor)?;

    for (key, block) in tensor.iter() {
        let module = map.get_module(key).expect("a module for every key");
        let out_block = output.block_by_entry(key)?;

        let expected = module.forward(block.values())?;
        assert!(expected.allclose(out_block.values(), 1e-12, 1e-12));

        let gradient = block.gradient("positions")?;
        let expected = module.forward(gradient.values())?;
        assert!(expected.allclose(out_block.gradient("positions")?.values(), 1e-12, 1e-12));
    }
    Ok(())
}

#[test]
fn test_properties_override() -> Result<()> {
    let tensor = tensor()?;
    let override_properties = Labels::new(&["a", "b"], vec![vec![1, 1]])?;
    let modules = vec![network(3, 4), network(3, 4)];
    let map = ModuleMap::new(
        tensor.keys().clone(),
        modules,
        Some(vec![override_properties.clone(), override_properties.clone()]),
    )?;

    let output = map.forward(&tensor)?;
    for block in &output {
        assert_eq!(block.properties(), &override_properties);
        assert_eq!(block.gradient("positions")?.properties(), &override_properties);
    }
    Ok(())
}

#[test]
fn test_unknown_key() -> Result<()> {
    let tensor = tensor()?;
    let keys = Labels::new(&["key"], vec![vec![0], vec![7]])?;
    let map = ModuleMap::new(keys, vec![network(3, 2), network(3, 2)], None)?;
    assert!(map.forward(&tensor).is_err());
    Ok(())
}
