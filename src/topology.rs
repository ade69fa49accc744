//! Topology configuration and network building
//!
//! This module defines the shape of the network (input, hidden, and output
//! layer sizes plus weight-initialization settings), parsed from JSON, and
//! builds a wired `Network` from it. Building also checks the positional
//! wiring invariant the backward pass depends on: slot `i` of every output
//! node's parent list must be the link from hidden unit `i`, with the bias
//! link last.

use crate::network::Network;
use crate::node::{Node, NodeId, ParentLink, Unit};
use crate::utils::SimpleRng;
use serde::Deserialize;
use std::error::Error;
use std::fs;

/// Default half-width of the uniform initial-weight distribution.
const DEFAULT_INIT_WEIGHT_BOUND: f64 = 0.1;

/// Configuration for the network topology.
///
/// Describes a three-layer fully-connected network: every input node and the
/// input-layer bias feed every hidden node; every hidden node and the
/// hidden-layer bias feed every output node.
///
/// # Example
///
/// ```json
/// {
///   "input_count": 4,
///   "hidden_count": 8,
///   "output_count": 3,
///   "seed": 42,
///   "init_weight_bound": 0.1
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TopologyConfig {
    /// Number of input nodes (one per instance attribute).
    pub input_count: usize,

    /// Number of hidden (ReLU) nodes, excluding the bias node.
    pub hidden_count: usize,

    /// Number of output (softmax) nodes (one per class).
    pub output_count: usize,

    /// Seed for initial-weight sampling (clock-seeded when absent).
    pub seed: Option<u64>,

    /// Initial weights are drawn uniformly from [-bound, bound) (default 0.1).
    pub init_weight_bound: Option<f64>,
}

impl TopologyConfig {
    /// Create a topology configuration with the given layer sizes, a fixed
    /// seed of 0, and the default initial-weight bound.
    pub fn new(input_count: usize, hidden_count: usize, output_count: usize) -> Self {
        Self {
            input_count,
            hidden_count,
            output_count,
            seed: Some(0),
            init_weight_bound: None,
        }
    }

    /// Build a wired network from this configuration.
    ///
    /// Node arena layout: inputs, input-layer bias, hidden nodes, hidden-layer
    /// bias, output nodes. Every hidden node is linked to all inputs plus the
    /// input-layer bias (in that order); every output node to all hidden nodes
    /// plus the hidden-layer bias. Initial weights are sampled uniformly from
    /// the configured range.
    ///
    /// # Returns
    ///
    /// `Ok(Network)` on success, or a configuration error if validation or
    /// the wiring-invariant check fails.
    pub fn build(&self) -> Result<Network, Box<dyn Error>> {
        validate_topology(self)?;

        let mut rng = match self.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_time(),
        };
        let bound = self.init_weight_bound.unwrap_or(DEFAULT_INIT_WEIGHT_BOUND);

        let mut nodes = Vec::with_capacity(
            self.input_count + self.hidden_count + self.output_count + 2,
        );

        let input_layer: Vec<NodeId> = (0..self.input_count)
            .map(|_| {
                nodes.push(Node::Input { value: 0.0 });
                NodeId(nodes.len() - 1)
            })
            .collect();

        nodes.push(Node::BiasToHidden);
        let input_bias = NodeId(nodes.len() - 1);

        let mut hidden_sources: Vec<NodeId> = input_layer.clone();
        hidden_sources.push(input_bias);

        let hidden_layer: Vec<NodeId> = (0..self.hidden_count)
            .map(|_| {
                let parents = wire_links(&hidden_sources, &mut rng, bound);
                nodes.push(Node::Hidden(Unit::new(parents)));
                NodeId(nodes.len() - 1)
            })
            .collect();

        nodes.push(Node::BiasToOutput);
        let hidden_bias = NodeId(nodes.len() - 1);

        let mut output_sources: Vec<NodeId> = hidden_layer.clone();
        output_sources.push(hidden_bias);

        let output_layer: Vec<NodeId> = (0..self.output_count)
            .map(|_| {
                let parents = wire_links(&output_sources, &mut rng, bound);
                nodes.push(Node::Output(Unit::new(parents)));
                NodeId(nodes.len() - 1)
            })
            .collect();

        let network = Network::from_parts(nodes, input_layer, hidden_layer, output_layer);
        check_wiring(&network)?;
        Ok(network)
    }
}

fn wire_links(sources: &[NodeId], rng: &mut SimpleRng, bound: f64) -> Vec<ParentLink> {
    sources
        .iter()
        .map(|&parent| ParentLink {
            parent,
            weight: rng.gen_range_f64(-bound, bound),
        })
        .collect()
}

/// Loads a topology configuration from a JSON file.
///
/// # Returns
///
/// `Ok(TopologyConfig)` on success, or an error if the file cannot be read,
/// the JSON is invalid, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use layered_backprop::topology::load_topology;
///
/// let topology = load_topology("config/topology.json").unwrap();
/// let network = topology.build().unwrap();
/// assert_eq!(network.output_count(), topology.output_count);
/// ```
pub fn load_topology(path: &str) -> Result<TopologyConfig, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let config: TopologyConfig = serde_json::from_str(&contents)?;
    validate_topology(&config)?;
    Ok(config)
}

/// Validates a topology configuration.
pub fn validate_topology(config: &TopologyConfig) -> Result<(), Box<dyn Error>> {
    if config.input_count == 0 || config.hidden_count == 0 || config.output_count == 0 {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "input_count, hidden_count, and output_count must all be at least 1",
        )));
    }

    if let Some(bound) = config.init_weight_bound {
        if !(bound > 0.0) || !bound.is_finite() {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "init_weight_bound must be positive and finite",
            )));
        }
    }

    Ok(())
}

/// Checks the positional wiring invariant of a built network.
///
/// Every hidden node must be linked to all inputs plus the input-layer bias,
/// in input-layer order. Every output node must have the same parent
/// cardinality (hidden count + 1) with slot `i` linking hidden unit `i` and
/// the final slot linking the hidden-layer bias; the hidden-delta formula
/// reads output parents by the hidden unit's own layer index, so this parity
/// is load-bearing.
pub fn check_wiring(network: &Network) -> Result<(), Box<dyn Error>> {
    let hidden_count = network.hidden_count();

    for (position, &id) in network.hidden_layer().iter().enumerate() {
        let parents = network.node(id).parents().ok_or_else(|| wiring_error(format!(
            "hidden slot {} holds a node without parents",
            position
        )))?;
        if parents.len() != network.input_count() + 1 {
            return Err(wiring_error(format!(
                "hidden node {} has {} parent links, expected {}",
                position,
                parents.len(),
                network.input_count() + 1
            )));
        }
    }

    for (position, &id) in network.output_layer().iter().enumerate() {
        let parents = network.node(id).parents().ok_or_else(|| wiring_error(format!(
            "output slot {} holds a node without parents",
            position
        )))?;
        if parents.len() != hidden_count + 1 {
            return Err(wiring_error(format!(
                "output node {} has {} parent links, expected {}",
                position,
                parents.len(),
                hidden_count + 1
            )));
        }
        for (slot, link) in parents.iter().take(hidden_count).enumerate() {
            if link.parent != network.hidden_layer()[slot] {
                return Err(wiring_error(format!(
                    "output node {} slot {} links node {:?}, expected hidden unit {}",
                    position, slot, link.parent, slot
                )));
            }
        }
        if !matches!(network.node(parents[hidden_count].parent), Node::BiasToOutput) {
            return Err(wiring_error(format!(
                "output node {} final slot is not the hidden-layer bias",
                position
            )));
        }
    }

    Ok(())
}

fn wiring_error(message: String) -> Box<dyn Error> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message,
    ))
}
