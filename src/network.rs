//! Network driver: node arena ownership and the training loop
//!
//! The network owns the node arena and the ordered per-layer id vectors, and
//! drives each training example through its fixed phase sequence: set inputs,
//! hidden forward, output forward, output deltas, hidden deltas, weight
//! updates. Every phase reads mutable state written by the previous one on
//! the same shared node graph, so the sequence is strictly ordered and
//! single-threaded; one example completes fully before the next begins.

use crate::config::TrainingConfig;
use crate::instance::Instance;
use crate::node::{self, Node, NodeId};
use crate::utils::SimpleRng;
use std::error::Error;

/// A three-layer fully-connected feed-forward network.
///
/// Construct via [`crate::topology::TopologyConfig::build`], which wires the
/// arena and validates the positional invariants the backward pass depends on.
pub struct Network {
    nodes: Vec<Node>,
    input_layer: Vec<NodeId>,
    hidden_layer: Vec<NodeId>,
    output_layer: Vec<NodeId>,
}

impl Network {
    /// Assemble a network from a wired arena and its layer orderings.
    ///
    /// Callers other than the topology builder should run
    /// [`crate::topology::check_wiring`] on the result before training.
    pub fn from_parts(
        nodes: Vec<Node>,
        input_layer: Vec<NodeId>,
        hidden_layer: Vec<NodeId>,
        output_layer: Vec<NodeId>,
    ) -> Self {
        Self {
            nodes,
            input_layer,
            hidden_layer,
            output_layer,
        }
    }

    /// Total number of nodes in the arena, bias nodes included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of input nodes.
    pub fn input_count(&self) -> usize {
        self.input_layer.len()
    }

    /// Number of hidden nodes, excluding the bias node.
    pub fn hidden_count(&self) -> usize {
        self.hidden_layer.len()
    }

    /// Number of output nodes.
    pub fn output_count(&self) -> usize {
        self.output_layer.len()
    }

    /// Ordered ids of the hidden layer.
    pub fn hidden_layer(&self) -> &[NodeId] {
        &self.hidden_layer
    }

    /// Ordered ids of the output layer.
    pub fn output_layer(&self) -> &[NodeId] {
        &self.output_layer
    }

    /// Borrow a node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Activations of the output layer, in layer order.
    pub fn outputs(&self) -> Vec<f64> {
        self.output_layer
            .iter()
            .map(|&id| self.nodes[id.0].output())
            .collect()
    }

    /// Push an instance's attribute values into the input nodes.
    ///
    /// # Panics
    ///
    /// Panics if `attributes` does not match the input-layer size.
    pub fn set_inputs(&mut self, attributes: &[f64]) {
        assert_eq!(
            attributes.len(),
            self.input_layer.len(),
            "attribute count does not match input layer"
        );
        for (&id, &value) in self.input_layer.iter().zip(attributes) {
            self.nodes[id.0].set_input(value);
        }
    }

    /// Forward pass: hidden layer, then output layer.
    ///
    /// Scratch state from the previous example is zeroed first, so stale
    /// activations never feed the new pass. Hidden activations are mutually
    /// independent; output activations share the softmax denominator and are
    /// computed against the finished hidden layer.
    pub fn forward(&mut self) {
        for &id in self.hidden_layer.iter().chain(&self.output_layer) {
            self.nodes[id.0].reset_scratch();
        }
        for &id in &self.hidden_layer {
            node::compute_output(&mut self.nodes, id, &self.output_layer);
        }
        for &id in &self.output_layer {
            node::compute_output(&mut self.nodes, id, &self.output_layer);
        }
    }

    /// Backward pass: output deltas, then hidden deltas.
    ///
    /// The hidden-delta formula reads every output node's delta-forming terms
    /// and the gradient masks of both layers, so output deltas are finalized
    /// first and no weight is touched here.
    ///
    /// # Panics
    ///
    /// Panics if `target` does not match the output-layer size.
    pub fn backward(&mut self, target: &[f64]) {
        assert_eq!(
            target.len(),
            self.output_layer.len(),
            "target length does not match output layer"
        );
        for index in 0..self.output_layer.len() {
            let id = self.output_layer[index];
            node::compute_delta(
                &mut self.nodes,
                id,
                target,
                &self.output_layer,
                &self.hidden_layer,
                index,
            );
        }
        for index in 0..self.hidden_layer.len() {
            let id = self.hidden_layer[index];
            node::compute_delta(
                &mut self.nodes,
                id,
                target,
                &self.output_layer,
                &self.hidden_layer,
                index,
            );
        }
    }

    /// Apply the gradient-descent update to every trainable weight.
    ///
    /// Must run only after [`Network::backward`] has finalized every delta
    /// for the current example; the weights being written here are read by
    /// the hidden-delta formula and by the next forward pass.
    pub fn update_weights(&mut self, learning_rate: f64) {
        for &id in self.hidden_layer.iter().chain(&self.output_layer) {
            node::update_weights(&mut self.nodes, id, learning_rate);
        }
    }

    /// Run one training example through the full phase sequence.
    pub fn train_on(&mut self, instance: &Instance, learning_rate: f64) {
        self.set_inputs(&instance.attributes);
        self.forward();
        self.backward(&instance.class_values);
        self.update_weights(learning_rate);
    }

    /// Train on a set of instances for the configured number of epochs.
    ///
    /// Instances are presented one at a time (no batching); when shuffling is
    /// enabled the presentation order is re-drawn every epoch with a
    /// Fisher-Yates shuffle.
    ///
    /// # Returns
    ///
    /// `Ok(())` on success, or an error if the configuration is invalid or an
    /// instance's arity does not match the network.
    pub fn train(
        &mut self,
        instances: &[Instance],
        config: &TrainingConfig,
    ) -> Result<(), Box<dyn Error>> {
        crate::config::validate_config(config)?;
        for instance in instances {
            instance.check_arity(self.input_count(), self.output_count())?;
        }

        let mut rng = match config.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_time(),
        };
        let shuffle = config.shuffle.unwrap_or(true);
        let mut order: Vec<usize> = (0..instances.len()).collect();

        for _ in 0..config.epochs {
            if shuffle {
                rng.shuffle_usize(&mut order);
            }
            for &i in &order {
                self.train_on(&instances[i], config.learning_rate);
            }
        }
        Ok(())
    }

    /// Predict the class index for an instance (argmax output activation).
    ///
    /// Runs a forward pass; weights and deltas are untouched.
    pub fn predict(&mut self, instance: &Instance) -> usize {
        self.set_inputs(&instance.attributes);
        self.forward();
        let outputs = self.outputs();
        let mut best = 0;
        for (i, &value) in outputs.iter().enumerate() {
            if value > outputs[best] {
                best = i;
            }
        }
        best
    }

    /// Fraction of instances whose predicted class matches the label.
    pub fn evaluate(&mut self, instances: &[Instance]) -> f64 {
        if instances.is_empty() {
            return 0.0;
        }
        let correct = instances
            .iter()
            .filter(|instance| self.predict(instance) == instance.label())
            .count();
        correct as f64 / instances.len() as f64
    }
}
