//! Node types and per-node computation for the feed-forward network
//!
//! A network is an arena of nodes (`Vec<Node>` owned by `Network`) addressed
//! by `NodeId`. Each hidden or output node carries an ordered list of weighted
//! parent links; the link order is significant and is validated at build time
//! (see `topology`). The three operations here — forward output, backward
//! delta, and weight update — are written over the arena slice so a node can
//! read its parents' activations and, for the softmax output layer, its
//! sibling output nodes.
//!
//! Only hidden and output nodes compute. Requesting a computation for an
//! input or bias node is an integration error and panics immediately rather
//! than silently skipping.

use crate::layer;

/// Index of a node in the network-owned arena.
///
/// Many parent links may name the same upstream node; an id is a plain copyable
/// handle, so fan-out sharing needs no reference counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// A weighted edge from an upstream node into the current node.
///
/// The weight is the only trainable parameter in the model.
#[derive(Debug, Clone)]
pub struct ParentLink {
    /// Arena index of the upstream node.
    pub parent: NodeId,
    /// Trainable connection weight.
    pub weight: f64,
}

/// Per-example state of a computing (hidden or output) node.
///
/// `output`, `gradient_mask`, and `delta` are scratch values scoped to a
/// single training example; they are overwritten deterministically by each
/// pass and zeroed between examples.
#[derive(Debug, Clone, Default)]
pub struct Unit {
    /// Ordered weighted links to upstream nodes (including the bias node).
    pub parents: Vec<ParentLink>,
    /// Activation produced by the last forward pass.
    pub output: f64,
    /// Binary derivative mask from the last backward pass (0.0 or 1.0).
    pub gradient_mask: f64,
    /// Backward error signal attributed to this node.
    pub delta: f64,
}

impl Unit {
    /// Create a computing unit with the given parent links and zeroed scratch.
    pub fn new(parents: Vec<ParentLink>) -> Self {
        Self {
            parents,
            ..Self::default()
        }
    }
}

/// A computational unit in one layer of the network.
///
/// The variant determines which operations are meaningful:
///
/// - `Input` holds the externally supplied attribute value and never computes.
/// - `BiasToHidden` / `BiasToOutput` carry no state at all; their activation
///   is the constant 1.0 and cannot be mutated.
/// - `Hidden` and `Output` own parent links and per-example scratch state and
///   are the only variants the forward/backward/update operations accept.
#[derive(Debug, Clone)]
pub enum Node {
    /// Input unit; activation equals the externally set attribute value.
    Input {
        /// Attribute value for the current example.
        value: f64,
    },
    /// Constant-1.0 bias unit feeding the hidden layer.
    BiasToHidden,
    /// ReLU unit of the hidden layer.
    Hidden(Unit),
    /// Constant-1.0 bias unit feeding the output layer.
    BiasToOutput,
    /// Softmax unit of the output layer.
    Output(Unit),
}

impl Node {
    /// Current activation of this node.
    ///
    /// Input nodes report their attribute value, bias nodes the constant 1.0,
    /// and hidden/output nodes the value computed by the last forward pass.
    pub fn output(&self) -> f64 {
        match self {
            Node::Input { value } => *value,
            Node::BiasToHidden | Node::BiasToOutput => 1.0,
            Node::Hidden(unit) | Node::Output(unit) => unit.output,
        }
    }

    /// Set the attribute value of an input node.
    ///
    /// # Panics
    ///
    /// Panics if this node is not an `Input` node.
    pub fn set_input(&mut self, input: f64) {
        match self {
            Node::Input { value } => *value = input,
            other => panic!("set_input on non-input node {:?}", other.kind_name()),
        }
    }

    /// Parent links of a computing node, or `None` for input/bias nodes.
    pub fn parents(&self) -> Option<&[ParentLink]> {
        match self {
            Node::Hidden(unit) | Node::Output(unit) => Some(&unit.parents),
            _ => None,
        }
    }

    /// Delta value from the last backward pass (0.0 for non-computing nodes).
    pub fn delta(&self) -> f64 {
        match self {
            Node::Hidden(unit) | Node::Output(unit) => unit.delta,
            _ => 0.0,
        }
    }

    /// Gradient mask from the last backward pass (0.0 for non-computing nodes).
    pub fn gradient_mask(&self) -> f64 {
        match self {
            Node::Hidden(unit) | Node::Output(unit) => unit.gradient_mask,
            _ => 0.0,
        }
    }

    /// Zero the per-example scratch state of a computing node.
    ///
    /// Called by the driver at the start of each example so no activation,
    /// mask, or delta leaks across examples. No-op for input/bias nodes
    /// (input values are overwritten by the driver directly).
    pub fn reset_scratch(&mut self) {
        if let Node::Hidden(unit) | Node::Output(unit) = self {
            unit.output = 0.0;
            unit.gradient_mask = 0.0;
            unit.delta = 0.0;
        }
    }

    fn unit_mut(&mut self) -> &mut Unit {
        match self {
            Node::Hidden(unit) | Node::Output(unit) => unit,
            other => panic!("computation requested for {} node", other.kind_name()),
        }
    }

    /// Short variant name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Input { .. } => "input",
            Node::BiasToHidden => "bias-to-hidden",
            Node::Hidden(_) => "hidden",
            Node::BiasToOutput => "bias-to-output",
            Node::Output(_) => "output",
        }
    }
}

/// Forward computation for one hidden or output node.
///
/// Hidden nodes apply ReLU to the weighted sum of their parents' activations.
/// Output nodes apply softmax jointly over the whole output layer: the
/// denominator is the sum of exponentiated pre-activations of every node in
/// `output_layer`, recomputed on each call. For a layer of size K this makes
/// a full forward pass quadratic in K; correctness, not asymptotics, is the
/// contract here, and output layers are small.
///
/// No overflow clamping is applied to `exp`; callers are expected to keep
/// pre-activations within a safe range for `f64`.
///
/// # Panics
///
/// Panics if `id` names an input or bias node.
pub fn compute_output(nodes: &mut [Node], id: NodeId, output_layer: &[NodeId]) {
    let value = match &nodes[id.0] {
        Node::Hidden(_) => layer::pre_activation(nodes, id).max(0.0),
        Node::Output(_) => {
            let z = layer::pre_activation(nodes, id);
            let denom: f64 = layer::pre_activations(nodes, output_layer)
                .iter()
                .map(|z_o| z_o.exp())
                .sum();
            z.exp() / denom
        }
        other => panic!("forward pass requested for {} node", other.kind_name()),
    };
    nodes[id.0].unit_mut().output = value;
}

/// Backward (delta) computation for one hidden or output node.
///
/// Step 1 refreshes the binary gradient mask of every output node and every
/// hidden node (0.0 iff the node's activation is exactly 0.0, else 1.0). The
/// refresh is layer-wide and idempotent, so calling this once per node merely
/// repeats the same writes. The same mask rule is applied to softmax output
/// nodes deliberately; it is the specified behavior, not a ReLU-only rule.
///
/// Step 2 computes the delta:
///
/// - output node at position `index`: `(target[index] - output) * mask(self)`
/// - hidden node at position `index`: its own mask times the error pulled back
///   through every output node's weight on the link from this hidden unit,
///   each term scaled by that output node's error and mask. The positional
///   coupling — `parents[index]` of every output node is the link from hidden
///   unit `index` — is validated at topology-build time.
///
/// # Panics
///
/// Panics if `id` names an input or bias node, or if `target` is shorter than
/// the output layer.
pub fn compute_delta(
    nodes: &mut [Node],
    id: NodeId,
    target: &[f64],
    output_layer: &[NodeId],
    hidden_layer: &[NodeId],
    index: usize,
) {
    layer::refresh_gradient_masks(nodes, output_layer, hidden_layer);

    let value = match &nodes[id.0] {
        Node::Output(unit) => (target[index] - unit.output) * unit.gradient_mask,
        Node::Hidden(unit) => {
            let mut sum = 0.0;
            for (k, &out_id) in output_layer.iter().enumerate() {
                let out = match &nodes[out_id.0] {
                    Node::Output(out) => out,
                    other => panic!(
                        "output layer contains {} node at position {}",
                        other.kind_name(),
                        k
                    ),
                };
                sum += out.parents[index].weight
                    * (target[k] - out.output)
                    * out.gradient_mask;
            }
            unit.gradient_mask * sum
        }
        other => panic!("delta requested for {} node", other.kind_name()),
    };
    nodes[id.0].unit_mut().delta = value;
}

/// Gradient-descent weight update for one hidden or output node.
///
/// For every parent link: `weight += learning_rate * parent_output * delta`.
/// Must run only after every node's delta for the current example is final;
/// the weights read by the hidden-delta formula are shared mutable state.
///
/// # Panics
///
/// Panics if `id` names an input or bias node.
pub fn update_weights(nodes: &mut [Node], id: NodeId, learning_rate: f64) {
    let delta = nodes[id.0].delta();
    let link_count = nodes[id.0].unit_mut().parents.len();

    // Indexed loop: each step reads the parent's activation, then mutates the
    // link, so the arena is never borrowed for reading and writing at once.
    for i in 0..link_count {
        let parent = nodes[id.0].unit_mut().parents[i].parent;
        let parent_output = nodes[parent.0].output();
        nodes[id.0].unit_mut().parents[i].weight += learning_rate * parent_output * delta;
    }
}
