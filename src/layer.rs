//! Layer-wide helpers shared by the forward and backward passes
//!
//! The softmax output layer and the backward gradient-mask refresh both need
//! to aggregate over whole layers rather than single nodes; the helpers here
//! keep that aggregation in one place.

use crate::node::{Node, NodeId};

/// Weighted sum of a node's parent activations (the pre-activation `z`).
///
/// # Panics
///
/// Panics if `id` names a node without parent links (input or bias).
pub fn pre_activation(nodes: &[Node], id: NodeId) -> f64 {
    let node = &nodes[id.0];
    let parents = node
        .parents()
        .unwrap_or_else(|| panic!("pre-activation of {} node", node.kind_name()));
    parents
        .iter()
        .map(|link| link.weight * nodes[link.parent.0].output())
        .sum()
}

/// Pre-activations of every node in a layer, in layer order.
///
/// Used by the softmax forward pass, which normalizes each output node
/// against the exponentiated pre-activations of the whole output layer.
pub fn pre_activations(nodes: &[Node], layer: &[NodeId]) -> Vec<f64> {
    layer.iter().map(|&id| pre_activation(nodes, id)).collect()
}

/// Refresh the binary gradient mask of the output layer, then the hidden
/// layer: 0.0 where a node's activation is exactly 0.0, else 1.0.
///
/// The refresh is idempotent, so repeated calls within one backward pass are
/// redundant but harmless. The mask must be complete across both layers
/// before any node's delta reads it.
pub fn refresh_gradient_masks(nodes: &mut [Node], output_layer: &[NodeId], hidden_layer: &[NodeId]) {
    for &id in output_layer.iter().chain(hidden_layer) {
        let mask = if nodes[id.0].output() == 0.0 { 0.0 } else { 1.0 };
        match &mut nodes[id.0] {
            Node::Hidden(unit) | Node::Output(unit) => unit.gradient_mask = mask,
            other => panic!("gradient mask refresh for {} node", other.kind_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ParentLink, Unit};

    fn hidden(parents: Vec<(usize, f64)>) -> Node {
        Node::Hidden(Unit::new(
            parents
                .into_iter()
                .map(|(parent, weight)| ParentLink {
                    parent: NodeId(parent),
                    weight,
                })
                .collect(),
        ))
    }

    #[test]
    fn test_pre_activation_includes_bias_term() {
        let nodes = vec![
            Node::Input { value: 2.0 },
            Node::BiasToHidden,
            hidden(vec![(0, 0.5), (1, 0.25)]),
        ];
        // 2.0*0.5 + 1.0*0.25
        assert_eq!(pre_activation(&nodes, NodeId(2)), 1.25);
    }

    #[test]
    fn test_pre_activations_preserve_layer_order() {
        let nodes = vec![
            Node::Input { value: 1.0 },
            hidden(vec![(0, 3.0)]),
            hidden(vec![(0, -2.0)]),
        ];
        let zs = pre_activations(&nodes, &[NodeId(1), NodeId(2)]);
        assert_eq!(zs, vec![3.0, -2.0]);
    }

    #[test]
    fn test_mask_is_zero_iff_output_is_zero() {
        let mut nodes = vec![
            hidden(vec![]),
            hidden(vec![]),
            Node::Output(Unit::new(vec![])),
        ];
        if let Node::Hidden(unit) = &mut nodes[1] {
            unit.output = 0.7;
        }
        if let Node::Output(unit) = &mut nodes[2] {
            unit.output = 0.3;
        }
        refresh_gradient_masks(&mut nodes, &[NodeId(2)], &[NodeId(0), NodeId(1)]);
        assert_eq!(nodes[0].gradient_mask(), 0.0);
        assert_eq!(nodes[1].gradient_mask(), 1.0);
        assert_eq!(nodes[2].gradient_mask(), 1.0);
    }

    #[test]
    #[should_panic(expected = "pre-activation of input node")]
    fn test_pre_activation_rejects_input_node() {
        let nodes = vec![Node::Input { value: 1.0 }];
        pre_activation(&nodes, NodeId(0));
    }
}
