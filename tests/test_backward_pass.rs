// Tests for the backward pass: gradient-mask refresh, output and hidden delta
// formulas, and the gradient-descent weight update.

use approx::assert_relative_eq;
use layered_backprop::network::Network;
use layered_backprop::node::{Node, NodeId, ParentLink, Unit};
use layered_backprop::topology::TopologyConfig;

// Fixed 2-2-2 network with every weight set to `weight`.
// Arena layout: inputs 0-1, input bias 2, hidden 3-4, output bias 5, outputs 6-7.
fn fixed_network(weight: f64) -> Network {
    let link = |parent: usize| ParentLink {
        parent: NodeId(parent),
        weight,
    };
    let nodes = vec![
        Node::Input { value: 0.0 },
        Node::Input { value: 0.0 },
        Node::BiasToHidden,
        Node::Hidden(Unit::new(vec![link(0), link(1), link(2)])),
        Node::Hidden(Unit::new(vec![link(0), link(1), link(2)])),
        Node::BiasToOutput,
        Node::Output(Unit::new(vec![link(3), link(4), link(5)])),
        Node::Output(Unit::new(vec![link(3), link(4), link(5)])),
    ];
    Network::from_parts(
        nodes,
        vec![NodeId(0), NodeId(1)],
        vec![NodeId(3), NodeId(4)],
        vec![NodeId(6), NodeId(7)],
    )
}

#[test]
fn test_gradient_masks_are_binary() {
    let mut network = TopologyConfig::new(3, 6, 3).build().unwrap();
    network.set_inputs(&[1.0, -2.0, 0.5]);
    network.forward();
    network.backward(&[1.0, 0.0, 0.0]);

    for &id in network.hidden_layer().iter().chain(network.output_layer()) {
        let mask = network.node(id).gradient_mask();
        assert!(mask == 0.0 || mask == 1.0);
        if network.node(id).output() == 0.0 {
            assert_eq!(mask, 0.0);
        } else {
            assert_eq!(mask, 1.0);
        }
    }
}

#[test]
fn test_softmax_outputs_get_relu_style_mask() {
    // Softmax outputs are strictly positive, so the binary mask rule always
    // leaves output deltas ungated. The rule is shared with the hidden layer
    // on purpose; no softmax-specific derivative is substituted.
    let mut network = fixed_network(1.0);
    network.set_inputs(&[1.0, 1.0]);
    network.forward();
    network.backward(&[1.0, 0.0]);

    for &id in network.output_layer() {
        assert_eq!(network.node(id).gradient_mask(), 1.0);
    }
}

#[test]
fn test_output_deltas_in_fixed_scenario() {
    let mut network = fixed_network(1.0);
    network.set_inputs(&[1.0, 1.0]);
    network.forward();
    network.backward(&[1.0, 0.0]);

    // Both outputs are 0.5, masks are 1: deltas are (1-0.5) and (0-0.5).
    let output = network.output_layer().to_vec();
    assert_relative_eq!(network.node(output[0]).delta(), 0.5, epsilon = 1e-12);
    assert_relative_eq!(network.node(output[1]).delta(), -0.5, epsilon = 1e-12);
}

#[test]
fn test_hidden_deltas_cancel_in_fixed_scenario() {
    let mut network = fixed_network(1.0);
    network.set_inputs(&[1.0, 1.0]);
    network.forward();
    network.backward(&[1.0, 0.0]);

    // Both output errors pull back through unit weights: 1*0.5 + 1*(-0.5) = 0.
    for &id in network.hidden_layer() {
        assert_relative_eq!(network.node(id).delta(), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_hidden_delta_matches_manual_backpropagation() {
    let mut network = TopologyConfig::new(2, 3, 2).build().unwrap();
    network.set_inputs(&[0.8, -0.3]);
    network.forward();
    let target = [0.0, 1.0];
    network.backward(&target);

    let outputs = network.outputs();
    for (index, &hidden_id) in network.hidden_layer().iter().enumerate() {
        let mut pulled_back = 0.0;
        for (k, &out_id) in network.output_layer().iter().enumerate() {
            let weight = network.node(out_id).parents().unwrap()[index].weight;
            pulled_back += weight
                * (target[k] - outputs[k])
                * network.node(out_id).gradient_mask();
        }
        let expected = network.node(hidden_id).gradient_mask() * pulled_back;
        assert_relative_eq!(network.node(hidden_id).delta(), expected, epsilon = 1e-12);
    }
}

#[test]
fn test_dead_hidden_unit_gets_zero_delta() {
    let mut network = fixed_network(-1.0);
    network.set_inputs(&[1.0, 1.0]);
    network.forward();
    network.backward(&[1.0, 0.0]);

    // Negative drive clips both hidden units to zero output; their masks gate
    // the pulled-back error entirely.
    for &id in network.hidden_layer() {
        assert_eq!(network.node(id).output(), 0.0);
        assert_eq!(network.node(id).gradient_mask(), 0.0);
        assert_eq!(network.node(id).delta(), 0.0);
    }
}

#[test]
fn test_weight_update_follows_learning_rule() {
    let mut network = fixed_network(1.0);
    network.set_inputs(&[1.0, 1.0]);
    network.forward();
    network.backward(&[1.0, 0.0]);
    network.update_weights(0.1);

    // Output node 0: delta 0.5, hidden parents output 3.0, bias outputs 1.0.
    let out0 = network.node(network.output_layer()[0]).parents().unwrap();
    assert_relative_eq!(out0[0].weight, 1.0 + 0.1 * 3.0 * 0.5, epsilon = 1e-12);
    assert_relative_eq!(out0[1].weight, 1.0 + 0.1 * 3.0 * 0.5, epsilon = 1e-12);
    assert_relative_eq!(out0[2].weight, 1.0 + 0.1 * 1.0 * 0.5, epsilon = 1e-12);

    // Output node 1: delta -0.5.
    let out1 = network.node(network.output_layer()[1]).parents().unwrap();
    assert_relative_eq!(out1[0].weight, 1.0 - 0.1 * 3.0 * 0.5, epsilon = 1e-12);
    assert_relative_eq!(out1[2].weight, 1.0 - 0.1 * 1.0 * 0.5, epsilon = 1e-12);

    // Hidden deltas cancelled to zero, so hidden weights are untouched.
    for &id in network.hidden_layer() {
        for link in network.node(id).parents().unwrap() {
            assert_relative_eq!(link.weight, 1.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_backward_deltas_are_repeatable() {
    // The layer-wide mask refresh is idempotent; repeating the backward pass
    // with unchanged activations reproduces the same deltas.
    let mut network = TopologyConfig::new(2, 4, 2).build().unwrap();
    network.set_inputs(&[0.4, 0.9]);
    network.forward();
    network.backward(&[1.0, 0.0]);
    let first: Vec<f64> = network
        .output_layer()
        .iter()
        .chain(network.hidden_layer())
        .map(|&id| network.node(id).delta())
        .collect();

    network.backward(&[1.0, 0.0]);
    let second: Vec<f64> = network
        .output_layer()
        .iter()
        .chain(network.hidden_layer())
        .map(|&id| network.node(id).delta())
        .collect();

    assert_eq!(first, second);
}
