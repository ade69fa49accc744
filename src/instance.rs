//! Training instance representation
//!
//! An instance pairs an ordered attribute vector (one value per input node)
//! with an ordered one-hot class-target vector (one value per output node).
//! Datasets can be loaded from JSON files in the same way configurations are.

use serde::Deserialize;
use std::error::Error;
use std::fs;

/// A single labeled training example.
///
/// `attributes` is indexed consistently with the network's input layer,
/// `class_values` with its output layer; both orderings are fixed by the
/// topology that processes the instance.
///
/// # Example
///
/// ```json
/// { "attributes": [0.5, 1.0], "class_values": [1.0, 0.0] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Instance {
    /// Attribute values, one per input node.
    pub attributes: Vec<f64>,
    /// Per-class target values, one per output node (typically one-hot).
    pub class_values: Vec<f64>,
}

impl Instance {
    /// Create an instance from attribute and class-target vectors.
    pub fn new(attributes: Vec<f64>, class_values: Vec<f64>) -> Self {
        Self {
            attributes,
            class_values,
        }
    }

    /// Index of the largest class target (the instance's label).
    ///
    /// Returns 0 for an empty target vector; ties resolve to the first
    /// maximal position.
    pub fn label(&self) -> usize {
        let mut best = 0;
        for (i, &value) in self.class_values.iter().enumerate() {
            if value > self.class_values[best] {
                best = i;
            }
        }
        best
    }

    /// Check this instance's arity against a network's layer sizes.
    pub fn check_arity(&self, input_count: usize, output_count: usize) -> Result<(), Box<dyn Error>> {
        if self.attributes.len() != input_count {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "instance has {} attributes, network has {} input nodes",
                    self.attributes.len(),
                    input_count
                ),
            )));
        }
        if self.class_values.len() != output_count {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "instance has {} class values, network has {} output nodes",
                    self.class_values.len(),
                    output_count
                ),
            )));
        }
        Ok(())
    }
}

/// Loads a dataset (a JSON array of instances) from a file.
///
/// # Returns
///
/// `Ok(Vec<Instance>)` on success, or an error if the file cannot be read or
/// the JSON is invalid.
///
/// # Examples
///
/// ```no_run
/// use layered_backprop::instance::load_instances;
///
/// let train = load_instances("data/train.json").unwrap();
/// assert!(!train.is_empty());
/// ```
pub fn load_instances(path: &str) -> Result<Vec<Instance>, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let instances: Vec<Instance> = serde_json::from_str(&contents)?;
    Ok(instances)
}
