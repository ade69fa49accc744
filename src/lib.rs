//! Layered Backpropagation Library
//!
//! This library implements a small fully-connected feed-forward network at the
//! level of individual nodes: ReLU hidden units, a softmax output layer, and
//! per-example backpropagation with plain gradient-descent weight updates.
//!
//! # Modules
//!
//! - `node`: Node sum type, parent links, and per-node forward/backward/update
//! - `layer`: Shared layer-wide helpers (pre-activations, gradient masks)
//! - `network`: Network driver owning the node arena and the training loop
//! - `topology`: Topology configuration and network building
//! - `config`: Training configuration structures
//! - `instance`: Training instance representation
//! - `utils`: Shared utilities (RNG)

pub mod config;
pub mod instance;
pub mod layer;
pub mod network;
pub mod node;
pub mod topology;
pub mod utils;
