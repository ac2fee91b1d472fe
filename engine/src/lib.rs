//! Genetic encoding for NeuroEvolution of Augmenting Topologies.
//!
//! Genomes, innovation numbering, the activation catalog and the bootstrap of
//! the initial minimal population. The evolutionary loop itself plugs in
//! through [`EvolutionStrategy`].

pub mod activation;
pub mod config;
pub mod error;
pub mod evolution;
pub mod genome;
pub mod graph;
pub mod innovation;
pub mod population;

pub use activation::{Activation, ActivationRegistry};
pub use config::Config;
pub use error::{NeatError, Result};
pub use evolution::{EvolutionStrategy, Neat, StepContext};
pub use genome::{ConnGene, Genome, GenomeShape, Innovation, NodeGene, NodeId, NodeKind};
pub use graph::{build_graph, creates_cycle, is_feed_forward};
pub use innovation::InnovationLedger;
pub use population::{bootstrap, Population};
