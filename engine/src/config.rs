use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::{NeatError, Result};
use crate::genome::GenomeShape;

/// Configuration for building and evolving a population.
///
/// Only the three counts and the output activation are checked here. The
/// operator rates are carried for the evolution strategy and are not
/// validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of sensor (input) nodes per genome.
    pub num_sensors: usize,
    /// Number of output nodes per genome.
    pub num_outputs: usize,
    /// Number of genomes in the population.
    pub population_size: usize,
    /// Activation assigned to output nodes by bootstrap. There is no
    /// fallback; bootstrap fails while this is `None`.
    pub default_output_activation: Option<Activation>,
    /// Probability of producing offspring by crossover.
    pub crossover_rate: f64,
    /// Probability of the add-node mutation.
    pub mut_add_node_rate: f64,
    /// Probability of the add-connection mutation.
    pub mut_add_conn_rate: f64,
    /// Probability of perturbing connection weights.
    pub mut_weight_rate: f64,
}

impl Config {
    /// Counts only; rates start at zero and the output activation is unset.
    pub fn new(num_sensors: usize, num_outputs: usize, population_size: usize) -> Self {
        Self {
            num_sensors,
            num_outputs,
            population_size,
            default_output_activation: None,
            crossover_rate: 0.0,
            mut_add_node_rate: 0.0,
            mut_add_conn_rate: 0.0,
            mut_weight_rate: 0.0,
        }
    }

    pub fn with_output_activation(mut self, activation: Activation) -> Self {
        self.default_output_activation = Some(activation);
        self
    }

    /// Check the counts and the output activation.
    ///
    /// Returns the checked genome shape together with the activation
    /// bootstrap assigns to output nodes.
    pub fn validate(&self) -> Result<(GenomeShape, Activation)> {
        if self.num_sensors == 0 {
            return Err(NeatError::invalid_config("num_sensors must be positive"));
        }
        if self.num_outputs == 0 {
            return Err(NeatError::invalid_config("num_outputs must be positive"));
        }
        if self.population_size == 0 {
            return Err(NeatError::invalid_config(
                "population_size must be positive",
            ));
        }
        let shape = GenomeShape::new(self.num_sensors, self.num_outputs)?;
        let activation = self
            .default_output_activation
            .ok_or_else(|| NeatError::invalid_config("default_output_activation is unset"))?;
        Ok((shape, activation))
    }
}
