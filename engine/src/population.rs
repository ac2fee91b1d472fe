use log::info;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::genome::Genome;
use crate::innovation::InnovationLedger;

/// Ordered collection of genomes making up one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    genomes: Vec<Genome>,
}

impl Population {
    pub fn new(genomes: Vec<Genome>) -> Self {
        Self { genomes }
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Genome> {
        self.genomes.get(index)
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Genome> {
        self.genomes.iter()
    }

    pub fn into_genomes(self) -> Vec<Genome> {
        self.genomes
    }
}

impl From<Vec<Genome>> for Population {
    fn from(genomes: Vec<Genome>) -> Self {
        Self::new(genomes)
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Genome;
    type IntoIter = std::slice::Iter<'a, Genome>;

    fn into_iter(self) -> Self::IntoIter {
        self.genomes.iter()
    }
}

/// Build the initial population.
///
/// Every genome is the minimal fully connected network described by
/// [`Genome::minimal`]. The `(S+1)×O` initial edges are numbered once from the
/// ledger's baseline range and shared by every genome, and the ledger is
/// advanced past that range so later structural mutations never reuse it.
/// The config is checked before anything is built, so an error leaves both
/// the ledger and the caller untouched.
pub fn bootstrap(config: &Config, ledger: &InnovationLedger) -> Result<Population> {
    let (shape, output_activation) = config.validate()?;
    let baseline = ledger.reserve_baseline(shape.num_conns());

    let template = Genome::minimal(shape, output_activation, baseline.start);
    let genomes = vec![template; config.population_size];

    info!(
        "bootstrapped {} genomes ({} sensors, {} outputs, {} edges each); next innovation {}",
        genomes.len(),
        config.num_sensors,
        config.num_outputs,
        baseline.end - baseline.start,
        ledger.peek()
    );
    Ok(Population::new(genomes))
}
