use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::activation::ActivationRegistry;
use crate::config::Config;
use crate::error::Result;
use crate::innovation::InnovationLedger;
use crate::population::{bootstrap, Population};

/// Everything a strategy may use while producing the next generation.
pub struct StepContext<'a> {
    pub config: &'a Config,
    /// New structural novelty must be numbered from this ledger.
    pub ledger: &'a InnovationLedger,
    /// Catalog hidden-node activations are drawn from.
    pub activations: &'a ActivationRegistry,
    pub rng: &'a mut ChaCha8Rng,
    /// Index of the generation being produced, starting at 1.
    pub generation: u32,
}

/// One generation of the evolutionary loop: selection, crossover, mutation
/// and speciation all live behind this trait.
///
/// Implementations read the current population and return its successor.
/// They must keep node ids and innovation numbers of existing genes intact
/// and take every new innovation from `ctx.ledger`.
pub trait EvolutionStrategy {
    fn step(&mut self, population: &Population, ctx: &mut StepContext<'_>) -> Result<Population>;
}

/// Owner of a NEAT run: the config, the innovation ledger, the activation
/// catalog and the current population.
#[derive(Debug)]
pub struct Neat {
    config: Config,
    ledger: InnovationLedger,
    activations: ActivationRegistry,
    population: Population,
    generation: u32,
    rng: ChaCha8Rng,
}

impl Neat {
    /// Validate `config` and bootstrap the initial population with an
    /// entropy-seeded RNG.
    pub fn new(config: Config) -> Result<Self> {
        Self::build(config, ChaCha8Rng::from_entropy())
    }

    /// Like [`Neat::new`] with a deterministic RNG.
    pub fn with_seed(config: Config, seed: u64) -> Result<Self> {
        Self::build(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn build(config: Config, rng: ChaCha8Rng) -> Result<Self> {
        let ledger = InnovationLedger::new();
        let population = bootstrap(&config, &ledger)?;
        Ok(Self {
            config,
            ledger,
            activations: ActivationRegistry::standard(),
            population,
            generation: 0,
            rng,
        })
    }

    /// Replace the catalog strategies draw hidden activations from.
    pub fn with_activations(mut self, activations: ActivationRegistry) -> Self {
        self.activations = activations;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &InnovationLedger {
        &self.ledger
    }

    pub fn activations(&self) -> &ActivationRegistry {
        &self.activations
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of completed generations.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Advance the run by `generations` steps of `strategy`.
    ///
    /// A failing step is returned immediately and leaves the population of
    /// the last completed generation in place.
    pub fn run<S: EvolutionStrategy + ?Sized>(
        &mut self,
        strategy: &mut S,
        generations: u32,
    ) -> Result<()> {
        for _ in 0..generations {
            let mut ctx = StepContext {
                config: &self.config,
                ledger: &self.ledger,
                activations: &self.activations,
                rng: &mut self.rng,
                generation: self.generation + 1,
            };
            let next = strategy.step(&self.population, &mut ctx)?;
            if next.len() != self.config.population_size {
                warn!(
                    "generation {} has {} genomes, expected {}",
                    self.generation + 1,
                    next.len(),
                    self.config.population_size
                );
            }
            self.population = next;
            self.ledger.end_generation();
            self.generation += 1;
            info!(
                "generation {} complete: {} genomes, next innovation {}",
                self.generation,
                self.population.len(),
                self.ledger.peek()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::Activation;
    use crate::error::NeatError;
    use crate::genome::{ConnGene, Genome, NodeKind};
    use crate::graph::creates_cycle;

    fn config() -> Config {
        Config::new(2, 1, 4).with_output_activation(Activation::Sigmoid)
    }

    /// Adds one hidden node per genome wired from the first sensor.
    struct GrowHidden;

    impl EvolutionStrategy for GrowHidden {
        fn step(
            &mut self,
            population: &Population,
            ctx: &mut StepContext<'_>,
        ) -> Result<Population> {
            let mut next = Vec::with_capacity(population.len());
            for genome in population {
                let mut child: Genome = genome.clone();
                let activation = ctx.activations.random(&mut *ctx.rng);
                let hidden = child.add_hidden_node(activation);
                if !creates_cycle(&child, 0, hidden) {
                    let innovation = ctx.ledger.innovation_for(0, hidden);
                    child.add_conn(ConnGene::new(innovation, 0, hidden))?;
                }
                next.push(child);
            }
            Ok(Population::from(next))
        }
    }

    struct Failing;

    impl EvolutionStrategy for Failing {
        fn step(&mut self, _: &Population, _: &mut StepContext<'_>) -> Result<Population> {
            Err(NeatError::UnknownActivation("swish".into()))
        }
    }

    #[test]
    fn new_bootstraps_population() {
        let neat = Neat::with_seed(config(), 1).unwrap();
        assert_eq!(neat.population().len(), 4);
        assert_eq!(neat.generation(), 0);
        assert_eq!(neat.ledger().peek(), 3);
    }

    #[test]
    fn new_rejects_invalid_config() {
        assert!(matches!(
            Neat::new(Config::new(0, 1, 4).with_output_activation(Activation::Tanh)),
            Err(NeatError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn shared_topology_shares_innovation() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut neat = Neat::with_seed(config(), 9)
            .unwrap()
            .with_activations(ActivationRegistry::subset(&["tanh", "relu"]).unwrap());
        neat.run(&mut GrowHidden, 2).unwrap();
        assert_eq!(neat.generation(), 2);

        for genome in neat.population() {
            assert!(genome.validate().is_ok());
            assert_eq!(genome.num_hidden(), 2);
            let innovs: Vec<_> = genome.conns().iter().map(|c| c.innovation()).collect();
            // Baseline 0..3, then one number per generation.
            assert_eq!(innovs, vec![0, 1, 2, 3, 4]);
            for node in genome.nodes().iter().filter(|n| n.kind() == NodeKind::Hidden) {
                assert!(matches!(node.activation(), Activation::Tanh | Activation::ReLU));
            }
        }
        assert_eq!(neat.ledger().peek(), 5);
    }

    #[test]
    fn failed_step_keeps_population() {
        let mut neat = Neat::with_seed(config(), 3).unwrap();
        let before = neat.population().clone();
        assert!(neat.run(&mut Failing, 1).is_err());
        assert_eq!(neat.population(), &before);
        assert_eq!(neat.generation(), 0);
    }
}
