//! Activation functions attached to node genes.
//!
//! Every activation is a pure scalar map. [`ActivationRegistry`] holds the
//! named catalog that hidden nodes draw from and resolves names supplied by
//! callers.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{NeatError, Result};

/// A node's activation function.
///
/// `Identity` is the pass-through used by sensor and bias nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Activation {
    Identity,
    Sigmoid,
    Tanh,
    Sine,
    Cosine,
    ReLU,
    Log,
    Exp,
    Abs,
    Square,
    Cube,
    /// Gaussian density with the given mean and standard deviation.
    Gaussian { mean: f64, stdev: f64 },
}

impl Activation {
    /// Gaussian density centred on `mean` with spread `stdev`.
    pub fn gaussian(mean: f64, stdev: f64) -> Self {
        Activation::Gaussian { mean, stdev }
    }

    /// Human readable name of the function.
    pub fn name(&self) -> &'static str {
        match self {
            Activation::Identity => "Identity",
            Activation::Sigmoid => "Sigmoid",
            Activation::Tanh => "Tanh",
            Activation::Sine => "Sine",
            Activation::Cosine => "Cosine",
            Activation::ReLU => "ReLU",
            Activation::Log => "Log",
            Activation::Exp => "Exp",
            Activation::Abs => "Abs",
            Activation::Square => "Square",
            Activation::Cube => "Cube",
            Activation::Gaussian { .. } => "Gaussian",
        }
    }

    /// Evaluate the function at `x`.
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            Activation::Identity => x,
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::Sine => x.sin(),
            Activation::Cosine => x.cos(),
            Activation::ReLU => x.max(0.0),
            Activation::Log => x.ln(),
            Activation::Exp => x.exp(),
            Activation::Abs => x.abs(),
            Activation::Square => x * x,
            Activation::Cube => x * x * x,
            Activation::Gaussian { mean, stdev } => {
                let z = (x - mean) / stdev;
                1.0 / (stdev * (2.0 * PI).sqrt()) * (-0.5 * z * z).exp()
            }
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts a registry key (`"sin"`) or a display name (`"Sine"`), ignoring
/// case, so `to_string` output parses back.
impl FromStr for Activation {
    type Err = NeatError;

    fn from_str(s: &str) -> Result<Self> {
        STANDARD
            .iter()
            .find(|(key, act)| {
                key.eq_ignore_ascii_case(s) || act.name().eq_ignore_ascii_case(s)
            })
            .map(|(_, act)| *act)
            .ok_or_else(|| NeatError::UnknownActivation(s.to_string()))
    }
}

// Sorted by key; lookups and uniform draws index into this table.
const STANDARD: [(&str, Activation); 12] = [
    ("abs", Activation::Abs),
    ("cos", Activation::Cosine),
    ("cube", Activation::Cube),
    ("exp", Activation::Exp),
    (
        "gaussian",
        Activation::Gaussian {
            mean: 0.0,
            stdev: 1.0,
        },
    ),
    ("identity", Activation::Identity),
    ("log", Activation::Log),
    ("relu", Activation::ReLU),
    ("sigmoid", Activation::Sigmoid),
    ("sin", Activation::Sine),
    ("square", Activation::Square),
    ("tanh", Activation::Tanh),
];

/// Named catalog of activation functions.
///
/// A registry is never empty: [`ActivationRegistry::standard`] carries the
/// full catalog and [`ActivationRegistry::subset`] rejects an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationRegistry {
    entries: Vec<(&'static str, Activation)>,
}

impl ActivationRegistry {
    /// The full catalog. Gaussian is registered with mean 0 and stdev 1.
    pub fn standard() -> Self {
        Self {
            entries: STANDARD.to_vec(),
        }
    }

    /// Restrict the catalog to `names`, keeping canonical ordering.
    pub fn subset<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Err(NeatError::invalid_config(
                "activation subset must name at least one function",
            ));
        }
        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let entry = STANDARD
                .iter()
                .find(|(key, _)| *key == name)
                .ok_or_else(|| NeatError::UnknownActivation(name.to_string()))?;
            if !entries.iter().any(|(key, _)| key == &entry.0) {
                entries.push(*entry);
            }
        }
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Ok(Self { entries })
    }

    /// Look up an activation by its registry key.
    pub fn get(&self, name: &str) -> Result<Activation> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, act)| *act)
            .ok_or_else(|| NeatError::UnknownActivation(name.to_string()))
    }

    /// Whether `name` is a key of this registry.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| *key == name)
    }

    /// Draw one entry uniformly at random.
    pub fn random(&self, rng: &mut dyn RngCore) -> Activation {
        let idx = rng.gen_range(0..self.entries.len());
        self.entries[idx].1
    }

    /// Registry keys in canonical order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActivationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
