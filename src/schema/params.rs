//! Run parameters forwarded to the remote genetic-algorithm solver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EditError;
use super::catalog::{parse_count, parse_real};

/// Scalar configuration for one solver run.
///
/// Serialized with the solver's field names and flattened into the
/// request body next to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    /// Individuals per generation.
    #[serde(default = "default_population_size")]
    pub population_size: u32,
    /// Number of generations to evolve.
    #[serde(default = "default_generations")]
    pub generations: u32,
    /// Crossover probability (0.0-1.0).
    #[serde(rename = "pc", default = "default_crossover_prob")]
    pub crossover_prob: f64,
    /// Mutation probability per gene (0.0-1.0).
    #[serde(rename = "pm", default = "default_mutation_prob")]
    pub mutation_prob: f64,
    /// Contestants per tournament.
    #[serde(default = "default_tournament_size")]
    pub tournament_size: u32,
    /// Carry the best individuals over unchanged.
    #[serde(default = "default_elitism")]
    pub elitism: bool,
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: i64,
    /// Parent selection method.
    #[serde(rename = "selection_type", default)]
    pub selection_method: SelectionMethod,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            generations: default_generations(),
            crossover_prob: default_crossover_prob(),
            mutation_prob: default_mutation_prob(),
            tournament_size: default_tournament_size(),
            elitism: default_elitism(),
            seed: default_seed(),
            selection_method: SelectionMethod::default(),
        }
    }
}

fn default_population_size() -> u32 {
    200
}
fn default_generations() -> u32 {
    100
}
fn default_crossover_prob() -> f64 {
    0.6
}
fn default_mutation_prob() -> f64 {
    0.15
}
fn default_tournament_size() -> u32 {
    3
}
fn default_elitism() -> bool {
    true
}
fn default_seed() -> i64 {
    42
}

/// Selection method for the solver's genetic algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMethod {
    /// Tournament selection of `tournament_size` contestants.
    #[default]
    #[serde(rename = "torneo")]
    Tournament,
    /// Roulette wheel (fitness-proportionate) selection.
    #[serde(rename = "ruleta")]
    Roulette,
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tournament => write!(f, "Tournament"),
            Self::Roulette => write!(f, "Roulette"),
        }
    }
}

impl FromStr for SelectionMethod {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "torneo" | "tournament" => Ok(Self::Tournament),
            "ruleta" | "roulette" => Ok(Self::Roulette),
            _ => Err(EditError::InvalidValue {
                field: "selection_type",
                value: s.to_string(),
            }),
        }
    }
}

/// Editable parameter field, addressed by its wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamField {
    PopulationSize,
    Generations,
    CrossoverProb,
    MutationProb,
    TournamentSize,
    Elitism,
    Seed,
    SelectionMethod,
}

impl ParamField {
    pub const ALL: [ParamField; 8] = [
        Self::PopulationSize,
        Self::Generations,
        Self::CrossoverProb,
        Self::MutationProb,
        Self::TournamentSize,
        Self::Elitism,
        Self::Seed,
        Self::SelectionMethod,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::PopulationSize => "population_size",
            Self::Generations => "generations",
            Self::CrossoverProb => "pc",
            Self::MutationProb => "pm",
            Self::TournamentSize => "tournament_size",
            Self::Elitism => "elitism",
            Self::Seed => "seed",
            Self::SelectionMethod => "selection_type",
        }
    }
}

impl FromStr for ParamField {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| EditError::UnknownField(s.to_string()))
    }
}

impl RunParameters {
    /// Apply a raw form value to one parameter.
    pub fn edit(&mut self, field: ParamField, raw: &str) -> Result<(), EditError> {
        let key = field.key();
        match field {
            ParamField::PopulationSize => self.population_size = parse_count(key, raw)?,
            ParamField::Generations => self.generations = parse_count(key, raw)?,
            ParamField::CrossoverProb => self.crossover_prob = parse_real(key, raw)?,
            ParamField::MutationProb => self.mutation_prob = parse_real(key, raw)?,
            ParamField::TournamentSize => self.tournament_size = parse_count(key, raw)?,
            ParamField::Elitism => {
                self.elitism = match raw.trim() {
                    "true" | "1" | "on" => true,
                    "false" | "0" | "off" | "" => false,
                    _ => {
                        return Err(EditError::InvalidValue {
                            field: key,
                            value: raw.to_string(),
                        });
                    }
                }
            }
            ParamField::Seed => {
                self.seed = raw.trim().parse().map_err(|_| EditError::InvalidValue {
                    field: key,
                    value: raw.to_string(),
                })?
            }
            ParamField::SelectionMethod => self.selection_method = raw.parse()?,
        }
        Ok(())
    }

    /// Validate parameters before a run.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.population_size == 0 {
            return Err(ParamsError::InvalidPopulationSize);
        }
        if self.generations == 0 {
            return Err(ParamsError::InvalidGenerations);
        }
        if !(0.0..=1.0).contains(&self.crossover_prob) {
            return Err(ParamsError::ProbabilityOutOfRange {
                field: "pc",
                value: self.crossover_prob,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_prob) {
            return Err(ParamsError::ProbabilityOutOfRange {
                field: "pm",
                value: self.mutation_prob,
            });
        }
        // The solver samples contestants without replacement.
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(ParamsError::InvalidTournamentSize {
                size: self.tournament_size,
                population: self.population_size,
            });
        }
        Ok(())
    }
}

/// Parameter validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParamsError {
    #[error("Population size must be at least 1")]
    InvalidPopulationSize,
    #[error("Generation count must be at least 1")]
    InvalidGenerations,
    #[error("Probability '{field}' must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
    #[error("Tournament size {size} must be between 1 and the population size ({population})")]
    InvalidTournamentSize { size: u32, population: u32 },
}
