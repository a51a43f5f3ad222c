//! Errors raised while setting up a simulation, numerical failures during a run
//! are not errors and surface as NaN or infinite values instead

use thiserror::Error;


/// A set of errors that may occur when configuring a simulation
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Configuration file could not be read
    #[error("Could not read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration file is not valid TOML or does not match the schema
    #[error("Could not parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// Timestep is not a positive finite number
    #[error("Timestep must be positive and finite, got {0}")]
    InvalidTimestep(f64),
    /// Stimulus profile cannot be built for the requested number of steps
    #[error("Invalid stimulus: {0}")]
    InvalidStimulus(String),
    /// Stimulus length differs from the number of steps
    #[error("Stimulus has {found} values but {expected} steps were requested")]
    StimulusLengthMismatch { expected: usize, found: usize },
    /// Noise distribution cannot be sampled
    #[error("Invalid noise parameters: {0}")]
    InvalidNoise(String),
    /// Model section of an experiment is contradictory
    #[error("Invalid model: {0}")]
    InvalidModel(String),
    /// Two experiments share a name
    #[error("Experiment name `{0}` is used more than once")]
    DuplicateExperiment(String),
}

pub type SimulationResult<T> = Result<T, SimulationError>;
