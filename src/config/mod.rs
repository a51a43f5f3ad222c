//! Experiment configuration read from TOML. Each `[[experiment]]` table names a
//! model, its parameters, a timestep, a step count and a stimulus profile, every
//! experiment is simulated with its own neuron instance and stimulus.
//!
//! ```toml
//! [[experiment]]
//! name = "resonator"
//! dt = 0.4
//! step_count = 501
//!
//! [experiment.model]
//! kind = "izhikevich"
//! preset = "resonator"
//! v_init = -70.0
//!
//! [experiment.stimulus]
//! kind = "pulse_on_sustained"
//! sustained_start = 21
//! burst_start = 251
//! burst_stop = 255
//! sustained_amplitude = 4.0
//! burst_amplitude = 8.0
//! ```

use std::{collections::HashSet, fs::read_to_string, path::Path};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use serde::Deserialize;
use tracing::info;
use crate::distribution::GaussianParameters;
use crate::error::{SimulationError, SimulationResult};
use crate::neuron::{
    hodgkin_huxley::{HodgkinHuxleyNeuron, HodgkinHuxleyParameters, HodgkinHuxleyPreset},
    izhikevich::{IzhikevichNeuron, IzhikevichParameters, IzhikevichPreset},
    run_simulation, HodgkinHuxleyHistory, IzhikevichHistory, SimulationOutput,
};
use crate::stimulus::{Stimulus, StimulusProfile};


/// A set of experiments
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    #[serde(rename = "experiment", default)]
    pub experiments: Vec<ExperimentConfig>,
}

impl SimulationConfig {
    /// Parses and validates a configuration
    pub fn from_toml_str(contents: &str) -> SimulationResult<Self> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;

        Ok(config)
    }

    /// Reads, parses and validates a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SimulationResult<Self> {
        let contents = read_to_string(path)?;

        SimulationConfig::from_toml_str(&contents)
    }

    /// Checks every experiment and that experiment names are unique
    pub fn validate(&self) -> SimulationResult<()> {
        let mut names = HashSet::new();

        for experiment in &self.experiments {
            if !names.insert(experiment.name.as_str()) {
                return Err(SimulationError::DuplicateExperiment(experiment.name.clone()));
            }
            experiment.validate()?;
        }

        Ok(())
    }
}

/// Multiplicative noise applied to the stimulus before a run
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseConfig {
    /// Mean of the scaling factor
    pub mean: f64,
    /// Standard deviation of the scaling factor
    pub std: f64,
    /// Minimum scaling factor
    pub min: f64,
    /// Maximum scaling factor
    pub max: f64,
    /// Seed of the random number generator
    pub seed: u64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        let gaussian = GaussianParameters::default();

        NoiseConfig {
            mean: gaussian.mean,
            std: gaussian.std,
            min: gaussian.min,
            max: gaussian.max,
            seed: 0,
        }
    }
}

impl NoiseConfig {
    pub fn gaussian_parameters(&self) -> GaussianParameters {
        GaussianParameters { mean: self.mean, std: self.std, min: self.min, max: self.max }
    }
}

/// Which neuron model an experiment uses, a preset and explicit parameters
/// are mutually exclusive
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ModelConfig {
    HodgkinHuxley {
        /// Voltage the gates are initialized at (mV)
        #[serde(default)]
        starting_voltage: f64,
        #[serde(default)]
        preset: Option<HodgkinHuxleyPreset>,
        #[serde(default)]
        parameters: Option<HodgkinHuxleyParameters>,
    },
    Izhikevich {
        #[serde(default)]
        preset: Option<IzhikevichPreset>,
        #[serde(default)]
        parameters: Option<IzhikevichParameters>,
        /// Overrides the resting potential of the preset or parameters (mV)
        #[serde(default)]
        v_init: Option<f64>,
    },
}

impl ModelConfig {
    /// Resolves the Hodgkin Huxley parameters, `None` for other models
    pub fn hodgkin_huxley_parameters(&self) -> SimulationResult<Option<HodgkinHuxleyParameters>> {
        match self {
            ModelConfig::HodgkinHuxley { preset, parameters, .. } => {
                match (preset, parameters) {
                    (Some(_), Some(_)) => Err(SimulationError::InvalidModel(
                        String::from("hodgkin_huxley model has both a preset and parameters")
                    )),
                    (Some(preset), None) => Ok(Some(preset.parameters())),
                    (None, Some(parameters)) => Ok(Some(*parameters)),
                    (None, None) => Ok(Some(HodgkinHuxleyParameters::default())),
                }
            },
            ModelConfig::Izhikevich { .. } => Ok(None),
        }
    }

    /// Resolves the Izhikevich parameters, `None` for other models
    pub fn izhikevich_parameters(&self) -> SimulationResult<Option<IzhikevichParameters>> {
        match self {
            ModelConfig::Izhikevich { preset, parameters, v_init } => {
                let mut resolved = match (preset, parameters) {
                    (Some(_), Some(_)) => return Err(SimulationError::InvalidModel(
                        String::from("izhikevich model has both a preset and parameters")
                    )),
                    (Some(preset), None) => preset.parameters(),
                    (None, Some(parameters)) => *parameters,
                    (None, None) => IzhikevichParameters::default(),
                };

                if let Some(v_init) = v_init {
                    resolved.v_init = *v_init;
                }

                Ok(Some(resolved))
            },
            ModelConfig::HodgkinHuxley { .. } => Ok(None),
        }
    }
}

/// A single simulation run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    pub name: String,
    /// Timestep (ms)
    pub dt: f64,
    /// Number of steps to simulate
    pub step_count: usize,
    pub model: ModelConfig,
    pub stimulus: StimulusProfile,
    #[serde(default)]
    pub noise: Option<NoiseConfig>,
}

impl ExperimentConfig {
    /// Checks the timestep, the model section and that the stimulus fits the step count
    pub fn validate(&self) -> SimulationResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.) {
            return Err(SimulationError::InvalidTimestep(self.dt));
        }

        self.model.hodgkin_huxley_parameters()?;
        self.model.izhikevich_parameters()?;
        if let Some(noise) = &self.noise {
            noise.gaussian_parameters().validate()?;
        }
        self.stimulus.build(self.step_count)?;

        Ok(())
    }

    /// Builds the stimulus and applies seeded noise if configured
    pub fn build_stimulus(&self) -> SimulationResult<Stimulus> {
        let mut stimulus = self.stimulus.build(self.step_count)?;

        if let Some(noise) = &self.noise {
            let mut rng = StdRng::seed_from_u64(noise.seed);
            stimulus.apply_noise(&noise.gaussian_parameters(), &mut rng)?;
        }

        Ok(stimulus)
    }

    /// Creates a fresh neuron and runs it over the configured stimulus
    pub fn run(&self) -> SimulationResult<ExperimentResult> {
        self.validate()?;
        let stimulus = self.build_stimulus()?;

        self.run_with_stimulus(stimulus)
    }

    /// Creates a fresh neuron and runs it over an externally built stimulus
    /// in place of the configured profile, the stimulus must have one value per step
    pub fn run_with_stimulus(&self, stimulus: Stimulus) -> SimulationResult<ExperimentResult> {
        if !(self.dt.is_finite() && self.dt > 0.) {
            return Err(SimulationError::InvalidTimestep(self.dt));
        }
        if stimulus.len() != self.step_count {
            return Err(SimulationError::StimulusLengthMismatch {
                expected: self.step_count,
                found: stimulus.len(),
            });
        }

        let output = match &self.model {
            ModelConfig::HodgkinHuxley { starting_voltage, .. } => {
                let params = self.model.hodgkin_huxley_parameters()?
                    .unwrap_or_default();
                let mut neuron = HodgkinHuxleyNeuron::new(*starting_voltage, params);

                ExperimentOutput::HodgkinHuxley(run_simulation(&mut neuron, &stimulus, self.dt))
            },
            ModelConfig::Izhikevich { .. } => {
                let params = self.model.izhikevich_parameters()?
                    .unwrap_or_default();
                let mut neuron = IzhikevichNeuron::new(params);

                ExperimentOutput::Izhikevich(run_simulation(&mut neuron, &stimulus, self.dt))
            },
        };

        info!(
            experiment = %self.name,
            steps = output.step_count(),
            spikes = output.spike_indices().len(),
            "experiment finished"
        );

        Ok(ExperimentResult { name: self.name.clone(), stimulus, output })
    }
}

/// Trajectories of either model
#[derive(Debug, Clone, PartialEq)]
pub enum ExperimentOutput {
    HodgkinHuxley(SimulationOutput<HodgkinHuxleyHistory>),
    Izhikevich(SimulationOutput<IzhikevichHistory>),
}

impl ExperimentOutput {
    pub fn time(&self) -> &[f64] {
        match self {
            ExperimentOutput::HodgkinHuxley(output) => &output.time,
            ExperimentOutput::Izhikevich(output) => &output.time,
        }
    }

    /// Recorded membrane potential after every step
    pub fn voltages(&self) -> &[f64] {
        match self {
            ExperimentOutput::HodgkinHuxley(output) => &output.history.voltages,
            ExperimentOutput::Izhikevich(output) => &output.history.voltages,
        }
    }

    pub fn spike_indices(&self) -> &[usize] {
        match self {
            ExperimentOutput::HodgkinHuxley(output) => &output.spike_indices,
            ExperimentOutput::Izhikevich(output) => &output.spike_indices,
        }
    }

    pub fn first_non_finite(&self) -> Option<usize> {
        match self {
            ExperimentOutput::HodgkinHuxley(output) => output.first_non_finite,
            ExperimentOutput::Izhikevich(output) => output.first_non_finite,
        }
    }

    pub fn step_count(&self) -> usize {
        self.time().len()
    }
}

/// Stimulus and trajectories of a finished experiment
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentResult {
    pub name: String,
    pub stimulus: Stimulus,
    pub output: ExperimentOutput,
}

impl ExperimentResult {
    /// Smallest and largest recorded voltage ignoring non-finite values,
    /// `None` if there are no finite voltages
    pub fn voltage_range(&self) -> Option<(f64, f64)> {
        self.output.voltages()
            .iter()
            .filter(|value| value.is_finite())
            .fold(None, |range, &value| match range {
                None => Some((value, value)),
                Some((low, high)) => Some((f64::min(low, value), f64::max(high, value))),
            })
    }
}

/// Runs independent experiments in parallel, results are in the same order
/// as the experiments
pub fn run_experiments(experiments: &[ExperimentConfig]) -> SimulationResult<Vec<ExperimentResult>> {
    experiments.par_iter()
        .map(|experiment| experiment.run())
        .collect()
}

/// Runs experiments one after another on the current thread
pub fn run_experiments_sequential(experiments: &[ExperimentConfig]) -> SimulationResult<Vec<ExperimentResult>> {
    experiments.iter()
        .map(|experiment| experiment.run())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PULSE_EXPERIMENT: &str = r#"
        [[experiment]]
        name = "hh"
        dt = 0.05
        step_count = 100

        [experiment.model]
        kind = "hodgkin_huxley"

        [experiment.stimulus]
        kind = "pulse"
        start = 10
        stop = 20
        amplitude = 10.0
    "#;

    #[test]
    fn test_parse_defaults() -> SimulationResult<()> {
        let config = SimulationConfig::from_toml_str(PULSE_EXPERIMENT)?;
        let experiment = &config.experiments[0];

        assert_eq!(experiment.noise, None);
        assert_eq!(
            experiment.model.hodgkin_huxley_parameters()?,
            Some(HodgkinHuxleyParameters::default()),
        );
        assert_eq!(experiment.model.izhikevich_parameters()?, None);

        Ok(())
    }

    #[test]
    fn test_preset_and_parameters_conflict() {
        let model = ModelConfig::Izhikevich {
            preset: Some(IzhikevichPreset::Resonator),
            parameters: Some(IzhikevichParameters::default()),
            v_init: None,
        };

        assert!(matches!(model.izhikevich_parameters(), Err(SimulationError::InvalidModel(_))));
    }

    #[test]
    fn test_v_init_override() -> SimulationResult<()> {
        let model = ModelConfig::Izhikevich {
            preset: Some(IzhikevichPreset::Resonator),
            parameters: None,
            v_init: Some(-70.),
        };
        let params = model.izhikevich_parameters()?.unwrap_or_default();

        assert_eq!(params.v_init, -70.);
        assert_eq!(params.a, 0.1);

        Ok(())
    }

    #[test]
    fn test_invalid_timestep() {
        let contents = PULSE_EXPERIMENT.replace("dt = 0.05", "dt = 0.0");

        assert!(matches!(
            SimulationConfig::from_toml_str(&contents),
            Err(SimulationError::InvalidTimestep(_)),
        ));
    }

    #[test]
    fn test_stimulus_outside_run() {
        let contents = PULSE_EXPERIMENT.replace("stop = 20", "stop = 200");

        assert!(matches!(
            SimulationConfig::from_toml_str(&contents),
            Err(SimulationError::InvalidStimulus(_)),
        ));
    }

    #[test]
    fn test_duplicate_names() {
        let contents = format!("{}\n{}", PULSE_EXPERIMENT, PULSE_EXPERIMENT);

        assert!(matches!(
            SimulationConfig::from_toml_str(&contents),
            Err(SimulationError::DuplicateExperiment(_)),
        ));
    }

    #[test]
    fn test_external_stimulus_length() -> SimulationResult<()> {
        let config = SimulationConfig::from_toml_str(PULSE_EXPERIMENT)?;
        let experiment = &config.experiments[0];

        assert!(matches!(
            experiment.run_with_stimulus(Stimulus::zeros(99)),
            Err(SimulationError::StimulusLengthMismatch { expected: 100, found: 99 }),
        ));

        let result = experiment.run_with_stimulus(Stimulus::constant(100, 10.))?;
        assert_eq!(result.output.step_count(), 100);

        Ok(())
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let contents = PULSE_EXPERIMENT.replace("step_count = 100", "step_count = 100\nsteps = 3");

        assert!(matches!(
            SimulationConfig::from_toml_str(&contents),
            Err(SimulationError::Parse(_)),
        ));
    }

    #[test]
    fn test_unknown_model_field_is_rejected() {
        // `starting_voltage` only exists for the hodgkin_huxley model
        let contents = PULSE_EXPERIMENT.replace(
            "kind = \"hodgkin_huxley\"", 
            "kind = \"izhikevich\"\npreset = \"resonator\"\nstarting_voltage = -70.0",
        );

        assert!(matches!(
            SimulationConfig::from_toml_str(&contents),
            Err(SimulationError::Parse(_)),
        ));

        let valid = PULSE_EXPERIMENT.replace(
            "kind = \"hodgkin_huxley\"", 
            "kind = \"izhikevich\"\npreset = \"resonator\"\nv_init = -70.0",
        );
        assert!(SimulationConfig::from_toml_str(&valid).is_ok());
    }

    #[test]
    fn test_unknown_stimulus_field_is_rejected() {
        let contents = PULSE_EXPERIMENT.replace("amplitude = 10.0", "amplitude = 10.0\nburst_stop = 30");

        assert!(matches!(
            SimulationConfig::from_toml_str(&contents),
            Err(SimulationError::Parse(_)),
        ));
    }

    #[test]
    fn test_non_finite_noise_bounds_are_rejected() {
        let contents = format!(
            "{}\n        [experiment.noise]\n        std = 5.0\n        min = nan\n        max = nan\n", 
            PULSE_EXPERIMENT,
        );

        assert!(matches!(
            SimulationConfig::from_toml_str(&contents),
            Err(SimulationError::InvalidNoise(_)),
        ));
    }
}
