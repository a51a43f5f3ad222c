//! A tool to generate and clamp noise.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;
use crate::error::{SimulationError, SimulationResult};


/// Parameters of a clamped normal distribution
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GaussianParameters {
    /// Mean of distribution
    pub mean: f64,
    /// Standard deviation of distribution
    pub std: f64,
    /// Maximum cutoff value
    pub max: f64,
    /// Minimum cutoff value
    pub min: f64,
}

impl Default for GaussianParameters {
    fn default() -> Self {
        GaussianParameters { 
            mean: 1.0, // center of norm distr
            std: 0.0, // std of norm distr
            max: 2.0, // maximum cutoff for norm distr
            min: 0.0, // minimum cutoff for norm distr
        }
    }
}

impl GaussianParameters {
    /// Checks that the distribution can be sampled
    pub fn validate(&self) -> SimulationResult<()> {
        if !self.mean.is_finite() || !self.std.is_finite() || self.std < 0. {
            return Err(SimulationError::InvalidNoise(
                format!("mean {} and std {} must be finite with std >= 0", self.mean, self.std)
            ));
        }
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(SimulationError::InvalidNoise(
                format!("min {} and max {} must be finite with min <= max", self.min, self.max)
            ));
        }

        Ok(())
    }

    /// Generates a normally distributed random number clamped between
    /// a minimum and a maximum
    pub fn get_random_number<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationResult<f64> {
        limited_distr(self.mean, self.std, self.min, self.max, rng)
    }
}

/// Calculates the normal distribution at the given mean and standard deviation and clamps
/// the output value between the given minimum and maximum, if standard deviation is `0.` the 
/// mean is always returned
pub fn limited_distr<R: Rng + ?Sized>(
    mean: f64, 
    std: f64, 
    minimum: f64, 
    maximum: f64, 
    rng: &mut R,
) -> SimulationResult<f64> {
    if std == 0.0 {
        return Ok(mean);
    }

    let normal = Normal::new(mean, std)
        .map_err(|e| SimulationError::InvalidNoise(e.to_string()))?;
    let output: f64 = normal.sample(rng);
   
    Ok(output.max(minimum).min(maximum))
}
