//! Injected current waveforms, one value per simulation step. A [`Stimulus`] is
//! built once before a run and is never mutated while the run is in progress.

use std::ops::Index;
use rand::Rng;
use serde::Deserialize;
use crate::distribution::GaussianParameters;
use crate::error::{SimulationError, SimulationResult};


/// A constant current applied over the half open index range `[start, stop)`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Segment {
    /// First step of the segment
    pub start: usize,
    /// Step after the last step of the segment
    pub stop: usize,
    /// Injected current
    pub amplitude: f64,
}

impl Segment {
    pub fn new(start: usize, stop: usize, amplitude: f64) -> Self {
        Segment { start, stop, amplitude }
    }
}

/// Current values indexed by simulation step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stimulus {
    values: Vec<f64>,
}

impl From<Vec<f64>> for Stimulus {
    fn from(values: Vec<f64>) -> Self {
        Stimulus { values }
    }
}

impl Index<usize> for Stimulus {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl Stimulus {
    /// Zero current for every step
    pub fn zeros(step_count: usize) -> Self {
        Stimulus::constant(step_count, 0.)
    }

    /// The same current for every step
    pub fn constant(step_count: usize, amplitude: f64) -> Self {
        Stimulus { values: vec![amplitude; step_count] }
    }

    /// A zero baseline with a single rectangular pulse over `[start, stop)`
    pub fn pulse(step_count: usize, start: usize, stop: usize, amplitude: f64) -> SimulationResult<Self> {
        Stimulus::from_segments(step_count, &[Segment::new(start, stop, amplitude)])
    }

    /// A zero baseline with each segment written in order, later segments 
    /// overwrite earlier ones where they overlap
    pub fn from_segments(step_count: usize, segments: &[Segment]) -> SimulationResult<Self> {
        let mut stimulus = Stimulus::zeros(step_count);

        for segment in segments {
            stimulus.set_segment(segment)?;
        }

        Ok(stimulus)
    }

    /// Quiescent until `sustained_start`, then a sustained current that is 
    /// raised to `burst_amplitude` over `[burst_start, burst_stop)`
    pub fn pulse_on_sustained(
        step_count: usize, 
        sustained_start: usize, 
        burst_start: usize, 
        burst_stop: usize, 
        sustained_amplitude: f64, 
        burst_amplitude: f64,
    ) -> SimulationResult<Self> {
        if burst_start < sustained_start {
            return Err(SimulationError::InvalidStimulus(
                format!("burst starts at {} before the sustained current at {}", burst_start, sustained_start)
            ));
        }

        Stimulus::from_segments(
            step_count, 
            &[
                Segment::new(sustained_start, step_count, sustained_amplitude),
                Segment::new(burst_start, burst_stop, burst_amplitude),
            ],
        )
    }

    /// Overwrites the current over the segment range
    pub fn set_segment(&mut self, segment: &Segment) -> SimulationResult<()> {
        if segment.start > segment.stop {
            return Err(SimulationError::InvalidStimulus(
                format!("segment start {} is after its stop {}", segment.start, segment.stop)
            ));
        }
        if segment.stop > self.values.len() {
            return Err(SimulationError::InvalidStimulus(
                format!("segment [{}, {}) exceeds {} steps", segment.start, segment.stop, self.values.len())
            ));
        }
        if !segment.amplitude.is_finite() {
            return Err(SimulationError::InvalidStimulus(
                format!("segment amplitude {} is not finite", segment.amplitude)
            ));
        }

        self.values[segment.start..segment.stop]
            .iter_mut()
            .for_each(|value| *value = segment.amplitude);

        Ok(())
    }

    /// Scales every value by a clamped normally distributed factor
    pub fn apply_noise<R: Rng + ?Sized>(
        &mut self, 
        params: &GaussianParameters, 
        rng: &mut R,
    ) -> SimulationResult<()> {
        params.validate()?;

        for value in self.values.iter_mut() {
            *value *= params.get_random_number(rng)?;
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.values.iter()
    }
}

/// Description of a stimulus that can be built for any number of steps,
/// deserialized from the `kind` tag of a configuration table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum StimulusProfile {
    /// The same current for every step
    Constant { 
        amplitude: f64 
    },
    /// A single rectangular pulse over a zero baseline
    Pulse { 
        start: usize, 
        stop: usize, 
        amplitude: f64 
    },
    /// A brief high pulse on top of a sustained lower current
    PulseOnSustained {
        sustained_start: usize,
        burst_start: usize,
        burst_stop: usize,
        sustained_amplitude: f64,
        burst_amplitude: f64,
    },
    /// Piecewise constant current over a zero baseline
    Segments { 
        segments: Vec<Segment> 
    },
}

impl StimulusProfile {
    /// Current of `10` over `[2000, 3000)`
    pub fn hodgkin_huxley_pulse() -> Self {
        StimulusProfile::Pulse { start: 2000, stop: 3000, amplitude: 10. }
    }

    /// Quiescent for the first 21 steps, a current of `4` afterwards, 
    /// raised to `8` over `[251, 255)`
    pub fn resonator_burst() -> Self {
        StimulusProfile::PulseOnSustained { 
            sustained_start: 21, 
            burst_start: 251, 
            burst_stop: 255, 
            sustained_amplitude: 4., 
            burst_amplitude: 8., 
        }
    }

    /// Four plateaus of `0`, `2`, `4` and `8` splitting the run into quarters
    pub fn four_plateaus(step_count: usize) -> Self {
        let quarter = step_count / 4;

        StimulusProfile::Segments { 
            segments: vec![
                Segment::new(0, quarter, 0.),
                Segment::new(quarter, 2 * quarter, 2.),
                Segment::new(2 * quarter, 3 * quarter, 4.),
                Segment::new(3 * quarter, step_count, 8.),
            ],
        }
    }

    /// Builds the waveform for the given number of steps
    pub fn build(&self, step_count: usize) -> SimulationResult<Stimulus> {
        match self {
            StimulusProfile::Constant { amplitude } => {
                if !amplitude.is_finite() {
                    return Err(SimulationError::InvalidStimulus(
                        format!("amplitude {} is not finite", amplitude)
                    ));
                }

                Ok(Stimulus::constant(step_count, *amplitude))
            },
            StimulusProfile::Pulse { start, stop, amplitude } => {
                Stimulus::pulse(step_count, *start, *stop, *amplitude)
            },
            StimulusProfile::PulseOnSustained { 
                sustained_start, burst_start, burst_stop, sustained_amplitude, burst_amplitude,
            } => {
                Stimulus::pulse_on_sustained(
                    step_count, 
                    *sustained_start, 
                    *burst_start, 
                    *burst_stop, 
                    *sustained_amplitude, 
                    *burst_amplitude,
                )
            },
            StimulusProfile::Segments { segments } => Stimulus::from_segments(step_count, segments),
        }
    }
}
