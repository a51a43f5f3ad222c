//! # Point Neuron Models
//!
//! `point_neuron_models` numerically integrates two families of point neuron models,
//! the conductance based Hodgkin Huxley model and the two variable Izhikevich model,
//! over a fixed timestep. A neuron is driven by an injected current waveform with one
//! value per step and its membrane potential, gating or recovery variables and
//! ionic currents are recorded after every step.
//!
//! Both models are advanced with explicit Euler steps. Numerical failures such as
//! the removable singularities of the Hodgkin Huxley rate equations or an unstable
//! parameter set are never clamped, they propagate as NaN or infinite values and can
//! be detected with [`neuron::first_non_finite`] or
//! [`neuron::SimulationOutput::first_non_finite`].
//!
//! ## Example Code
//!
//! ### Hodgkin Huxley neuron with a rectangular pulse
//!
//! ```rust
//! use point_neuron_models::{
//!     error::SimulationError,
//!     neuron::{
//!         hodgkin_huxley::{HodgkinHuxleyNeuron, HodgkinHuxleyParameters},
//!         run_simulation, HodgkinHuxleyHistory, SimulationOutput,
//!     },
//!     stimulus::Stimulus,
//! };
//!
//! fn main() -> Result<(), SimulationError> {
//!     let mut neuron = HodgkinHuxleyNeuron::new(0., HodgkinHuxleyParameters::default());
//!     let stimulus = Stimulus::pulse(5000, 2000, 3000, 10.)?;
//!
//!     let output: SimulationOutput<HodgkinHuxleyHistory> = run_simulation(
//!         &mut neuron,
//!         &stimulus,
//!         0.05,
//!     );
//!
//!     assert_eq!(output.history.voltages.len(), 5000);
//!     assert!(output.history.voltages[2000..].iter().any(|voltage| *voltage > 80.));
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Izhikevich neuron types
//!
//! ```rust
//! use point_neuron_models::{
//!     neuron::{
//!         izhikevich::{IzhikevichNeuron, IzhikevichPreset},
//!         run_simulation, IzhikevichHistory, SimulationOutput,
//!     },
//!     stimulus::Stimulus,
//! };
//!
//! let stimulus = Stimulus::constant(1000, 10.);
//!
//! for preset in IzhikevichPreset::ALL {
//!     let mut neuron = IzhikevichNeuron::from(preset);
//!     let output: SimulationOutput<IzhikevichHistory> = run_simulation(&mut neuron, &stimulus, 0.1);
//!
//!     // spikes are recorded as exactly the spike cutoff
//!     assert!(output.history.voltages.iter().all(|voltage| *voltage <= 30.));
//!     println!("{}: {} spikes", preset.name(), output.spike_count());
//! }
//! ```
//!
//! ### Running experiments from a configuration
//!
//! Experiments can be described in TOML, see [`config`], and independent
//! experiments are run in parallel with [`config::run_experiments`].

pub mod config;
pub mod distribution;
pub mod error;
pub mod neuron;
pub mod stimulus;
