#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use point_neuron_models::{
        error::SimulationError,
        neuron::{
            hodgkin_huxley::{HodgkinHuxleyNeuron, HodgkinHuxleyParameters},
            ion_channels::RateSingularity,
            iterate_and_spike::IterateAndSpike,
            run_simulation, HodgkinHuxleyHistory, SimulationOutput,
        },
        stimulus::{Stimulus, StimulusProfile},
    };

    const DT: f64 = 0.05;
    const STEPS: usize = 5000;

    fn run_pulse(neuron: &mut HodgkinHuxleyNeuron) -> Result<SimulationOutput<HodgkinHuxleyHistory>, SimulationError> {
        let stimulus = StimulusProfile::hodgkin_huxley_pulse().build(STEPS)?;

        Ok(run_simulation(neuron, &stimulus, DT))
    }

    #[test]
    pub fn test_pulse_produces_spikes() -> Result<(), SimulationError> {
        let mut neuron = HodgkinHuxleyNeuron::new(0., HodgkinHuxleyParameters::default());
        let output = run_pulse(&mut neuron)?;
        let voltages = &output.history.voltages;

        assert_eq!(voltages.len(), STEPS);
        assert_eq!(output.time.len(), STEPS);
        assert_eq!(output.time[2000], 2000. * DT);

        assert!(voltages[..2000].iter().all(|voltage| (-20. ..=130.).contains(voltage)));
        assert!(voltages[2000..3500].iter().any(|voltage| *voltage > 80.));

        assert!(!output.spike_indices.is_empty());
        assert!(output.spike_indices.iter().all(|i| (2000..3500).contains(i)));
        assert_eq!(output.first_non_finite, None);

        Ok(())
    }

    #[test]
    pub fn test_gates_stay_within_unit_interval() -> Result<(), SimulationError> {
        let mut neuron = HodgkinHuxleyNeuron::default();
        let output = run_pulse(&mut neuron)?;

        let gates = output.history.gate_states();
        assert_eq!(gates.shape(), &[3, STEPS]);
        assert!(gates.iter().all(|state| (0. ..=1.).contains(state)));

        Ok(())
    }

    #[test]
    pub fn test_currents_are_recorded() -> Result<(), SimulationError> {
        let mut neuron = HodgkinHuxleyNeuron::default();
        let stimulus = Stimulus::pulse(STEPS, 2000, 3000, 10.)?;
        let output: SimulationOutput<HodgkinHuxleyHistory> = run_simulation(&mut neuron, &stimulus, DT);
        let history = &output.history;

        for i in [0, 1999, 2000, 2500, 4999] {
            let expected = stimulus[i] - history.i_na[i] - history.i_k[i] - history.i_k_leak[i];
            assert_eq!(history.i_sum[i], expected);
        }
        assert_eq!(history.currents().shape(), &[4, STEPS]);

        Ok(())
    }

    #[test]
    pub fn test_fresh_runs_are_identical() -> Result<(), SimulationError> {
        let mut first_neuron = HodgkinHuxleyNeuron::new(0., HodgkinHuxleyParameters::default());
        let first = run_pulse(&mut first_neuron)?;

        let mut second_neuron = HodgkinHuxleyNeuron::new(0., HodgkinHuxleyParameters::default());
        let second = run_pulse(&mut second_neuron)?;

        assert_eq!(first, second);
        assert_eq!(first_neuron, second_neuron);

        Ok(())
    }

    #[test]
    pub fn test_empty_stimulus() {
        let mut neuron = HodgkinHuxleyNeuron::default();
        let initial = neuron.clone();

        let output: SimulationOutput<HodgkinHuxleyHistory> = run_simulation(
            &mut neuron, 
            &Stimulus::zeros(0), 
            DT,
        );

        assert!(output.time.is_empty());
        assert!(output.history.voltages.is_empty());
        assert!(output.history.n.is_empty());
        assert!(output.history.i_sum.is_empty());
        assert!(output.spike_indices.is_empty());
        assert_eq!(neuron, initial);
    }

    #[test]
    pub fn test_elevated_reversal_fires_without_input() {
        let mut neuron = HodgkinHuxleyNeuron::new(0., HodgkinHuxleyParameters::elevated_reversal());
        let output: SimulationOutput<HodgkinHuxleyHistory> = run_simulation(
            &mut neuron, 
            &Stimulus::zeros(2000), 
            DT,
        );

        assert!(output.history.voltages.iter().any(|voltage| *voltage > 80.));
        assert!(!output.spike_indices.is_empty());
    }

    #[test]
    pub fn test_unguarded_singularity_propagates_nan() {
        for voltage in [10., 25.] {
            let mut neuron = HodgkinHuxleyNeuron::new(voltage, HodgkinHuxleyParameters::default());
            assert!(!neuron.is_finite());

            let output: SimulationOutput<HodgkinHuxleyHistory> = run_simulation(
                &mut neuron, 
                &Stimulus::zeros(10), 
                DT,
            );

            // the loop still runs for every step
            assert_eq!(output.history.voltages.len(), 10);
            assert_eq!(output.first_non_finite, Some(0));
            assert!(output.history.voltages.iter().all(|voltage| voltage.is_nan()));
        }
    }

    #[test]
    pub fn test_limit_singularity_stays_finite() {
        let params = HodgkinHuxleyParameters { 
            rate_singularity: RateSingularity::Limit, 
            ..HodgkinHuxleyParameters::default() 
        };

        for voltage in [10., 25.] {
            let mut neuron = HodgkinHuxleyNeuron::new(voltage, params);
            assert!(neuron.is_finite());
            assert!((0. ..=1.).contains(&neuron.n.state));
            assert!((0. ..=1.).contains(&neuron.m.state));

            let output: SimulationOutput<HodgkinHuxleyHistory> = run_simulation(
                &mut neuron, 
                &Stimulus::zeros(1000), 
                DT,
            );

            assert_eq!(output.first_non_finite, None);
        }
    }

    proptest! {
        #[test]
        fn test_gates_start_at_steady_state(voltage in -80.0f64..120.0) {
            prop_assume!(voltage != 10. && voltage != 25.);

            let neuron = HodgkinHuxleyNeuron::new(voltage, HodgkinHuxleyParameters::default());

            for gate in [neuron.m, neuron.n, neuron.h] {
                let expected = gate.alpha / (gate.alpha + gate.beta);
                prop_assert!((gate.state - expected).abs() <= 1e-12);
                prop_assert!((0. ..=1.).contains(&gate.state));
            }
            prop_assert_eq!(neuron.current_voltage, voltage);
        }

        #[test]
        fn test_single_step_is_deterministic(
            voltage in -20.0f64..110.0, 
            input_current in -20.0f64..20.0,
            steps in 0usize..200,
        ) {
            prop_assume!(voltage != 10. && voltage != 25.);

            let mut neuron = HodgkinHuxleyNeuron::new(0., HodgkinHuxleyParameters::default());
            for _ in 0..steps {
                neuron.iterate_and_spike(input_current, DT);
            }
            neuron.current_voltage = voltage;

            let mut first = neuron.clone();
            let mut second = neuron.clone();
            first.iterate_and_spike(input_current, DT);
            second.iterate_and_spike(input_current, DT);

            prop_assert_eq!(first, second);
        }
    }
}
