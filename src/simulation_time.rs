/// Span of a simulation run, in seconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationTime {
    start_time: f64,
    step: f64,
    total_steps: usize,
}

impl SimulationTime {
    pub fn new(start_time: f64, end_time: f64, step: f64) -> Self {
        let total_steps = if step <= 0. || end_time <= start_time {
            0
        } else {
            ((end_time - start_time) / step).ceil() as usize
        };

        Self {
            start_time,
            step,
            total_steps,
        }
    }

    /// A run of `number_of_periods` periods of `step` seconds, starting at zero.
    pub fn for_periods(number_of_periods: usize, step: f64) -> Self {
        Self {
            start_time: 0.,
            step,
            total_steps: if step < 0. { 0 } else { number_of_periods },
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn iter(&self) -> SimulationTimeIterator {
        SimulationTimeIterator {
            current_index: 0,
            simulation_time: *self,
        }
    }
}

pub struct SimulationTimeIterator {
    current_index: usize,
    simulation_time: SimulationTime,
}

#[derive(Debug, PartialEq)]
pub struct SimulationTimeIteration {
    pub index: usize,
    /// seconds since the start of the run
    pub time: f64,
    pub timestep: f64,
}

impl Iterator for SimulationTimeIterator {
    type Item = SimulationTimeIteration;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.simulation_time.total_steps {
            return None;
        }
        let index = self.current_index;
        self.current_index += 1;

        Some(SimulationTimeIteration {
            index,
            time: self.simulation_time.start_time + index as f64 * self.simulation_time.step,
            timestep: self.simulation_time.step,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    pub fn timestep() -> f64 {
        900.
    }

    #[fixture]
    pub fn simtime(timestep: f64) -> SimulationTime {
        SimulationTime::new(3_600., 7_200., timestep)
    }

    #[rstest]
    fn should_have_correct_total_steps(simtime: SimulationTime) {
        assert_eq!(simtime.total_steps(), 4)
    }

    #[rstest]
    fn should_round_partial_step_up() {
        assert_eq!(SimulationTime::new(0., 1_000., 900.).total_steps(), 2);
    }

    #[rstest]
    fn should_have_no_steps_for_empty_run() {
        assert_eq!(SimulationTime::new(0., 0., 900.).iter().count(), 0);
        assert_eq!(SimulationTime::new(0., 3_600., 0.).total_steps(), 0);
    }

    #[rstest]
    fn should_iterate_correctly(simtime: SimulationTime, timestep: f64) {
        let items = simtime.iter().collect::<Vec<_>>();

        assert_eq!(items.len(), 4);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.index, i);
            assert_eq!(item.time, 3_600. + i as f64 * timestep);
            assert_eq!(item.timestep, timestep);
        }
    }

    #[rstest]
    fn should_build_run_from_number_of_periods() {
        let simtime = SimulationTime::for_periods(96, 900.);
        assert_eq!(simtime.total_steps(), 96);
        assert_eq!(simtime.iter().last().unwrap().time, 95. * 900.);
    }

    #[rstest]
    #[case(333.3)]
    #[case(0.1)]
    #[case(1e-3)]
    fn should_keep_number_of_periods_for_non_integer_step(#[case] step: f64) {
        for number_of_periods in [1, 7, 13, 48, 1_000] {
            let simtime = SimulationTime::for_periods(number_of_periods, step);
            assert_eq!(simtime.total_steps(), number_of_periods);
            assert_eq!(simtime.iter().count(), number_of_periods);
        }
    }
}
