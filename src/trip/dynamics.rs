//! Acceleration and jerk derivation

use serde::Deserialize;

use super::{Sample, Trip};

/// Physical plausibility bounds applied to the derived signals
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DynamicsLimits {
    pub min_acceleration_mps2: f64,
    pub max_acceleration_mps2: f64,
    pub min_jerk_mps3: f64,
    pub max_jerk_mps3: f64,
}

impl Default for DynamicsLimits {
    fn default() -> Self {
        Self {
            min_acceleration_mps2: -10.,
            max_acceleration_mps2: 10.,
            min_jerk_mps3: -20.,
            max_jerk_mps3: 20.,
        }
    }
}

impl DynamicsLimits {
    fn clip_acceleration(&self, acc: f64) -> f64 {
        acc.clamp(self.min_acceleration_mps2, self.max_acceleration_mps2)
    }

    fn clip_jerk(&self, jerk: f64) -> f64 {
        jerk.clamp(self.min_jerk_mps3, self.max_jerk_mps3)
    }
}

/// A sample augmented with its finite-difference derivatives
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicSample {
    pub sample: Sample,
    /// Seconds since the previous sample, 0 for the first one
    pub dt_s: f64,
    pub acc_mps2: f64,
    pub jerk_mps3: f64,
}

/// Trip augmented with `dt_s`, `acc_mps2` and `jerk_mps3`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DynamicTrip {
    samples: Vec<DynamicSample>,
}

impl Trip {
    /// Derive time deltas, acceleration and jerk
    ///
    /// One left to right pass of backward differences. A zero time delta gives
    /// zero acceleration and jerk for that sample.
    pub fn dynamics(&self, limits: &DynamicsLimits) -> DynamicTrip {
        let mut samples: Vec<DynamicSample> = Vec::with_capacity(self.samples.len());
        let mut zero_gaps = 0;

        for sample in &self.samples {
            let derived = match samples.last() {
                None => DynamicSample {
                    sample: sample.clone(),
                    dt_s: 0.,
                    acc_mps2: 0.,
                    jerk_mps3: 0.,
                },
                Some(prev) => {
                    let dt_s = (sample.timestamp - prev.sample.timestamp)
                        .as_seconds_f64()
                        .max(0.);

                    let (acc_mps2, jerk_mps3) = if dt_s > 0. {
                        let acc = limits
                            .clip_acceleration((sample.speed_mps - prev.sample.speed_mps) / dt_s);
                        let jerk = limits.clip_jerk((acc - prev.acc_mps2) / dt_s);
                        (acc, jerk)
                    } else {
                        zero_gaps += 1;
                        (0., 0.)
                    };

                    DynamicSample {
                        sample: sample.clone(),
                        dt_s,
                        acc_mps2,
                        jerk_mps3,
                    }
                }
            };
            samples.push(derived);
        }

        if zero_gaps > 0 {
            log::debug!("{} samples share the timestamp of their predecessor", zero_gaps);
        }

        DynamicTrip { samples }
    }
}

impl DynamicTrip {
    /// Assemble an already derived trip, eg. read back from an export
    pub fn from_derived(samples: Vec<DynamicSample>) -> Self {
        Self { samples }
    }

    /// The normalized trip the derivatives were computed from
    pub fn trip(&self) -> Trip {
        Trip {
            samples: self.samples.iter().map(|s| s.sample.clone()).collect(),
        }
    }

    /// Recompute the derived columns from the underlying samples
    pub fn rederive(&self, limits: &DynamicsLimits) -> DynamicTrip {
        self.trip().dynamics(limits)
    }

    pub fn samples(&self) -> &[DynamicSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn accelerations(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.acc_mps2)
    }

    pub fn jerks(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.jerk_mps3)
    }

    pub fn speeds_kmh(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.sample.speed_kmh)
    }
}
