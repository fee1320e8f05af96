//! Truncation selection schedules.
//!
//! Selection is a hard threshold: genotypes whose fitness falls below the
//! threshold are removed outright. Two schedules drive it:
//!
//! - the **cutoff schedule** gives the replication-landscape threshold for
//!   every generation, as an initial value followed by step changes;
//! - the **shock schedule** lists the generations at which the population is
//!   culled against the shock landscape, with the threshold for each.
//!
//! Both are written as flat number lists, e.g. `[0.5, 100, 0.6]` or
//! `[50, 0.4, 120, 0.5]`.

use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Default replication cutoff when no schedule is given.
pub const DEFAULT_CUTOFF: f64 = 0.5;

fn parse_generation(name: &'static str, value: f64) -> Result<u32, ConfigurationError> {
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(ConfigurationError::Schedule {
            name,
            reason: format!("generation {value} is not a non-negative integer"),
        });
    }
    Ok(value as u32)
}

/// Replication cutoff per generation: `[c0, g1, c1, g2, c2, ...]`.
///
/// Step generations are strictly increasing. The cutoff at generation `gen`
/// is `c_i` for the last step with `g_i < gen`, or `c0` if no step applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct CutoffSchedule {
    initial: f64,
    steps: Vec<(u32, f64)>,
}

impl CutoffSchedule {
    /// A schedule with a single cutoff for every generation.
    pub fn constant(cutoff: f64) -> Self {
        Self {
            initial: cutoff,
            steps: Vec::new(),
        }
    }

    /// Parse the flat list form. An empty list yields the default cutoff.
    ///
    /// # Errors
    /// An even-length list, a generation that is negative or fractional, or
    /// step generations that are not strictly increasing.
    pub fn from_list(values: &[f64]) -> Result<Self, ConfigurationError> {
        let Some((&initial, rest)) = values.split_first() else {
            return Ok(Self::default());
        };
        if rest.len() % 2 != 0 {
            return Err(ConfigurationError::Schedule {
                name: "cutoff",
                reason: "expected an initial cutoff followed by generation/cutoff pairs".into(),
            });
        }
        let steps: Vec<(u32, f64)> = rest
            .chunks_exact(2)
            .map(|pair| Ok((parse_generation("cutoff", pair[0])?, pair[1])))
            .collect::<Result<_, ConfigurationError>>()?;
        if let Some(pair) = steps.windows(2).find(|pair| pair[1].0 <= pair[0].0) {
            return Err(ConfigurationError::Schedule {
                name: "cutoff",
                reason: format!(
                    "generation {} does not follow generation {}",
                    pair[1].0, pair[0].0
                ),
            });
        }
        Ok(Self { initial, steps })
    }

    /// Cutoff in force at generation `generation`.
    pub fn cutoff_at(&self, generation: u32) -> f64 {
        self.steps
            .iter()
            .rev()
            .find(|(g, _)| *g < generation)
            .map_or(self.initial, |&(_, c)| c)
    }

    /// The flat list form.
    pub fn to_list(&self) -> Vec<f64> {
        std::iter::once(self.initial)
            .chain(self.steps.iter().flat_map(|&(g, c)| [g as f64, c]))
            .collect()
    }
}

impl Default for CutoffSchedule {
    fn default() -> Self {
        Self::constant(DEFAULT_CUTOFF)
    }
}

impl TryFrom<Vec<f64>> for CutoffSchedule {
    type Error = ConfigurationError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_list(&values)
    }
}

impl From<CutoffSchedule> for Vec<f64> {
    fn from(schedule: CutoffSchedule) -> Self {
        schedule.to_list()
    }
}

/// Shock events: `[g1, s1, g2, s2, ...]`.
///
/// After advancing to generation `g_i` the population is culled against the
/// shock landscape with threshold `s_i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ShockSchedule {
    events: Vec<(u32, f64)>,
}

impl ShockSchedule {
    /// Parse the flat list form.
    ///
    /// # Errors
    /// An odd-length list, or a generation that is negative or fractional.
    pub fn from_list(values: &[f64]) -> Result<Self, ConfigurationError> {
        if values.len() % 2 != 0 {
            return Err(ConfigurationError::Schedule {
                name: "shock",
                reason: "expected generation/threshold pairs".into(),
            });
        }
        let events = values
            .chunks_exact(2)
            .map(|pair| Ok((parse_generation("shock", pair[0])?, pair[1])))
            .collect::<Result<_, ConfigurationError>>()?;
        Ok(Self { events })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Threshold of the first shock scheduled at `generation`, if any.
    pub fn shock_at(&self, generation: u32) -> Option<f64> {
        self.events
            .iter()
            .find(|(g, _)| *g == generation)
            .map(|&(_, s)| s)
    }

    /// All scheduled events in list order.
    pub fn events(&self) -> &[(u32, f64)] {
        &self.events
    }

    pub fn to_list(&self) -> Vec<f64> {
        self.events
            .iter()
            .flat_map(|&(g, s)| [g as f64, s])
            .collect()
    }
}

impl TryFrom<Vec<f64>> for ShockSchedule {
    type Error = ConfigurationError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_list(&values)
    }
}

impl From<ShockSchedule> for Vec<f64> {
    fn from(schedule: ShockSchedule) -> Self {
        schedule.to_list()
    }
}
