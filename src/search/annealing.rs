// Simulated annealing: restarted local search that also accepts worse
// neighbours with probability exp(-delta / T), T falling over each run.

use serde::{Deserialize, Serialize};

use crate::{
    cipher::{Cipher, CipherKey},
    scorer::Scorer,
    search::{
        local::{self, Acceptance},
        Evaluator, LocalSearchParams, SearchResult, Strategy,
    },
    Error, Result,
};

const MIN_TEMPERATURE: f64 = 1e-9;

/// Temperature as a function of the move number within a run. Never
/// increases, and never drops below a small positive floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoolingSchedule {
    /// `initial * factor^i`
    Geometric { initial: f64, factor: f64 },
    /// `initial - step * i`
    Linear { initial: f64, step: f64 },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric {
            initial: 10.0,
            factor: 0.9995,
        }
    }
}

impl CoolingSchedule {
    pub fn temperature(&self, iteration: u64) -> f64 {
        let t = match *self {
            CoolingSchedule::Geometric { initial, factor } => {
                initial * factor.powf(iteration as f64)
            }
            CoolingSchedule::Linear { initial, step } => initial - step * iteration as f64,
        };
        t.max(MIN_TEMPERATURE)
    }

    pub fn validate(&self) -> Result<()> {
        let (initial, ok) = match *self {
            CoolingSchedule::Geometric { initial, factor } => {
                (initial, factor > 0.0 && factor <= 1.0)
            }
            CoolingSchedule::Linear { initial, step } => (initial, step.is_finite() && step >= 0.0),
        };
        if !(initial.is_finite() && initial > 0.0) || !ok {
            return Err(Error::InvalidConfig(format!(
                "cooling schedule {self:?} must start hot and never warm up"
            )));
        }
        Ok(())
    }
}

pub fn anneal<C, S>(
    ciphertext: &[u8],
    cipher: &C,
    scorer: &S,
    params: &LocalSearchParams,
    schedule: CoolingSchedule,
) -> SearchResult<CipherKey<C>>
where
    C: Cipher,
    S: Scorer + ?Sized,
{
    let eval = Evaluator::new(cipher, ciphertext, scorer);
    local::restart_search(
        &eval,
        params,
        Acceptance::Metropolis(schedule),
        Strategy::Annealing,
    )
}
