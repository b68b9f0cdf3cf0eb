// Attack orchestration: validate the configuration and the ciphertext, pick
// a strategy for the cipher's key space and run it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    cipher::{Cardinality, Cipher, CipherKey, KeySpace},
    scorer::Scorer,
    search::{
        annealing::{anneal, CoolingSchedule},
        exhaustive::exhaustive,
        hill_climb::hill_climb,
        LocalSearchParams, SearchResult, Strategy,
    },
    Error, Result,
};

/// Which strategy to run. `Auto` enumerates small key spaces and climbs
/// large ones, spending the second half of the budget on annealing when
/// climbing stalls below the scorer's baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyChoice {
    #[default]
    Auto,
    Exhaustive,
    HillClimb,
    Annealing,
}

impl FromStr for StrategyChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "auto" => Ok(StrategyChoice::Auto),
            "exhaustive" => Ok(StrategyChoice::Exhaustive),
            "hill_climb" | "hill-climb" => Ok(StrategyChoice::HillClimb),
            "annealing" => Ok(StrategyChoice::Annealing),
            other => Err(format!(
                "unknown strategy {other:?}, expected auto, exhaustive, hill_climb or annealing"
            )),
        }
    }
}

impl fmt::Display for StrategyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyChoice::Auto => "auto",
            StrategyChoice::Exhaustive => "exhaustive",
            StrategyChoice::HillClimb => "hill_climb",
            StrategyChoice::Annealing => "annealing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Number of candidates to report.
    pub top_k: usize,
    pub strategy: StrategyChoice,
    /// Decrypt-and-score budget for the whole attack.
    pub max_iterations: u64,
    pub max_restarts: u64,
    /// Neighbour moves allowed in one local search run.
    pub run_iterations: u64,
    /// Moves without a new best before a run gives up.
    pub patience: u64,
    /// Fixes every random choice. Drawn from the OS when unset.
    pub seed: Option<u64>,
    pub cooling_schedule: CoolingSchedule,
    /// Largest key space `Auto` enumerates outright.
    pub exhaustive_limit: u64,
    /// How far below the baseline, as a fraction of it, the best hill
    /// climbing score may sit before `Auto` switches to annealing.
    pub plateau_tolerance: f64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            strategy: StrategyChoice::Auto,
            max_iterations: 5_000_000,
            max_restarts: 64,
            run_iterations: 5_000,
            patience: 1_000,
            seed: None,
            cooling_schedule: CoolingSchedule::default(),
            exhaustive_limit: 1_000_000,
            plateau_tolerance: 0.15,
        }
    }
}

impl AttackConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("top_k", self.top_k as u64),
            ("max_iterations", self.max_iterations),
            ("max_restarts", self.max_restarts),
            ("patience", self.patience),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(Error::InvalidConfig(format!("{name} must be at least 1")));
        }
        if !(self.plateau_tolerance.is_finite() && self.plateau_tolerance >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "plateau_tolerance must be a non-negative number, got {}",
                self.plateau_tolerance
            )));
        }
        self.cooling_schedule.validate()
    }

    fn local_params(&self, seed: u64) -> LocalSearchParams {
        LocalSearchParams {
            top_k: self.top_k,
            max_iterations: self.max_iterations,
            max_restarts: self.max_restarts,
            run_iterations: self.run_iterations,
            patience: self.patience,
            seed,
            first_run: 0,
        }
    }
}

/// Recover the most plausible keys for `ciphertext`, ranked by `scorer`.
///
/// The configuration is checked first, then the choice of strategy against
/// the key space, then the ciphertext against the cipher's alphabet. An
/// empty ciphertext yields an empty result.
pub fn attack<C, S>(
    ciphertext: &[u8],
    cipher: &C,
    scorer: &S,
    config: &AttackConfig,
) -> Result<SearchResult<CipherKey<C>>>
where
    C: Cipher,
    S: Scorer + ?Sized,
{
    config.validate()?;
    let strategy = plan(cipher, config)?;
    if ciphertext.is_empty() {
        debug!(cipher = cipher.name(), "nothing to attack in an empty ciphertext");
        return Ok(SearchResult::empty(strategy));
    }
    cipher.check_input(ciphertext)?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        cipher = cipher.name(),
        scorer = scorer.name(),
        strategy = strategy.name(),
        len = ciphertext.len(),
        "starting attack"
    );

    let result = match strategy {
        Strategy::Exhaustive => {
            exhaustive(ciphertext, cipher, scorer, config.top_k, config.max_iterations)?
        }
        Strategy::HillClimb if config.strategy == StrategyChoice::Auto => {
            climb_then_settle(ciphertext, cipher, scorer, config, seed)
        }
        Strategy::HillClimb => hill_climb(ciphertext, cipher, scorer, &config.local_params(seed)),
        Strategy::Annealing => anneal(
            ciphertext,
            cipher,
            scorer,
            &config.local_params(seed),
            config.cooling_schedule,
        ),
    };

    info!(
        cipher = cipher.name(),
        strategy = result.strategy.name(),
        evaluations = result.evaluations,
        best = result.best().map(|c| c.score),
        "attack finished"
    );
    Ok(result)
}

/// Resolve the configured strategy for this cipher's key space.
fn plan<C: Cipher>(cipher: &C, config: &AttackConfig) -> Result<Strategy> {
    let cardinality = cipher.key_space().cardinality();
    let enumerable = |limit: u64| cardinality.at_most(limit as u128).is_some();

    let strategy = match config.strategy {
        StrategyChoice::Auto => {
            if enumerable(config.exhaustive_limit.min(config.max_iterations)) {
                Strategy::Exhaustive
            } else {
                Strategy::HillClimb
            }
        }
        StrategyChoice::Exhaustive if enumerable(config.max_iterations) => Strategy::Exhaustive,
        StrategyChoice::Exhaustive => {
            return Err(Error::IntractableKeySpace {
                cipher: cipher.name(),
                budget: config.max_iterations,
            })
        }
        StrategyChoice::HillClimb => Strategy::HillClimb,
        StrategyChoice::Annealing => Strategy::Annealing,
    };
    debug!(
        cipher = cipher.name(),
        unbounded = cardinality == Cardinality::Unbounded,
        requested = %config.strategy,
        chosen = strategy.name(),
        "planned attack"
    );
    Ok(strategy)
}

/// Climb with half of the budget. If the best score stalls below the
/// scorer's baseline the other half goes to annealing, otherwise to more
/// climbing.
fn climb_then_settle<C, S>(
    ciphertext: &[u8],
    cipher: &C,
    scorer: &S,
    config: &AttackConfig,
    seed: u64,
) -> SearchResult<CipherKey<C>>
where
    C: Cipher,
    S: Scorer + ?Sized,
{
    let params = config.local_params(seed);
    let first = LocalSearchParams {
        max_iterations: params.max_iterations.div_ceil(2),
        max_restarts: params.max_restarts.div_ceil(2),
        ..params
    };
    let mut result = hill_climb(ciphertext, cipher, scorer, &first);
    let Some(rest) = remaining_params(&params, &result) else {
        return result;
    };

    let baseline = scorer.baseline(ciphertext.len());
    let more = if plateaued(&result, baseline, config.plateau_tolerance) {
        debug!(
            best = result.best().map(|c| c.score),
            baseline,
            evaluations_left = rest.max_iterations,
            restarts_left = rest.max_restarts,
            "hill climbing stalled, switching to annealing"
        );
        anneal(ciphertext, cipher, scorer, &rest, config.cooling_schedule)
    } else {
        hill_climb(ciphertext, cipher, scorer, &rest)
    };
    result.absorb(more, config.top_k);
    result
}

/// What a follow-up phase may still spend after `done`, numbering its runs
/// after the ones already made. `None` once either budget is used up.
fn remaining_params<K>(
    params: &LocalSearchParams,
    done: &SearchResult<K>,
) -> Option<LocalSearchParams> {
    let max_iterations = params.max_iterations.checked_sub(done.evaluations)?;
    let max_restarts = params.max_restarts.checked_sub(done.restarts)?;
    if max_iterations == 0 || max_restarts == 0 {
        return None;
    }
    Some(LocalSearchParams {
        max_iterations,
        max_restarts,
        first_run: params.first_run + done.restarts,
        ..*params
    })
}

/// True when the best score sits more than `tolerance * |baseline|` below
/// the baseline. Scorers without a baseline never plateau.
fn plateaued<K: Ord>(result: &SearchResult<K>, baseline: Option<f64>, tolerance: f64) -> bool {
    match (result.best(), baseline) {
        (Some(best), Some(baseline)) => best.score < baseline - tolerance * baseline.abs(),
        _ => false,
    }
}
