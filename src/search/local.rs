// Restart driver shared by hill climbing and simulated annealing.
//
// Runs are numbered from zero and each draws from its own generator seeded
// from the base seed and the run number, so a run explores the same keys no
// matter which thread executes it. Runs execute in fixed-size batches; the
// per-run evaluation cap of a batch depends only on the budget left when the
// batch starts, which keeps results independent of the thread count.

use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

use crate::{
    cipher::{Cipher, CipherKey, KeySpace},
    scorer::Scorer,
    search::{annealing::CoolingSchedule, Evaluator, LocalSearchParams, SearchResult, Strategy, TopK},
};

const RUN_BATCH: u64 = 32;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Acceptance {
    /// Move only to strictly better keys.
    Greedy,
    /// Metropolis criterion at the schedule's temperature.
    Metropolis(CoolingSchedule),
}

struct RunOutcome<K> {
    top: TopK<K>,
    iterations: u64,
    evaluations: u64,
}

pub(crate) fn run_rng(seed: u64, run: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ run.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

pub(crate) fn restart_search<C, S>(
    eval: &Evaluator<'_, C, S>,
    params: &LocalSearchParams,
    acceptance: Acceptance,
    strategy: Strategy,
) -> SearchResult<CipherKey<C>>
where
    C: Cipher,
    S: Scorer + ?Sized,
{
    let mut top = TopK::new(params.top_k);
    let mut runs = 0u64;
    let mut iterations = 0u64;
    let mut evaluations = 0u64;

    while runs < params.max_restarts && evaluations < params.max_iterations {
        let remaining = params.max_iterations - evaluations;
        let batch = (params.max_restarts - runs).min(RUN_BATCH).min(remaining);
        // One evaluation for the starting key, the rest for moves.
        let moves = (remaining / batch).min(params.run_iterations.saturating_add(1)) - 1;

        let outcomes: Vec<RunOutcome<CipherKey<C>>> = (0..batch)
            .into_par_iter()
            .map(|offset| {
                let mut rng = run_rng(params.seed, params.first_run + runs + offset);
                run(eval, params, acceptance, moves, &mut rng)
            })
            .collect();

        for outcome in outcomes {
            iterations += outcome.iterations;
            evaluations += outcome.evaluations;
            top.merge(outcome.top);
        }
        runs += batch;
        tracing::trace!(runs, evaluations, "finished batch of local search runs");
    }

    SearchResult {
        candidates: top.into_sorted_vec(),
        strategy,
        iterations,
        evaluations,
        restarts: runs,
        seed: Some(params.seed),
    }
}

fn run<C, S>(
    eval: &Evaluator<'_, C, S>,
    params: &LocalSearchParams,
    acceptance: Acceptance,
    max_moves: u64,
    rng: &mut StdRng,
) -> RunOutcome<CipherKey<C>>
where
    C: Cipher,
    S: Scorer + ?Sized,
{
    let space = eval.cipher().key_space();
    let mut top = TopK::new(params.top_k);

    let mut current = eval.evaluate(space.random_key(rng));
    let mut best = current.score;
    top.offer(current.clone());

    let mut iterations = 0;
    let mut stale = 0;
    while iterations < max_moves && stale < params.patience {
        iterations += 1;
        let next = eval.evaluate(space.neighbor(&current.key, rng));

        if next.score > best {
            best = next.score;
            stale = 0;
            top.offer(next.clone());
        } else {
            stale += 1;
        }

        let accept = match acceptance {
            Acceptance::Greedy => next.score > current.score,
            Acceptance::Metropolis(schedule) => {
                metropolis(next.score, current.score, schedule.temperature(iterations), rng)
            }
        };
        if accept {
            current = next;
        }
    }

    RunOutcome {
        top,
        iterations,
        evaluations: iterations + 1,
    }
}

/// Always take a move that is no worse; take a worse one with probability
/// `exp(-delta / temperature)`.
fn metropolis(candidate: f64, current: f64, temperature: f64, rng: &mut StdRng) -> bool {
    if candidate == f64::NEG_INFINITY {
        return false;
    }
    if candidate >= current {
        return true;
    }
    let delta = current - candidate;
    rng.gen::<f64>() < (-delta / temperature).exp()
}
