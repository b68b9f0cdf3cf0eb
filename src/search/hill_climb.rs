// Greedy local search with random restarts.

use crate::{
    cipher::{Cipher, CipherKey},
    scorer::Scorer,
    search::{
        local::{self, Acceptance},
        Evaluator, LocalSearchParams, SearchResult, Strategy,
    },
};

/// Climb from `params.max_restarts` random keys, moving to a neighbour only
/// when it scores strictly higher.
pub fn hill_climb<C, S>(
    ciphertext: &[u8],
    cipher: &C,
    scorer: &S,
    params: &LocalSearchParams,
) -> SearchResult<CipherKey<C>>
where
    C: Cipher,
    S: Scorer + ?Sized,
{
    let eval = Evaluator::new(cipher, ciphertext, scorer);
    local::restart_search(&eval, params, Acceptance::Greedy, Strategy::HillClimb)
}
