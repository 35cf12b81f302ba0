//! Quiz session selection: one unseen question, drawn uniformly at random.
//!
//! The selector holds no state between calls. The caller carries the set of
//! already-asked ids and passes in both the pool snapshot and the random source.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::domain::{Question, QuizScope};

#[derive(Debug, PartialEq, Eq)]
pub enum Selection<'a> {
    Next(&'a Question),
    /// No eligible question left for this scope.
    Exhausted,
}

/// Questions in `scope` whose id is not in `previous`, in snapshot order.
pub fn quiz_pool<'a>(
    snapshot: &'a [Question],
    scope: QuizScope,
    previous: &HashSet<i64>,
) -> Vec<&'a Question> {
    snapshot
        .iter()
        .filter(|q| scope.includes(q) && !previous.contains(&q.id))
        .collect()
}

pub fn next_question<'a, R: Rng + ?Sized>(
    snapshot: &'a [Question],
    scope: QuizScope,
    previous: &HashSet<i64>,
    rng: &mut R,
) -> Selection<'a> {
    let pool = quiz_pool(snapshot, scope, previous);
    debug!(target: "quiz", ?scope, pool = pool.len(), excluded = previous.len(), "Resolved quiz pool");
    match pool.choose(rng) {
        Some(q) => Selection::Next(*q),
        None => Selection::Exhausted,
    }
}
