//! Alternate/priority reduction of a selection to a single candidate.
//!
//! Every candidate falls into a tier ordered by: non-default over default, alternate over
//! ordinary, then (for alternates only) higher rank. The reduction keeps every member of the
//! highest tier it has seen; two members in the same tier can never be told apart, so more than one
//! survivor is an ambiguity. Because "keep the maximum tier" is associative and commutative, the
//! outcome does not depend on input order, and partial reductions can be merged.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::Candidate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Tier {
    non_default: bool,
    alternate: bool,
    /// Ordinary candidates never compare by rank.
    rank: i64,
}

impl Tier {
    fn of(candidate: &Candidate) -> Self {
        Self {
            non_default: !candidate.is_default,
            alternate: candidate.is_alternate,
            rank: if candidate.is_alternate {
                i64::from(candidate.rank)
            } else {
                0
            },
        }
    }
}

/// Outcome of reducing a selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reduction {
    Unsatisfied,
    Resolved(Arc<Candidate>),
    /// Two or more candidates tied in the best tier.
    Ambiguous(Vec<Arc<Candidate>>),
}

impl Reduction {
    pub fn resolved(&self) -> Option<&Arc<Candidate>> {
        match self {
            Reduction::Resolved(candidate) => Some(candidate),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
enum State {
    #[default]
    Empty,
    Single(Tier, Arc<Candidate>),
    Tied(Tier, Vec<Arc<Candidate>>),
}

/// Incremental reducer; feed candidates with [`Reducer::push`] or combine partial reducers with
/// [`Reducer::merge`].
#[derive(Clone, Debug, Default)]
pub struct Reducer {
    state: State,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: Arc<Candidate>) {
        let tier = Tier::of(&candidate);
        let state = std::mem::take(&mut self.state);
        self.state = combine(state, State::Single(tier, candidate));
    }

    pub fn merge(mut self, other: Reducer) -> Reducer {
        let state = std::mem::take(&mut self.state);
        self.state = combine(state, other.state);
        self
    }

    pub fn finish(self) -> Reduction {
        match self.state {
            State::Empty => Reduction::Unsatisfied,
            State::Single(_, candidate) => Reduction::Resolved(candidate),
            State::Tied(_, candidates) => Reduction::Ambiguous(candidates),
        }
    }
}

impl Extend<Arc<Candidate>> for Reducer {
    fn extend<I: IntoIterator<Item = Arc<Candidate>>>(&mut self, iter: I) {
        for candidate in iter {
            self.push(candidate);
        }
    }
}

impl FromIterator<Arc<Candidate>> for Reducer {
    fn from_iter<I: IntoIterator<Item = Arc<Candidate>>>(iter: I) -> Self {
        let mut reducer = Reducer::new();
        reducer.extend(iter);
        reducer
    }
}

/// Reduce `candidates` (in registry order) to a single outcome.
pub fn reduce<'a>(candidates: impl IntoIterator<Item = &'a Arc<Candidate>>) -> Reduction {
    candidates.into_iter().cloned().collect::<Reducer>().finish()
}

fn combine(left: State, right: State) -> State {
    let (left_tier, left_members) = match left {
        State::Empty => return right,
        State::Single(tier, candidate) => (tier, vec![candidate]),
        State::Tied(tier, candidates) => (tier, candidates),
    };
    let (right_tier, right_members) = match right {
        State::Empty => return rebuild(left_tier, left_members),
        State::Single(tier, candidate) => (tier, vec![candidate]),
        State::Tied(tier, candidates) => (tier, candidates),
    };

    match left_tier.cmp(&right_tier) {
        Ordering::Greater => rebuild(left_tier, left_members),
        Ordering::Less => rebuild(right_tier, right_members),
        Ordering::Equal => {
            let mut members = left_members;
            members.extend(right_members);
            rebuild(left_tier, members)
        }
    }
}

fn rebuild(tier: Tier, mut members: Vec<Arc<Candidate>>) -> State {
    match members.len() {
        0 => State::Empty,
        1 => match members.pop() {
            Some(candidate) => State::Single(tier, candidate),
            None => State::Empty,
        },
        _ => State::Tied(tier, members),
    }
}
