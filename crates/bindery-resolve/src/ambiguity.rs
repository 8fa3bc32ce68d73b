use std::sync::Arc;

use bindery_config::AmbiguityMode;

use crate::{Candidate, ResolveError, SelectionCriteria};

/// Decides what `resolve` returns when several candidates tie.
pub trait AmbiguityHandler {
    /// `tied` holds the full tie set in registry order. Returning `Ok(Some(_))` substitutes a
    /// fallback candidate, `Ok(None)` resolves to nothing.
    fn on_ambiguous(
        &self,
        criteria: &SelectionCriteria,
        tied: &[Arc<Candidate>],
    ) -> Result<Option<Arc<Candidate>>, ResolveError>;
}

/// Report [`ResolveError::Ambiguous`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FailOnAmbiguity;

impl AmbiguityHandler for FailOnAmbiguity {
    fn on_ambiguous(
        &self,
        criteria: &SelectionCriteria,
        tied: &[Arc<Candidate>],
    ) -> Result<Option<Arc<Candidate>>, ResolveError> {
        Err(ResolveError::Ambiguous {
            criteria: criteria.clone(),
            candidates: tied.iter().map(|candidate| candidate.id.clone()).collect(),
        })
    }
}

/// Resolve ambiguous criteria to no candidate.
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreAmbiguity;

impl AmbiguityHandler for IgnoreAmbiguity {
    fn on_ambiguous(
        &self,
        _criteria: &SelectionCriteria,
        _tied: &[Arc<Candidate>],
    ) -> Result<Option<Arc<Candidate>>, ResolveError> {
        Ok(None)
    }
}

impl<F> AmbiguityHandler for F
where
    F: Fn(&SelectionCriteria, &[Arc<Candidate>]) -> Result<Option<Arc<Candidate>>, ResolveError>,
{
    fn on_ambiguous(
        &self,
        criteria: &SelectionCriteria,
        tied: &[Arc<Candidate>],
    ) -> Result<Option<Arc<Candidate>>, ResolveError> {
        self(criteria, tied)
    }
}

/// The built-in handler for a configured [`AmbiguityMode`].
pub fn handler_for(mode: AmbiguityMode) -> &'static dyn AmbiguityHandler {
    match mode {
        AmbiguityMode::Fail => &FailOnAmbiguity,
        AmbiguityMode::Ignore => &IgnoreAmbiguity,
    }
}
