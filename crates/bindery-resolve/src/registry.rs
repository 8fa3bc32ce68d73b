use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bindery_config::ResolutionConfig;
use bindery_types::{TypeDescriptor, TypeSystem};
use dashmap::DashMap;
use serde::Serialize;

use crate::ambiguity::{handler_for, AmbiguityHandler};
use crate::attributes::selects_attributes;
use crate::reduce::{reduce, Reduction};
use crate::{
    AssignabilityEngine, Attribute, Candidate, CandidateId, CandidateSpec, InvalidTypeError,
    ResolveError, SelectionCriteria,
};

const TARGET: &str = "bindery.registry";

/// Memoized selection result: the matching candidates in registry order.
pub type Selection = Arc<[Arc<Candidate>]>;

/// Counters for the two memo maps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub selection_hits: u64,
    pub selection_misses: u64,
    pub resolution_hits: u64,
    pub resolution_misses: u64,
    /// Entries currently held in the selection memo.
    pub selections: usize,
    /// Entries currently held in the resolution memo.
    pub resolutions: usize,
}

#[derive(Debug, Default)]
struct Counters {
    selection_hits: AtomicU64,
    selection_misses: AtomicU64,
    resolution_hits: AtomicU64,
    resolution_misses: AtomicU64,
}

/// The candidate pool plus concurrent memo maps for selection and resolution.
///
/// The registry is `Sync`: `select`/`resolve` may be called from any number of threads. Two
/// threads racing on the same unseen criteria may both compute the result; the first insert wins
/// and both observe the stored value.
pub struct CandidateRegistry {
    engine: AssignabilityEngine,
    candidates: Vec<Arc<Candidate>>,
    config: ResolutionConfig,
    selections: DashMap<SelectionCriteria, Selection>,
    /// Reducer outcomes; keys are always present in `selections`.
    resolutions: DashMap<SelectionCriteria, Reduction>,
    counters: Counters,
}

impl CandidateRegistry {
    pub fn new(
        types: Arc<dyn TypeSystem>,
        candidates: impl IntoIterator<Item = Candidate>,
    ) -> Self {
        Self::with_config(types, candidates, &ResolutionConfig::default())
    }

    pub fn with_config(
        types: Arc<dyn TypeSystem>,
        candidates: impl IntoIterator<Item = Candidate>,
        config: &ResolutionConfig,
    ) -> Self {
        let engine =
            AssignabilityEngine::new(types).with_max_depth(config.effective_max_type_depth());
        let candidates: Vec<Arc<Candidate>> = candidates.into_iter().map(Arc::new).collect();
        tracing::debug!(
            target: TARGET,
            candidates = candidates.len(),
            ambiguity = ?config.ambiguity,
            max_type_depth = engine.max_depth(),
            "registry created"
        );
        Self {
            engine,
            candidates,
            config: config.clone(),
            selections: DashMap::new(),
            resolutions: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Build every candidate's type closure with `types`, then create the registry.
    pub fn from_specs(
        types: Arc<dyn TypeSystem>,
        specs: impl IntoIterator<Item = CandidateSpec>,
        config: &ResolutionConfig,
    ) -> Result<Self, InvalidTypeError> {
        let candidates = specs
            .into_iter()
            .map(|spec| spec.build(types.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_config(types, candidates, config))
    }

    pub fn engine(&self) -> &AssignabilityEngine {
        &self.engine
    }

    pub fn types(&self) -> &Arc<dyn TypeSystem> {
        self.engine.types_arc()
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    pub fn candidates(&self) -> &[Arc<Candidate>] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, id: &CandidateId) -> Option<&Arc<Candidate>> {
        self.candidates.iter().find(|candidate| &candidate.id == id)
    }

    /// Criteria for `ty` using the configured boxing policy.
    pub fn criteria(
        &self,
        ty: TypeDescriptor,
        attributes: impl IntoIterator<Item = Attribute>,
    ) -> Result<SelectionCriteria, InvalidTypeError> {
        SelectionCriteria::new(ty, attributes, self.config.box_primitives)
    }

    /// Whether `candidate` satisfies `criteria`: its attributes match and some type in its
    /// closure matches the required type.
    pub fn selects(
        &self,
        criteria: &SelectionCriteria,
        candidate: &Candidate,
    ) -> Result<bool, InvalidTypeError> {
        if !selects_attributes(criteria.attributes(), &candidate.attributes) {
            return Ok(false);
        }
        for ty in &candidate.type_closure {
            if self.engine.matches(criteria.ty(), ty)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Every candidate satisfying `criteria`, in registry order. Memoized: later calls with
    /// equal criteria return the same allocation.
    pub fn select(&self, criteria: &SelectionCriteria) -> Result<Selection, InvalidTypeError> {
        if let Some(hit) = self.selections.get(criteria) {
            self.counters.selection_hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(target: TARGET, criteria = %criteria, "selection memo hit");
            return Ok(hit.value().clone());
        }
        self.counters
            .selection_misses
            .fetch_add(1, Ordering::Relaxed);

        let mut matched = Vec::new();
        for candidate in &self.candidates {
            if self.selects(criteria, candidate)? {
                matched.push(candidate.clone());
            }
        }
        tracing::debug!(
            target: TARGET,
            criteria = %criteria,
            matched = matched.len(),
            "selection computed"
        );

        let computed: Selection = matched.into();
        let stored = self
            .selections
            .entry(criteria.clone())
            .or_insert(computed)
            .value()
            .clone();
        Ok(stored)
    }

    /// The selection ordered for "inject all" consumers: alternates first, then by rank
    /// (highest first), then registry order.
    pub fn list(
        &self,
        criteria: &SelectionCriteria,
    ) -> Result<Vec<Arc<Candidate>>, InvalidTypeError> {
        let mut listed = self.select(criteria)?.to_vec();
        // Stable sort keeps registry order among equals.
        listed.sort_by(|a, b| {
            b.is_alternate
                .cmp(&a.is_alternate)
                .then_with(|| b.rank.cmp(&a.rank))
        });
        Ok(listed)
    }

    /// The memoized reduction of [`CandidateRegistry::select`] for `criteria`.
    pub fn reduction(&self, criteria: &SelectionCriteria) -> Result<Reduction, InvalidTypeError> {
        if let Some(hit) = self.resolutions.get(criteria) {
            self.counters.resolution_hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(target: TARGET, criteria = %criteria, "resolution memo hit");
            return Ok(hit.value().clone());
        }
        self.counters
            .resolution_misses
            .fetch_add(1, Ordering::Relaxed);

        let selection = self.select(criteria)?;
        let computed = reduce(selection.iter());
        tracing::debug!(
            target: TARGET,
            criteria = %criteria,
            outcome = outcome_label(&computed),
            "resolution computed"
        );

        let stored = self
            .resolutions
            .entry(criteria.clone())
            .or_insert(computed)
            .value()
            .clone();
        Ok(stored)
    }

    /// Resolve `criteria` to a single candidate, handling ties per the configured
    /// [`AmbiguityMode`](bindery_config::AmbiguityMode).
    pub fn resolve(
        &self,
        criteria: &SelectionCriteria,
    ) -> Result<Option<Arc<Candidate>>, ResolveError> {
        self.resolve_with(criteria, handler_for(self.config.ambiguity))
    }

    /// Like [`CandidateRegistry::resolve`] with an explicit ambiguity handler.
    ///
    /// Zero matches is always [`ResolveError::Unsatisfied`].
    pub fn resolve_with<H>(
        &self,
        criteria: &SelectionCriteria,
        handler: &H,
    ) -> Result<Option<Arc<Candidate>>, ResolveError>
    where
        H: AmbiguityHandler + ?Sized,
    {
        match self.reduction(criteria)? {
            Reduction::Resolved(candidate) => Ok(Some(candidate)),
            Reduction::Unsatisfied => Err(ResolveError::Unsatisfied {
                criteria: criteria.clone(),
            }),
            Reduction::Ambiguous(tied) => {
                tracing::debug!(
                    target: TARGET,
                    criteria = %criteria,
                    tied = tied.len(),
                    "ambiguous resolution"
                );
                handler.on_ambiguous(criteria, &tied)
            }
        }
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            selection_hits: self.counters.selection_hits.load(Ordering::Relaxed),
            selection_misses: self.counters.selection_misses.load(Ordering::Relaxed),
            resolution_hits: self.counters.resolution_hits.load(Ordering::Relaxed),
            resolution_misses: self.counters.resolution_misses.load(Ordering::Relaxed),
            selections: self.selections.len(),
            resolutions: self.resolutions.len(),
        }
    }

    /// Drop both memo maps. Counters are kept.
    pub fn clear_caches(&mut self) {
        self.resolutions.clear();
        self.selections.clear();
        tracing::debug!(target: TARGET, "memo caches cleared");
    }
}

fn outcome_label(reduction: &Reduction) -> &'static str {
    match reduction {
        Reduction::Unsatisfied => "unsatisfied",
        Reduction::Resolved(_) => "resolved",
        Reduction::Ambiguous(_) => "ambiguous",
    }
}
