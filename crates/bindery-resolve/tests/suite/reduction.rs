use std::sync::Arc;

use bindery_resolve::{reduce, Candidate, Reducer, Reduction};
use bindery_types::TypeDescriptor;

use super::support::ids;

fn candidate(id: &str) -> Candidate {
    Candidate::new(id, vec![TypeDescriptor::object()])
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}

/// Every ordering of `items`.
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for idx in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(idx);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

#[test]
fn alternate_beats_ordinary_candidate() {
    let plain = Arc::new(candidate("plain"));
    let alt = Arc::new(candidate("alt").alternate(5));

    let reduction = reduce([&plain, &alt]);
    assert_eq!(ids(&reduction), vec!["alt"]);
    assert!(Arc::ptr_eq(reduction.resolved().unwrap(), &alt));
}

#[test]
fn low_ranked_alternate_beats_high_ranked_ordinary() {
    let plain = Arc::new(candidate("plain").with_rank(1_000));
    let alt = Arc::new(candidate("alt").alternate(-5));
    assert_eq!(ids(&reduce([&plain, &alt])), vec!["alt"]);
}

#[test]
fn higher_ranked_alternate_wins() {
    let low = Arc::new(candidate("low").alternate(1));
    let high = Arc::new(candidate("high").alternate(9));
    assert_eq!(ids(&reduce([&low, &high])), vec!["high"]);
    assert_eq!(ids(&reduce([&high, &low])), vec!["high"]);
}

#[test]
fn equally_ranked_alternates_are_ambiguous() {
    let first = Arc::new(candidate("first").alternate(5));
    let second = Arc::new(candidate("second").alternate(5));
    let plain = Arc::new(candidate("plain"));

    let reduction = reduce([&first, &plain, &second]);
    assert!(matches!(reduction, Reduction::Ambiguous(_)));
    assert_eq!(ids(&reduction), vec!["first", "second"]);
}

#[test]
fn ordinary_ties_are_discarded_once_an_alternate_appears() {
    let a = Arc::new(candidate("a"));
    let b = Arc::new(candidate("b"));
    let alt = Arc::new(candidate("alt").alternate(0));

    assert_eq!(ids(&reduce([&a, &b])), vec!["a", "b"]);
    assert_eq!(ids(&reduce([&a, &b, &alt])), vec!["alt"]);
    assert_eq!(ids(&reduce([&alt, &a, &b])), vec!["alt"]);
}

#[test]
fn defaults_lose_to_any_non_default_candidate() {
    let fallback = Arc::new(candidate("fallback").as_default().alternate(100));
    let plain = Arc::new(candidate("plain"));

    assert_eq!(ids(&reduce([&fallback, &plain])), vec!["plain"]);
    assert_eq!(ids(&reduce([&fallback])), vec!["fallback"]);

    let other = Arc::new(candidate("other").as_default().alternate(100));
    assert_eq!(ids(&reduce([&fallback, &other])), vec!["fallback", "other"]);
}

#[test]
fn outcome_does_not_depend_on_input_order() {
    let pool: Vec<Arc<Candidate>> = vec![
        Arc::new(candidate("plain-1").with_rank(3)),
        Arc::new(candidate("plain-2")),
        Arc::new(candidate("alt-3").alternate(3)),
        Arc::new(candidate("alt-7a").alternate(7)),
        Arc::new(candidate("alt-7b").alternate(7)),
        Arc::new(candidate("default").as_default().alternate(9)),
    ];

    let expected = vec!["alt-7a".to_string(), "alt-7b".to_string()];
    for order in permutations(&pool) {
        assert_eq!(sorted(ids(&reduce(&order))), expected);
    }
}

#[test]
fn partial_reducers_merge() {
    let pool: Vec<Arc<Candidate>> = vec![
        Arc::new(candidate("a")),
        Arc::new(candidate("b").alternate(2)),
        Arc::new(candidate("c")),
        Arc::new(candidate("d").alternate(1)),
    ];

    let mut left = Reducer::new();
    left.extend(pool[..2].iter().cloned());
    let right: Reducer = pool[2..].iter().cloned().collect();

    assert_eq!(left.merge(right).finish(), reduce(&pool));
    assert_eq!(ids(&reduce(&pool)), vec!["b"]);
}

#[test]
fn empty_selection_is_unsatisfied() {
    let nothing: Vec<Arc<Candidate>> = Vec::new();
    assert_eq!(reduce(&nothing), Reduction::Unsatisfied);
    assert_eq!(Reducer::new().finish(), Reduction::Unsatisfied);
}
