//! Filters and orderings over annotation views.
//!
//! Every function takes a borrowed view and returns a new one; the underlying
//! [`Annotations`](crate::annotation::Annotations) are never reordered. Sorts
//! are stable so equal keys keep their extraction order.

use std::cmp::Ordering;

use crate::annotation::{Annotation, PartialDate};

pub mod collation;

pub use collation::{collator_for, CaseInsensitive, Collator, Russian, DEFAULT_LOCALE};

pub type View<'a> = Vec<&'a Annotation>;

pub fn important<'a>(view: &[&'a Annotation]) -> View<'a> {
    view.iter()
        .copied()
        .filter(|annotation| annotation.importance() > 0)
        .collect()
}

/// Case-insensitive exact match on the owner. Records without one never match.
pub fn by_user<'a>(view: &[&'a Annotation], user: &str) -> View<'a> {
    let wanted = user.to_lowercase();
    view.iter()
        .copied()
        .filter(|annotation| {
            annotation
                .user()
                .is_some_and(|owner| owner.to_lowercase() == wanted)
        })
        .collect()
}

/// Records dated strictly after `threshold`. Undated records never match.
pub fn after_date<'a>(view: &[&'a Annotation], threshold: &PartialDate) -> View<'a> {
    view.iter()
        .copied()
        .filter(|annotation| {
            annotation
                .date()
                .is_some_and(|date| date.value() > threshold.value())
        })
        .collect()
}

/// Most emphasised first.
pub fn sort_by_importance<'a>(view: &[&'a Annotation]) -> View<'a> {
    let mut sorted = view.to_vec();
    sorted.sort_by(|a, b| b.importance().cmp(&a.importance()));
    sorted
}

/// Owners in collation order, records without an owner last.
pub fn sort_by_user<'a>(view: &[&'a Annotation], collator: &dyn Collator) -> View<'a> {
    let mut sorted = view.to_vec();
    sorted.sort_by(|a, b| absent_last(a.user(), b.user(), |x, y| collator.compare(x, y)));
    sorted
}

/// Newest first, undated records last.
pub fn sort_by_date<'a>(view: &[&'a Annotation]) -> View<'a> {
    let mut sorted = view.to_vec();
    sorted.sort_by(|a, b| absent_last(a.date(), b.date(), |x, y| y.value().cmp(&x.value())));
    sorted
}

fn absent_last<T>(a: Option<T>, b: Option<T>, present: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => present(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
