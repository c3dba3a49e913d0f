//! Single-column sorting.
//!
//! Values are compared through their string projection, collated in the
//! Unicode root order so accented text sorts next to its base letters. With
//! the default [`Comparator::Lexical`] numeric and date columns compare as
//! strings, so `"9"` sorts after `"10"`; [`Comparator::Numeric`] is the
//! opt-in alternative that compares parseable numbers by value.

use std::cmp::Ordering;

use feruca::Collator;

use crate::entity::{Entity, SortField};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// The active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: SortField> SortState<F> {
    pub fn ascending(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    /// Header-click semantics: clicking the active column flips direction;
    /// clicking another column starts ascending on it.
    pub fn toggle(current: Option<Self>, field: F) -> Self {
        match current {
            Some(state) if state.field == field => Self {
                field,
                direction: state.direction.flipped(),
            },
            _ => Self::ascending(field),
        }
    }
}

/// How two projected values are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Comparator {
    /// Collated comparison of the lower-cased projections.
    #[default]
    Lexical,
    /// Numeric comparison when both projections parse as numbers, lexical
    /// otherwise.
    Numeric,
}

impl Comparator {
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        self.compare_folded(&mut Collator::default(), &a.to_lowercase(), &b.to_lowercase())
    }

    /// Compare two already lower-cased projections.
    fn compare_folded(self, collator: &mut Collator, a: &str, b: &str) -> Ordering {
        if self == Self::Numeric {
            if let (Ok(x), Ok(y)) = (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
                if let Some(ordering) = x.partial_cmp(&y) {
                    return ordering;
                }
            }
        }
        collator.collate(a, b)
    }
}

/// Stable sort of `records` by the projected column. Ties keep their input
/// order in both directions.
pub fn sort_records<T: Entity>(
    records: &mut [&T],
    state: SortState<T::SortField>,
    comparator: Comparator,
) {
    let mut keyed: Vec<(String, &T)> = records
        .iter()
        .map(|r| (r.sort_value(state.field).to_lowercase(), *r))
        .collect();

    let mut collator = Collator::default();
    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = comparator.compare_folded(&mut collator, a, b);
        match state.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    for (slot, (_, record)) in records.iter_mut().zip(keyed) {
        *slot = record;
    }
}
