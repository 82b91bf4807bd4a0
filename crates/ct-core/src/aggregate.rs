//! Aggregated results: an ordered list of items and their derived total.

use crate::time::TimeSpent;

/// Anything that carries an amount of tracked time.
pub trait Tracked {
    /// Time attributed to this item.
    fn time_spent(&self) -> TimeSpent;
}

/// Items retained for a day, in the order the source returned them.
///
/// The total is always recomputed from the items rather than stored, so it
/// cannot drift from the individual durations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate<T> {
    items: Vec<T>,
}

impl<T> Default for Aggregate<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Tracked> Aggregate<T> {
    /// Wraps already-filtered items.
    #[must_use]
    pub const fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// The retained items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Sum of every item's time.
    pub fn total(&self) -> TimeSpent {
        self.items.iter().map(Tracked::time_spent).sum()
    }

    /// Number of retained items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no item was retained.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Tracked> FromIterator<T> for Aggregate<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(i64);

    impl Tracked for Fixed {
        fn time_spent(&self) -> TimeSpent {
            TimeSpent::from_seconds(self.0)
        }
    }

    #[test]
    fn total_is_sum_of_items() {
        let aggregate: Aggregate<Fixed> = [Fixed(60), Fixed(1800), Fixed(5)].into_iter().collect();
        assert_eq!(aggregate.total().total_seconds(), 1865);
        assert_eq!(aggregate.len(), 3);
    }

    #[test]
    fn empty_total_is_zero() {
        let aggregate = Aggregate::<Fixed>::default();
        assert!(aggregate.is_empty());
        assert_eq!(aggregate.total(), TimeSpent::ZERO);
    }
}
