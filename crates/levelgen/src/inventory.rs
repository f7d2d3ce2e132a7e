//! Typed multiset of collectables with clamped subtraction and subset checks.

use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize};

use crate::types::CollectableType;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inventory {
    counts: [u32; CollectableType::COUNT],
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an inventory from `(type, count)` pairs; repeated types accumulate.
    pub fn from_counts(entries: impl IntoIterator<Item = (CollectableType, u32)>) -> Self {
        let mut inventory = Self::default();
        for (kind, count) in entries {
            inventory.counts[kind.index()] += count;
        }
        inventory
    }

    /// How many of `kind` are held; zero when none are.
    pub fn count(&self, kind: CollectableType) -> u32 {
        self.counts[kind.index()]
    }

    pub fn add_item(&mut self, kind: CollectableType) {
        self.counts[kind.index()] += 1;
    }

    /// True when every count here is at most the matching count in `other`.
    pub fn is_sub_inventory(&self, other: &Self) -> bool {
        self.counts.iter().zip(other.counts.iter()).all(|(mine, theirs)| mine <= theirs)
    }

    /// Number of distinct types with a positive count.
    pub fn dimension(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    pub fn types_required(&self) -> Vec<CollectableType> {
        CollectableType::ALL.into_iter().filter(|kind| self.count(*kind) != 0).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CollectableType, u32)> + '_ {
        CollectableType::ALL.into_iter().map(|kind| (kind, self.count(kind)))
    }
}

impl Sub for Inventory {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut counts = self.counts;
        for (count, taken) in counts.iter_mut().zip(rhs.counts) {
            *count = count.saturating_sub(taken);
        }
        Self { counts }
    }
}

impl Sub for &Inventory {
    type Output = Inventory;

    fn sub(self, rhs: Self) -> Inventory {
        *self - *rhs
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "nothing");
        }
        let mut first = true;
        for (kind, count) in self.iter().filter(|(_, count)| *count > 0) {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{count}x {kind:?}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn arb_inventory() -> impl Strategy<Value = Inventory> {
        prop::array::uniform6(0_u32..6).prop_map(|counts| Inventory { counts })
    }

    #[test]
    fn subtraction_clamps_at_zero() {
        let a = Inventory::from_counts([(CollectableType::Ruby, 1)]);
        let b = Inventory::from_counts([(CollectableType::Ruby, 3), (CollectableType::Coal, 2)]);
        let diff = a - b;
        assert!(diff.is_empty());
        assert_eq!((b - a).count(CollectableType::Ruby), 2);
        assert_eq!((b - a).count(CollectableType::Coal), 2);
    }

    #[test]
    fn dimension_and_types_required_ignore_zero_counts() {
        let mut inventory = Inventory::new();
        inventory.add_item(CollectableType::Seashell);
        inventory.add_item(CollectableType::Seashell);
        inventory.add_item(CollectableType::Diamond);
        assert_eq!(inventory.dimension(), 2);
        assert_eq!(
            inventory.types_required(),
            vec![CollectableType::Diamond, CollectableType::Seashell]
        );
        assert_eq!(inventory.to_string(), "1x Diamond, 2x Seashell");
        assert_eq!(Inventory::new().to_string(), "nothing");
    }

    proptest! {
        #[test]
        fn inventory_is_a_sub_inventory_of_itself(a in arb_inventory()) {
            prop_assert!(a.is_sub_inventory(&a));
            prop_assert!((a - a).is_empty());
        }

        #[test]
        fn removing_a_sub_inventory_leaves_the_exact_remainder(
            a in arb_inventory(),
            extra in arb_inventory(),
        ) {
            let mut b = a;
            for (kind, count) in extra.iter() {
                for _ in 0..count {
                    b.add_item(kind);
                }
            }
            prop_assert!(a.is_sub_inventory(&b));
            let remainder = b - a;
            for kind in CollectableType::ALL {
                prop_assert_eq!(remainder.count(kind), b.count(kind) - a.count(kind));
            }
        }
    }
}
