use std::collections::BTreeMap;

use crate::container::{Bag, Capabilities, Collection, RemovingCursor};

/// A bag backed by a map of occurrence counts.
///
/// `add_copies` returns `reports_added`, whatever actually happened, to reproduce bags that
/// misreport their changes.
#[derive(Debug, Clone)]
pub struct CountingBag<T: Ord> {
    counts: BTreeMap<T, usize>,
    reports_added: bool,
}

impl<T: Ord> CountingBag<T> {
    pub fn new() -> Self {
        Self::reporting(true)
    }

    pub fn reporting(reports_added: bool) -> Self {
        CountingBag {
            counts: BTreeMap::new(),
            reports_added,
        }
    }
}

struct BagCursor<'a, T: Ord> {
    bag: &'a mut CountingBag<T>,
    items: Vec<T>,
    next: usize,
    current: Option<usize>,
}

impl<T: Ord + Clone> RemovingCursor<T> for BagCursor<'_, T> {
    fn next(&mut self) -> Option<&T> {
        let index = self.next;
        let value = self.items.get(index)?;
        self.current = Some(index);
        self.next += 1;
        Some(value)
    }

    fn remove(&mut self) -> Option<T> {
        let index = self.current.take()?;
        self.bag.remove_value(&self.items[index])
    }
}

impl<T: Ord + Clone> Collection<T> for CountingBag<T> {
    const CAPABILITIES: Capabilities = Capabilities::COLLECTION.union(Capabilities::BAG);

    fn len(&self) -> usize {
        self.counts.values().sum()
    }

    fn contains(&self, value: &T) -> bool {
        self.counts.contains_key(value)
    }

    fn add(&mut self, value: T) -> bool {
        *self.counts.entry(value).or_insert(0) += 1;
        true
    }

    fn remove_value(&mut self, value: &T) -> Option<T> {
        let count = self.counts.get_mut(value)?;
        *count -= 1;
        if *count == 0 {
            return self.counts.remove_entry(value).map(|(key, _)| key);
        }
        Some(value.clone())
    }

    fn retain_values(&mut self, keep: &mut dyn FnMut(&T) -> bool) -> bool {
        let before = self.counts.len();
        self.counts.retain(|value, _| keep(value));
        self.counts.len() != before
    }

    fn clear(&mut self) {
        self.counts.clear();
    }

    fn cursor(&mut self) -> Box<dyn RemovingCursor<T> + '_> {
        let items = self
            .counts
            .iter()
            .flat_map(|(value, count)| std::iter::repeat(value.clone()).take(*count))
            .collect();
        Box::new(BagCursor {
            bag: self,
            items,
            next: 0,
            current: None,
        })
    }
}

impl<T: Ord + Clone> Bag<T> for CountingBag<T> {
    fn count(&self, value: &T) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    fn add_copies(&mut self, value: T, copies: u32) -> bool {
        if copies > 0 {
            *self.counts.entry(value).or_insert(0) += copies as usize;
        }
        self.reports_added
    }

    fn remove_copies(&mut self, value: &T, copies: u32) -> bool {
        let Some(count) = self.counts.get_mut(value) else {
            return false;
        };
        *count = count.saturating_sub(copies as usize);
        if *count == 0 {
            self.counts.remove(value);
        }
        copies > 0
    }
}
