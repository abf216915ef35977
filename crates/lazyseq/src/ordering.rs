//! Chained key comparators.
//!
//! A chain is a singly-linked list of links. Each link extracts a key,
//! compares keys with its own comparator and direction, and defers to the
//! next link only when its keys are equal.

use core::cmp::Ordering;
use core::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// Compares two buffer positions of an already-keyed buffer.
pub trait IndexComparer {
    fn compare(&self, a: usize, b: usize) -> Ordering;
}

trait ChainLink<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;

    fn bind(&self, items: &[T]) -> Box<dyn IndexComparer>;

    fn depth(&self) -> usize;
}

struct KeyLink<T, K> {
    selector: Rc<dyn Fn(&T) -> K>,
    comparer: Rc<dyn Fn(&K, &K) -> Ordering>,
    direction: Direction,
    next: Option<Rc<dyn ChainLink<T>>>,
}

impl<T: 'static, K: 'static> ChainLink<T> for KeyLink<T, K> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        let ordering = (self.comparer)(&(self.selector)(a), &(self.selector)(b));
        match (ordering, &self.next) {
            (Ordering::Equal, Some(next)) => next.compare(a, b),
            _ => self.direction.apply(ordering),
        }
    }

    fn bind(&self, items: &[T]) -> Box<dyn IndexComparer> {
        let keys: Vec<K> = items.iter().map(|item| (self.selector)(item)).collect();
        Box::new(BoundLink {
            keys,
            comparer: Rc::clone(&self.comparer),
            direction: self.direction,
            next: self.next.as_ref().map(|next| next.bind(items)),
        })
    }

    fn depth(&self) -> usize {
        1 + self.next.as_ref().map_or(0, |next| next.depth())
    }
}

/// A link whose keys were extracted once for every buffered element.
struct BoundLink<K> {
    keys: Vec<K>,
    comparer: Rc<dyn Fn(&K, &K) -> Ordering>,
    direction: Direction,
    next: Option<Box<dyn IndexComparer>>,
}

impl<K> IndexComparer for BoundLink<K> {
    fn compare(&self, a: usize, b: usize) -> Ordering {
        let ordering = (self.comparer)(&self.keys[a], &self.keys[b]);
        if ordering != Ordering::Equal {
            return self.direction.apply(ordering);
        }
        match &self.next {
            Some(next) => next.compare(a, b),
            // Whole chain tied: original position decides, in both directions.
            None => a.cmp(&b),
        }
    }
}

/// Immutable chain of sort keys. Composing a key produces a new chain that
/// shares the old links.
pub struct KeyComparatorChain<T> {
    head: Rc<dyn ChainLink<T>>,
}

impl<T> Clone for KeyComparatorChain<T> {
    fn clone(&self) -> Self {
        Self { head: Rc::clone(&self.head) }
    }
}

impl<T> fmt::Debug for KeyComparatorChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyComparatorChain").field("links", &self.head.depth()).finish()
    }
}

impl<T: 'static> KeyComparatorChain<T> {
    /// Single-link chain ordering by the natural order of the extracted key.
    pub fn by_key<K, F>(selector: F, direction: Direction) -> Self
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        Self::by_key_with(selector, K::cmp, direction)
    }

    pub fn by_key_with<K, F, C>(selector: F, comparer: C, direction: Direction) -> Self
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: Fn(&K, &K) -> Ordering + 'static,
    {
        Self {
            head: Rc::new(KeyLink { selector: Rc::new(selector), comparer: Rc::new(comparer), direction, next: None }),
        }
    }

    /// New chain whose head is the given key; this chain becomes its
    /// tie-breaker. The most recently composed key is therefore compared
    /// first and the key the chain was created with is compared last.
    #[must_use]
    pub fn compose_with<K, F, C>(&self, selector: F, comparer: C, direction: Direction) -> Self
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: Fn(&K, &K) -> Ordering + 'static,
    {
        Self {
            head: Rc::new(KeyLink {
                selector: Rc::new(selector),
                comparer: Rc::new(comparer),
                direction,
                next: Some(Rc::clone(&self.head)),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.head.depth()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Compares two elements through the chain. Elements tied on every key
    /// compare equal.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.head.compare(a, b)
    }

    /// Extracts every link's keys for `items` up front.
    pub fn bind(&self, items: &[T]) -> BoundChain {
        BoundChain { head: self.head.bind(items), len: items.len() }
    }
}

/// A chain bound to one buffer. Ties on every key fall back to buffer
/// position, so the order it defines is total.
pub struct BoundChain {
    head: Box<dyn IndexComparer>,
    len: usize,
}

impl BoundChain {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl IndexComparer for BoundChain {
    fn compare(&self, a: usize, b: usize) -> Ordering {
        self.head.compare(a, b)
    }
}
