//! Lazily sorted views.
//!
//! An [`OrderedView`] records a source and a key chain and does nothing else
//! until a pass starts. Each pass buffers the source, extracts the keys once
//! per element, sorts an index permutation and streams elements in that
//! order. Equal elements keep their source order.

use core::cmp::Ordering;
use core::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::cursor::SequenceCursor;
use crate::error::{Error, require};
use crate::materialize::Buffer;
use crate::options::PipelineOptions;
use crate::ordering::{Direction, KeyComparatorChain};
use crate::pipeline::Pipeline;
use crate::sequence::{Element, Sequence};
use crate::sort::sort_permutation;
use crate::source::OpaqueSource;
use crate::stage::Stage;

pub struct OrderedView<T> {
    source: Rc<dyn Sequence<T>>,
    chain: KeyComparatorChain<T>,
    options: PipelineOptions,
}

impl<T> Clone for OrderedView<T> {
    fn clone(&self) -> Self {
        Self { source: Rc::clone(&self.source), chain: self.chain.clone(), options: self.options.clone() }
    }
}

impl<T> fmt::Debug for OrderedView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedView")
            .field("chain", &self.chain)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: Element> OrderedView<T> {
    pub fn new<S>(source: S, chain: KeyComparatorChain<T>) -> Self
    where
        S: Sequence<T> + 'static,
    {
        Self { source: Rc::new(source), chain, options: PipelineOptions::default() }
    }

    pub fn order_by<S, K, F>(source: S, key_selector: F) -> Self
    where
        S: Sequence<T> + 'static,
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        Self::new(source, KeyComparatorChain::by_key(key_selector, Direction::Ascending))
    }

    pub fn order_by_descending<S, K, F>(source: S, key_selector: F) -> Self
    where
        S: Sequence<T> + 'static,
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        Self::new(source, KeyComparatorChain::by_key(key_selector, Direction::Descending))
    }

    pub fn order_by_with<S, K, F, C>(source: S, key_selector: F, comparer: C, direction: Direction) -> Self
    where
        S: Sequence<T> + 'static,
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: Fn(&K, &K) -> Ordering + 'static,
    {
        Self::new(source, KeyComparatorChain::by_key_with(key_selector, comparer, direction))
    }

    /// Adds a key that takes precedence over every key already in the view.
    ///
    /// `view.then_by(a).then_by(b)` compares by `b` first, then `a`, then
    /// the view's original key. The receiver is left unchanged.
    #[must_use]
    pub fn then_by<K, F>(&self, key_selector: F) -> Self
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.then_by_with(key_selector, K::cmp, Direction::Ascending)
    }

    #[must_use]
    pub fn then_by_descending<K, F>(&self, key_selector: F) -> Self
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.then_by_with(key_selector, K::cmp, Direction::Descending)
    }

    #[must_use]
    pub fn then_by_with<K, F, C>(&self, key_selector: F, comparer: C, direction: Direction) -> Self
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: Fn(&K, &K) -> Ordering + 'static,
    {
        Self {
            source: Rc::clone(&self.source),
            chain: self.chain.compose_with(key_selector, comparer, direction),
            options: self.options.clone(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: &PipelineOptions) -> Self {
        self.options = options.clone();
        self
    }

    pub fn chain(&self) -> &KeyComparatorChain<T> {
        &self.chain
    }

    pub fn cursor(&self) -> OrderedCursor<T> {
        OrderedCursor {
            source: Rc::clone(&self.source),
            chain: self.chain.clone(),
            options: self.options.clone(),
            sorted: None,
            current: None,
            next: 0,
            done: false,
        }
    }
}

impl<T: Element> Sequence<T> for OrderedView<T> {
    fn open(&self) -> Box<dyn SequenceCursor<T>> {
        Box::new(self.cursor())
    }

    fn exact_len(&self) -> Option<usize> {
        self.source.exact_len()
    }
}

impl<T: Element> Pipeline for OrderedView<T> {
    type Shape = OpaqueSource<T>;
    type Item = T;

    fn filter<P>(self, predicate: P) -> Stage<OpaqueSource<T>, T>
    where
        P: Fn(&T) -> bool + 'static,
    {
        Stage::filtered(OpaqueSource::from_sequence(self), predicate)
    }

    fn project<U, F>(self, projection: F) -> Stage<OpaqueSource<T>, U>
    where
        U: Element,
        F: Fn(T) -> U + 'static,
    {
        Stage::projected(OpaqueSource::from_sequence(self), projection)
    }
}

struct Sorted<T> {
    items: Box<[T]>,
    map: Vec<usize>,
}

/// One pass over an [`OrderedView`]. Sorting happens on the first
/// [`advance`](SequenceCursor::advance).
pub struct OrderedCursor<T> {
    source: Rc<dyn Sequence<T>>,
    chain: KeyComparatorChain<T>,
    options: PipelineOptions,
    sorted: Option<Sorted<T>>,
    current: Option<usize>,
    next: usize,
    done: bool,
}

impl<T: Element> OrderedCursor<T> {
    fn sort(&self) -> Sorted<T> {
        let items = Buffer::from_sequence_with(&*self.source, &self.options).to_array();
        let bound = self.chain.bind(&items);
        let mut map: Vec<usize> = (0..items.len()).collect();
        sort_permutation(&mut map, &bound);
        debug!(count = items.len(), keys = self.chain.len(), "sorted ordered view");
        Sorted { items, map }
    }
}

impl<T: Element> SequenceCursor<T> for OrderedCursor<T> {
    fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        if self.sorted.is_none() {
            self.sorted = Some(self.sort());
        }
        let len = self.sorted.as_ref().map_or(0, |sorted| sorted.map.len());
        if self.next < len {
            self.current = Some(self.next);
            self.next += 1;
            true
        } else {
            self.release();
            false
        }
    }

    fn current(&self) -> Option<&T> {
        let sorted = self.sorted.as_ref()?;
        let slot = *sorted.map.get(self.current?)?;
        sorted.items.get(slot)
    }

    fn release(&mut self) {
        self.done = true;
        self.sorted = None;
        self.current = None;
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match (&self.sorted, self.done) {
            (_, true) => (0, Some(0)),
            (Some(sorted), false) => {
                let left = sorted.map.len() - self.next;
                (left, Some(left))
            }
            (None, false) => (0, self.source.exact_len()),
        }
    }
}

/// Checked [`OrderedView::order_by`]: fails with `InvalidArgument` when
/// `source` or `key_selector` is absent.
pub fn order_by<T, S, K, F>(source: Option<S>, key_selector: Option<F>) -> Result<OrderedView<T>, Error>
where
    T: Element,
    S: Sequence<T> + 'static,
    K: Ord + 'static,
    F: Fn(&T) -> K + 'static,
{
    let source = require(source, "source")?;
    let key_selector = require(key_selector, "key_selector")?;
    Ok(OrderedView::order_by(source, key_selector))
}

/// Checked [`OrderedView::then_by`].
pub fn then_by<T, K, F>(view: Option<&OrderedView<T>>, key_selector: Option<F>) -> Result<OrderedView<T>, Error>
where
    T: Element,
    K: Ord + 'static,
    F: Fn(&T) -> K + 'static,
{
    let view = require(view, "source")?;
    let key_selector = require(key_selector, "key_selector")?;
    Ok(view.then_by(key_selector))
}
