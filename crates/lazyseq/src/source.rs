//! Storage shapes a pipeline can start from.
//!
//! Each shape knows how to start a position, step it and give back whatever
//! the position holds. Stages are specialised on the shape at construction
//! time, so an array is walked by index, a list through its own guarded
//! cursor and anything else through the generic cursor protocol.

use std::rc::Rc;
use std::sync::Arc;

use parking_lot::{ArcRwLockReadGuard, RawRwLock, RwLock};

use crate::cursor::{IterCursor, SequenceCursor};
use crate::error::Error;
use crate::sequence::{Element, Sequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Array,
    List,
    Opaque,
}

/// Capability interface of a storage shape.
pub trait Shape: Clone + 'static {
    type Item: Element;
    type Position;

    const KIND: ShapeKind;

    fn start(&self) -> Self::Position;

    fn next(&self, position: &mut Self::Position) -> Option<Self::Item>;

    /// Gives back anything `position` holds on the upstream. Idempotent.
    fn finish(&self, position: &mut Self::Position);

    fn exact_len(&self) -> Option<usize>;
}

// ---------------------------------------------------------------------------
// Dense array
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ArraySource<T> {
    items: Arc<[T]>,
}

impl<T> Clone for ArraySource<T> {
    fn clone(&self) -> Self {
        Self { items: Arc::clone(&self.items) }
    }
}

impl<T> ArraySource<T> {
    pub fn new(items: impl Into<Arc<[T]>>) -> Self {
        Self { items: items.into() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> From<Vec<T>> for ArraySource<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: Element> Shape for ArraySource<T> {
    type Item = T;
    type Position = usize;

    const KIND: ShapeKind = ShapeKind::Array;

    fn start(&self) -> usize {
        0
    }

    fn next(&self, position: &mut usize) -> Option<T> {
        let item = self.items.get(*position)?.clone();
        *position += 1;
        Some(item)
    }

    fn finish(&self, position: &mut usize) {
        *position = self.items.len();
    }

    fn exact_len(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

// ---------------------------------------------------------------------------
// Growable list
// ---------------------------------------------------------------------------

/// Shared growable list. Cursors hold a read guard for the whole pass, so
/// mutation fails with [`ErrorCode::SourceBusy`](crate::ErrorCode::SourceBusy)
/// until every live cursor has been released.
#[derive(Debug)]
pub struct ListSource<T> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for ListSource<T> {
    fn clone(&self) -> Self {
        Self { items: Arc::clone(&self.items) }
    }
}

impl<T> Default for ListSource<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> ListSource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items: Arc::new(RwLock::new(items)) }
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn push(&self, item: T) -> Result<(), Error> {
        self.with_mut(|items| items.push(item))
    }

    pub fn extend(&self, items: impl IntoIterator<Item = T>) -> Result<(), Error> {
        self.with_mut(|list| list.extend(items))
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> Result<R, Error> {
        let mut guard = self
            .items
            .try_write()
            .ok_or_else(|| Error::source_busy("list is being iterated; release open cursors first"))?;
        Ok(f(&mut guard))
    }
}

impl<T> From<Vec<T>> for ListSource<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

/// Native stepwise cursor of a [`ListSource`].
pub struct ListPosition<T> {
    guard: Option<ArcRwLockReadGuard<RawRwLock, Vec<T>>>,
    index: usize,
}

impl<T: Element> Shape for ListSource<T> {
    type Item = T;
    type Position = ListPosition<T>;

    const KIND: ShapeKind = ShapeKind::List;

    fn start(&self) -> ListPosition<T> {
        ListPosition { guard: Some(self.items.read_arc()), index: 0 }
    }

    fn next(&self, position: &mut ListPosition<T>) -> Option<T> {
        let item = position.guard.as_ref()?.get(position.index)?.clone();
        position.index += 1;
        Some(item)
    }

    fn finish(&self, position: &mut ListPosition<T>) {
        position.guard = None;
    }

    fn exact_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

// ---------------------------------------------------------------------------
// Opaque stepwise source
// ---------------------------------------------------------------------------

type CursorFactory<T> = Rc<dyn Fn() -> Box<dyn SequenceCursor<T>>>;

/// Source known only through the cursor protocol: every pass asks the
/// factory for a fresh upstream cursor.
pub struct OpaqueSource<T> {
    factory: CursorFactory<T>,
}

impl<T> Clone for OpaqueSource<T> {
    fn clone(&self) -> Self {
        Self { factory: Rc::clone(&self.factory) }
    }
}

impl<T> std::fmt::Debug for OpaqueSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpaqueSource").finish_non_exhaustive()
    }
}

impl<T: Element> OpaqueSource<T> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Box<dyn SequenceCursor<T>> + 'static,
    {
        Self { factory: Rc::new(factory) }
    }

    /// Re-runs `make` for every pass and walks the iterator it returns.
    pub fn from_iter_fn<I, F>(make: F) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
        F: Fn() -> I + 'static,
    {
        Self::new(move || Box::new(IterCursor::new(make().into_iter())))
    }

    pub fn from_sequence<S>(sequence: S) -> Self
    where
        S: Sequence<T> + 'static,
    {
        Self::new(move || sequence.open())
    }
}

/// Position of an opaque pass: the upstream cursor, opened on first step.
pub struct OpaquePosition<T> {
    upstream: Option<Box<dyn SequenceCursor<T>>>,
    opened: bool,
}

impl<T: Element> Shape for OpaqueSource<T> {
    type Item = T;
    type Position = OpaquePosition<T>;

    const KIND: ShapeKind = ShapeKind::Opaque;

    fn start(&self) -> OpaquePosition<T> {
        OpaquePosition { upstream: None, opened: false }
    }

    fn next(&self, position: &mut OpaquePosition<T>) -> Option<T> {
        if !position.opened {
            position.opened = true;
            position.upstream = Some((self.factory)());
        }
        let upstream = position.upstream.as_mut()?;
        if upstream.advance() { upstream.current().cloned() } else { None }
    }

    fn finish(&self, position: &mut OpaquePosition<T>) {
        position.opened = true;
        if let Some(mut upstream) = position.upstream.take() {
            upstream.release();
        }
    }

    fn exact_len(&self) -> Option<usize> {
        None
    }
}

// ---------------------------------------------------------------------------
// Plain cursor over a shape
// ---------------------------------------------------------------------------

/// Unfiltered cursor over a shape; what [`Sequence::open`] returns for the
/// raw sources.
pub struct ShapeCursor<S: Shape> {
    shape: S,
    position: Option<S::Position>,
    current: Option<S::Item>,
    done: bool,
}

impl<S: Shape> ShapeCursor<S> {
    pub fn new(shape: S) -> Self {
        Self { shape, position: None, current: None, done: false }
    }
}

impl<S: Shape> SequenceCursor<S::Item> for ShapeCursor<S> {
    fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        let position = self.position.get_or_insert_with(|| self.shape.start());
        match self.shape.next(position) {
            Some(item) => {
                self.current = Some(item);
                true
            }
            None => {
                self.release();
                false
            }
        }
    }

    fn current(&self) -> Option<&S::Item> {
        self.current.as_ref()
    }

    fn release(&mut self) {
        self.done = true;
        self.current = None;
        if let Some(mut position) = self.position.take() {
            self.shape.finish(&mut position);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match (self.done, self.position.is_none(), self.shape.exact_len()) {
            (true, _, _) => (0, Some(0)),
            (false, true, Some(len)) => (len, Some(len)),
            _ => (0, None),
        }
    }
}

impl<S: Shape> Drop for ShapeCursor<S> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Element> Sequence<T> for ArraySource<T> {
    fn open(&self) -> Box<dyn SequenceCursor<T>> {
        Box::new(ShapeCursor::new(self.clone()))
    }

    fn exact_len(&self) -> Option<usize> {
        Some(self.items.len())
    }

    fn copy_exact(&self) -> Option<Vec<T>> {
        Some(self.items.to_vec())
    }
}

impl<T: Element> Sequence<T> for ListSource<T> {
    fn open(&self) -> Box<dyn SequenceCursor<T>> {
        Box::new(ShapeCursor::new(self.clone()))
    }

    fn exact_len(&self) -> Option<usize> {
        Some(self.len())
    }

    fn copy_exact(&self) -> Option<Vec<T>> {
        Some(self.items.read().clone())
    }
}

impl<T: Element> Sequence<T> for OpaqueSource<T> {
    fn open(&self) -> Box<dyn SequenceCursor<T>> {
        Box::new(ShapeCursor::new(self.clone()))
    }
}
