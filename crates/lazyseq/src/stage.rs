//! Lazy filter/project stages with operator fusion.
//!
//! A stage couples a source shape with one fused step `Fn(In) -> Option<Out>`.
//! Filtering or projecting a stage again does not wrap it; the step is
//! extended in place of a new layer, so any chain of filters and projections
//! costs one step call per upstream element.

use core::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::context::ExecutionContext;
use crate::cursor::SequenceCursor;
use crate::options::PipelineOptions;
use crate::sequence::{Element, Sequence};
use crate::source::{Shape, ShapeKind};

pub(crate) type Step<TIn, TOut> = Rc<dyn Fn(TIn) -> Option<TOut>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Progress {
    Unstarted,
    Running,
    Finished,
}

pub struct Stage<S: Shape, T> {
    shape: S,
    step: Step<S::Item, T>,
    owner: ExecutionContext,
    reuse: bool,
    progress: Progress,
    position: Option<S::Position>,
    current: Option<T>,
}

impl<S: Shape> Stage<S, S::Item> {
    /// Fresh stage that passes through the elements `predicate` accepts.
    pub fn filtered<P>(shape: S, predicate: P) -> Self
    where
        P: Fn(&S::Item) -> bool + 'static,
    {
        let step: Step<S::Item, S::Item> = Rc::new(move |item: S::Item| predicate(&item).then_some(item));
        Self::from_step(shape, step)
    }
}

impl<S: Shape, T: Element> Stage<S, T> {
    /// Fresh stage that maps every element through `projection`.
    pub fn projected<F>(shape: S, projection: F) -> Self
    where
        F: Fn(S::Item) -> T + 'static,
    {
        let step: Step<S::Item, T> = Rc::new(move |item: S::Item| Some(projection(item)));
        Self::from_step(shape, step)
    }

    pub(crate) fn from_step(shape: S, step: Step<S::Item, T>) -> Self {
        Self {
            shape,
            step,
            owner: ExecutionContext::ambient(),
            reuse: PipelineOptions::default().reuse_cursors,
            progress: Progress::Unstarted,
            position: None,
            current: None,
        }
    }

    pub fn shape_kind(&self) -> ShapeKind {
        S::KIND
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn owner(&self) -> ExecutionContext {
        self.owner
    }

    /// Records `ctx` as the context allowed to reuse this stage as its cursor.
    #[must_use]
    pub fn bind_context(mut self, ctx: ExecutionContext) -> Self {
        self.owner = ctx;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: &PipelineOptions) -> Self {
        self.reuse = options.reuse_cursors;
        self
    }

    /// Adds `predicate` to the fused step. Both the existing step and the new
    /// predicate must accept an element for it to survive.
    #[must_use]
    pub fn fuse_filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        let prev = Rc::clone(&self.step);
        let step: Step<S::Item, T> = Rc::new(move |item: S::Item| prev(item).filter(|out| predicate(out)));
        self.rebuild(step)
    }

    /// Composes `projection` after the fused step.
    pub fn fuse_project<U, F>(self, projection: F) -> Stage<S, U>
    where
        U: Element,
        F: Fn(T) -> U + 'static,
    {
        let prev = Rc::clone(&self.step);
        let step: Step<S::Item, U> = Rc::new(move |item: S::Item| prev(item).map(&projection));
        self.rebuild(step)
    }

    fn rebuild<U: Element>(&self, step: Step<S::Item, U>) -> Stage<S, U> {
        Stage {
            shape: self.shape.clone(),
            step,
            owner: self.owner,
            reuse: self.reuse,
            progress: Progress::Unstarted,
            position: None,
            current: None,
        }
    }

    /// Independent, unstarted copy sharing the source and the fused step.
    pub fn fresh(&self) -> Self {
        self.rebuild(Rc::clone(&self.step))
    }

    /// Starts a pass from `ctx`.
    ///
    /// The stage lends itself out when reuse is enabled, `ctx` is the context
    /// it was built in and it has never been started; otherwise the pass runs
    /// on a fresh clone and this stage is left untouched.
    pub fn cursor(&mut self, ctx: ExecutionContext) -> StageCursor<'_, S, T> {
        if self.reuse && ctx == self.owner && self.progress == Progress::Unstarted {
            trace!(shape = ?S::KIND, ctx = ctx.id(), "reusing stage as its own cursor");
            StageCursor::Reused(self)
        } else {
            trace!(
                shape = ?S::KIND,
                ctx = ctx.id(),
                owner = self.owner.id(),
                progress = ?self.progress,
                "cloning stage for independent pass"
            );
            StageCursor::Cloned(self.fresh())
        }
    }

    pub(crate) fn take_current(&mut self) -> Option<T> {
        self.current.take()
    }
}

impl<S: Shape, T> Stage<S, T> {
    fn release_position(&mut self) {
        if let Some(mut position) = self.position.take() {
            self.shape.finish(&mut position);
        }
        self.current = None;
        self.progress = Progress::Finished;
    }
}

impl<S: Shape, T: Element> SequenceCursor<T> for Stage<S, T> {
    fn advance(&mut self) -> bool {
        match self.progress {
            Progress::Finished => return false,
            Progress::Unstarted => {
                self.position = Some(self.shape.start());
                self.progress = Progress::Running;
            }
            Progress::Running => {}
        }
        if let Some(position) = self.position.as_mut() {
            while let Some(item) = self.shape.next(position) {
                if let Some(out) = (self.step)(item) {
                    self.current = Some(out);
                    return true;
                }
            }
        }
        self.release_position();
        false
    }

    fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    fn release(&mut self) {
        self.release_position();
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.progress {
            Progress::Finished => (0, Some(0)),
            _ => (0, self.shape.exact_len()),
        }
    }
}

impl<S: Shape, T> Drop for Stage<S, T> {
    fn drop(&mut self) {
        self.release_position();
    }
}

impl<S: Shape, T: Element> Sequence<T> for Stage<S, T> {
    fn open(&self) -> Box<dyn SequenceCursor<T>> {
        Box::new(self.fresh())
    }
}

impl<S: Shape, T> fmt::Debug for Stage<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("shape", &S::KIND)
            .field("owner", &self.owner)
            .field("reuse", &self.reuse)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

/// Cursor handed out by [`Stage::cursor`]. Dropping it releases the pass.
pub enum StageCursor<'a, S: Shape, T> {
    Reused(&'a mut Stage<S, T>),
    Cloned(Stage<S, T>),
}

impl<S: Shape, T> StageCursor<'_, S, T> {
    pub fn is_reused(&self) -> bool {
        matches!(self, StageCursor::Reused(_))
    }

    fn stage(&self) -> &Stage<S, T> {
        match self {
            StageCursor::Reused(stage) => &**stage,
            StageCursor::Cloned(stage) => stage,
        }
    }

    fn stage_mut(&mut self) -> &mut Stage<S, T> {
        match self {
            StageCursor::Reused(stage) => &mut **stage,
            StageCursor::Cloned(stage) => stage,
        }
    }
}

impl<S: Shape, T: Element> SequenceCursor<T> for StageCursor<'_, S, T> {
    fn advance(&mut self) -> bool {
        self.stage_mut().advance()
    }

    fn current(&self) -> Option<&T> {
        self.stage().current()
    }

    fn release(&mut self) {
        self.stage_mut().release_position();
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stage().size_hint()
    }
}

impl<S: Shape, T: Element> Iterator for StageCursor<'_, S, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let stage = self.stage_mut();
        if stage.advance() { stage.take_current() } else { None }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        SequenceCursor::size_hint(self.stage())
    }
}

impl<S: Shape, T> Drop for StageCursor<'_, S, T> {
    fn drop(&mut self) {
        self.stage_mut().release_position();
    }
}

impl<'a, S: Shape, T: Element> IntoIterator for &'a mut Stage<S, T> {
    type Item = T;
    type IntoIter = StageCursor<'a, S, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.cursor(ExecutionContext::ambient())
    }
}
