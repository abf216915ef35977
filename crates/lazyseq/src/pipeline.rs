//! Filter/project entry points.
//!
//! [`Pipeline`] is implemented for every source shape and for [`Stage`]
//! itself. On a source it builds a fresh stage specialised for that shape; on
//! a stage it fuses the new operation into the existing step. Either way no
//! element is touched until the result is iterated.

use crate::error::{Error, require};
use crate::sequence::Element;
use crate::source::{ArraySource, ListSource, OpaqueSource, Shape};
use crate::stage::Stage;

pub trait Pipeline: Sized {
    type Shape: Shape;
    type Item: Element;

    fn filter<P>(self, predicate: P) -> Stage<Self::Shape, Self::Item>
    where
        P: Fn(&Self::Item) -> bool + 'static;

    fn project<U, F>(self, projection: F) -> Stage<Self::Shape, U>
    where
        U: Element,
        F: Fn(Self::Item) -> U + 'static;
}

macro_rules! source_pipeline {
    ($($source:ident),* $(,)?) => {
        $(
            impl<T: Element> Pipeline for $source<T> {
                type Shape = Self;
                type Item = T;

                fn filter<P>(self, predicate: P) -> Stage<Self, T>
                where
                    P: Fn(&T) -> bool + 'static,
                {
                    Stage::filtered(self, predicate)
                }

                fn project<U, F>(self, projection: F) -> Stage<Self, U>
                where
                    U: Element,
                    F: Fn(T) -> U + 'static,
                {
                    Stage::projected(self, projection)
                }
            }
        )*
    };
}

source_pipeline!(ArraySource, ListSource, OpaqueSource);

impl<S: Shape, T: Element> Pipeline for Stage<S, T> {
    type Shape = S;
    type Item = T;

    fn filter<P>(self, predicate: P) -> Stage<S, T>
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.fuse_filter(predicate)
    }

    fn project<U, F>(self, projection: F) -> Stage<S, U>
    where
        U: Element,
        F: Fn(T) -> U + 'static,
    {
        self.fuse_project(projection)
    }
}

/// Checked filter: fails with `InvalidArgument` before building anything
/// when `source` or `predicate` is absent.
pub fn filter<P, F>(source: Option<P>, predicate: Option<F>) -> Result<Stage<P::Shape, P::Item>, Error>
where
    P: Pipeline,
    F: Fn(&P::Item) -> bool + 'static,
{
    let source = require(source, "source")?;
    let predicate = require(predicate, "predicate")?;
    Ok(source.filter(predicate))
}

/// Checked projection; see [`filter`].
pub fn project<P, U, F>(source: Option<P>, projection: Option<F>) -> Result<Stage<P::Shape, U>, Error>
where
    P: Pipeline,
    U: Element,
    F: Fn(P::Item) -> U + 'static,
{
    let source = require(source, "source")?;
    let projection = require(projection, "projection")?;
    Ok(source.project(projection))
}
