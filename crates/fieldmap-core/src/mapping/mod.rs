//! Mapping engine
//!
//! - [`plan`] - correspondence resolution and field copying
//! - [`mapper`] - the cached [`Mapper`] service for native records
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

pub mod mapper;
pub mod plan;

pub use mapper::{Mapper, ObjectMapper};
pub use plan::{Bridge, MappingPlan, PlanStep};

use crate::descriptor::TypeDescriptor;
use crate::Result;
use serde::Serialize;
use std::fmt;

/// Which way values flow relative to the type declaring correspondences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// From the referenced type into the declaring type (class to view)
    Forward,
    /// From the declaring type into the referenced type (view to class)
    Reverse,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Reverse => f.write_str("reverse"),
        }
    }
}

/// Map `source` into a new instance of the target type, using the
/// correspondences declared on the target's fields.
pub fn map<S, T>(source: &S::Instance, source_descriptor: &S, target_descriptor: &T) -> Result<T::Instance>
where
    S: TypeDescriptor + ?Sized,
    T: TypeDescriptor<Value = S::Value> + ?Sized,
{
    MappingPlan::resolve(target_descriptor, source_descriptor, Direction::Forward)?.execute(
        source_descriptor,
        target_descriptor,
        source,
    )
}

/// Map `source` into a new instance of the target type, using the
/// correspondences declared on the source's fields.
pub fn map_reverse<S, T>(
    source: &S::Instance,
    source_descriptor: &S,
    target_descriptor: &T,
) -> Result<T::Instance>
where
    S: TypeDescriptor + ?Sized,
    T: TypeDescriptor<Value = S::Value> + ?Sized,
{
    MappingPlan::resolve(source_descriptor, target_descriptor, Direction::Reverse)?.execute(
        source_descriptor,
        target_descriptor,
        source,
    )
}
