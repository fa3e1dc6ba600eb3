//! Correspondence resolution and field copying
//!
//! Resolution walks the fields of the declaring type (the type whose fields
//! carry correspondences) in declaration order, checks every declared
//! correspondence against the referenced type and records one [`PlanStep`]
//! per copy. Execution then builds a default target instance and moves the
//! values. Both directions share this single routine; only the roles of
//! source and target swap.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::Direction;
use crate::descriptor::TypeDescriptor;
use crate::types::FieldDescriptor;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

/// How nullability changes between the two ends of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bridge {
    /// Both ends share the same nullability
    Direct,
    /// Plain source into a nullable target
    Wrap,
    /// Nullable source into a plain target; an absent value becomes the
    /// target field's default
    Unwrap,
}

impl Bridge {
    fn between(source: &FieldDescriptor, target: &FieldDescriptor) -> Self {
        match (source.field_type.is_nullable(), target.field_type.is_nullable()) {
            (false, true) => Bridge::Wrap,
            (true, false) => Bridge::Unwrap,
            _ => Bridge::Direct,
        }
    }
}

impl fmt::Display for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bridge::Direct => f.write_str("direct"),
            Bridge::Wrap => f.write_str("wrap"),
            Bridge::Unwrap => f.write_str("unwrap"),
        }
    }
}

/// One validated field copy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanStep {
    pub source_field: String,
    #[serde(skip)]
    pub source_index: usize,
    pub source_type: String,
    pub target_field: String,
    #[serde(skip)]
    pub target_index: usize,
    pub target_type: String,
    pub bridge: Bridge,
}

/// Validated, ordered list of copies between two record types
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingPlan {
    pub source_type: String,
    pub target_type: String,
    pub direction: Direction,
    pub steps: Vec<PlanStep>,
}

impl MappingPlan {
    /// Resolve every correspondence declared on `declaring` against
    /// `referenced`.
    ///
    /// With [`Direction::Forward`] values flow from `referenced` into
    /// `declaring`; with [`Direction::Reverse`] they flow from `declaring`
    /// into `referenced`. The first failing check aborts resolution.
    ///
    /// # Errors
    ///
    /// - [`Error::InaccessibleField`] when either field of a correspondence
    ///   lacks a getter or a setter
    /// - [`Error::UnknownSourceField`] when the declared name does not exist
    ///   on `referenced`
    /// - [`Error::IncompatibleTypes`] when the effective types differ
    pub fn resolve<D, F>(declaring: &D, referenced: &F, direction: Direction) -> Result<Self>
    where
        D: TypeDescriptor + ?Sized,
        F: TypeDescriptor + ?Sized,
    {
        debug!(
            declaring = declaring.type_name(),
            referenced = referenced.type_name(),
            ?direction,
            "Resolving mapping plan"
        );

        let mut steps = Vec::new();

        for (declared_index, declared) in declaring.fields().iter().enumerate() {
            let Some(name) = declared.correspondence() else {
                trace!(field = %declared.name, "No correspondence declared, skipping");
                continue;
            };

            if !declared.is_accessible() {
                return Err(Error::InaccessibleField {
                    field: declared.name.clone(),
                    type_name: declaring.type_name().to_string(),
                });
            }

            let referenced_index = referenced.index_of(name).ok_or_else(|| {
                Error::UnknownSourceField {
                    name: name.to_string(),
                    expected_on_type: referenced.type_name().to_string(),
                }
            })?;
            let other = &referenced.fields()[referenced_index];

            // Writable is required even on the read side; both directions
            // must accept the same pair of fields.
            if !other.is_accessible() {
                return Err(Error::InaccessibleField {
                    field: other.name.clone(),
                    type_name: referenced.type_name().to_string(),
                });
            }

            let ((source, source_index), (target, target_index)) = match direction {
                Direction::Forward => ((other, referenced_index), (declared, declared_index)),
                Direction::Reverse => ((declared, declared_index), (other, referenced_index)),
            };

            if !target.field_type.is_assignable_from(&source.field_type) {
                return Err(Error::IncompatibleTypes {
                    from: source.field_type.effective_name().to_string(),
                    to: target.field_type.effective_name().to_string(),
                    field: declared.name.clone(),
                });
            }

            steps.push(PlanStep {
                source_field: source.name.clone(),
                source_index,
                source_type: source.field_type.to_string(),
                target_field: target.name.clone(),
                target_index,
                target_type: target.field_type.to_string(),
                bridge: Bridge::between(source, target),
            });
        }

        let (source_type, target_type) = match direction {
            Direction::Forward => (referenced.type_name(), declaring.type_name()),
            Direction::Reverse => (declaring.type_name(), referenced.type_name()),
        };

        debug!(source_type, target_type, steps = steps.len(), "Mapping plan resolved");

        Ok(Self {
            source_type: source_type.to_string(),
            target_type: target_type.to_string(),
            direction,
            steps,
        })
    }

    /// Build a default target instance and copy every planned field from
    /// `source` into it.
    ///
    /// The descriptors must be the ones the plan was resolved from, in the
    /// roles the plan's direction gives them.
    pub fn execute<S, T>(
        &self,
        source_descriptor: &S,
        target_descriptor: &T,
        source: &S::Instance,
    ) -> Result<T::Instance>
    where
        S: TypeDescriptor + ?Sized,
        T: TypeDescriptor<Value = S::Value> + ?Sized,
    {
        self.check_roles(source_descriptor.type_name(), target_descriptor.type_name())?;

        let mut target = target_descriptor.instantiate();

        for step in &self.steps {
            let value = source_descriptor.read(source, step.source_index)?;
            trace!(
                from = %step.source_field,
                to = %step.target_field,
                present = value.is_some(),
                "Copying field"
            );
            target_descriptor.write(&mut target, step.target_index, value)?;
        }

        Ok(target)
    }

    /// Number of fields this plan copies
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn check_roles(&self, source_type: &str, target_type: &str) -> Result<()> {
        if source_type != self.source_type || target_type != self.target_type {
            return Err(Error::Descriptor {
                type_name: target_type.to_string(),
                message: format!(
                    "plan maps {} -> {} but was executed with {} -> {}",
                    self.source_type, self.target_type, source_type, target_type
                ),
            });
        }
        Ok(())
    }
}
