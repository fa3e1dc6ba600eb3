//! Shared mapper service for native records
//!
//! [`Mapper`] caches one [`RecordDescriptor`] per record type and one
//! resolved [`MappingPlan`] per (declaring type, referenced type, direction).
//! Both caches are filled once per key behind a read-mostly lock, so a single
//! mapper can serve concurrent calls. Failed resolutions are not cached.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::{Direction, MappingPlan};
use crate::record::{Record, RecordDescriptor};
use crate::{Error, Result};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::debug;

type PlanKey = (TypeId, TypeId, Direction);

static GLOBAL: OnceLock<Mapper> = OnceLock::new();

/// The two mapping operations between a class type `C` and a view type `V`
///
/// Correspondences are always declared on the view's fields and name fields
/// of the class.
pub trait ObjectMapper {
    /// Copy a class instance into a new view instance
    ///
    /// # Errors
    ///
    /// [`Error::InaccessibleField`], [`Error::UnknownSourceField`] or
    /// [`Error::IncompatibleTypes`] for the first invalid correspondence.
    fn class_to_view_model<C: Record, V: Record>(&self, class: &C) -> Result<V>;

    /// Copy a view instance back into a new class instance
    ///
    /// # Errors
    ///
    /// Same as [`ObjectMapper::class_to_view_model`].
    fn view_model_to_class<C: Record, V: Record>(&self, view: &V) -> Result<C>;
}

/// Mapper with descriptor and plan caches
#[derive(Debug, Default)]
pub struct Mapper {
    descriptors: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    plans: RwLock<HashMap<PlanKey, Arc<MappingPlan>>>,
}

impl Mapper {
    /// Create a mapper with empty caches
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide mapper used by the free functions of this crate
    pub fn global() -> &'static Mapper {
        GLOBAL.get_or_init(Mapper::new)
    }

    /// Descriptor of `R`, described on first use
    pub fn descriptor<R: Record>(&self) -> Result<Arc<RecordDescriptor<R>>> {
        let key = TypeId::of::<R>();

        let cached = self
            .descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();

        let entry = match cached {
            Some(entry) => entry,
            None => {
                let built: Arc<dyn Any + Send + Sync> = Arc::new(R::describe()?);
                debug!(record = type_name::<R>(), "Caching record descriptor");
                self.descriptors
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .entry(key)
                    .or_insert(built)
                    .clone()
            }
        };

        entry
            .downcast::<RecordDescriptor<R>>()
            .map_err(|_| Error::Descriptor {
                type_name: type_name::<R>().to_string(),
                message: "cached descriptor has a different record type".to_string(),
            })
    }

    /// Resolved plan for correspondences declared on `V` naming fields of `C`
    pub fn plan<C: Record, V: Record>(&self, direction: Direction) -> Result<Arc<MappingPlan>> {
        let key = (TypeId::of::<V>(), TypeId::of::<C>(), direction);

        if let Some(plan) = self
            .plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(plan));
        }

        let view = self.descriptor::<V>()?;
        let class = self.descriptor::<C>()?;
        let plan = Arc::new(MappingPlan::resolve(view.as_ref(), class.as_ref(), direction)?);
        debug!(
            source = %plan.source_type,
            target = %plan.target_type,
            %direction,
            "Caching mapping plan"
        );

        Ok(self
            .plans
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(plan)
            .clone())
    }

    /// Number of cached plans
    pub fn cached_plans(&self) -> usize {
        self.plans.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Drop every cached descriptor and plan
    pub fn clear(&self) {
        self.plans.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl ObjectMapper for Mapper {
    fn class_to_view_model<C: Record, V: Record>(&self, class: &C) -> Result<V> {
        let plan = self.plan::<C, V>(Direction::Forward)?;
        let source = self.descriptor::<C>()?;
        let target = self.descriptor::<V>()?;
        plan.execute(source.as_ref(), target.as_ref(), class)
    }

    fn view_model_to_class<C: Record, V: Record>(&self, view: &V) -> Result<C> {
        let plan = self.plan::<C, V>(Direction::Reverse)?;
        let source = self.descriptor::<V>()?;
        let target = self.descriptor::<C>()?;
        plan.execute(source.as_ref(), target.as_ref(), view)
    }
}
