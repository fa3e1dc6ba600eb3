//! Shared utilities for command handlers

use crate::cli::RecordPair;
use crate::config::Config;
use crate::error::Result;
use fieldmap_core::{Direction, DynamicDescriptor, MappingPlan, Profile};
use std::path::Path;
use tracing::debug;

/// The two descriptors of a record pair and the plan between them
pub struct ResolvedPair {
    pub source: DynamicDescriptor,
    pub target: DynamicDescriptor,
    pub plan: MappingPlan,
}

/// Find and load the profile a command should use
pub fn load_profile(explicit: Option<&Path>, config: &Config) -> Result<Profile> {
    let path = config.resolve_profile(explicit)?;
    debug!(profile = %path.display(), "Loading profile");
    Ok(Profile::from_path(&path)?)
}

/// Resolve the plan for a record pair.
///
/// The view record declares the correspondences. Forward maps class
/// instances into view instances, reverse maps them back.
pub fn resolve_pair(profile: &Profile, records: &RecordPair) -> Result<ResolvedPair> {
    let class = profile.descriptor(&records.class)?;
    let view = profile.descriptor(&records.view)?;

    let direction = if records.reverse {
        Direction::Reverse
    } else {
        Direction::Forward
    };
    let plan = MappingPlan::resolve(&view, &class, direction)?;

    let (source, target) = match direction {
        Direction::Forward => (class, view),
        Direction::Reverse => (view, class),
    };

    Ok(ResolvedPair {
        source,
        target,
        plan,
    })
}
