//! Check command handler

use super::utils::{load_profile, resolve_pair};
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use tracing::{info, instrument};

/// Handle the check command
///
/// Resolves the plan between the two records and prints it. Any schema
/// error surfaces as a core error.
#[instrument(skip(config, output), fields(class = %args.records.class, view = %args.records.view))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details(
        "check_command",
        &format!("{} <-> {}", args.records.class, args.records.view),
    );

    let profile = load_profile(args.records.profile.as_deref(), config)?;
    let resolved = resolve_pair(&profile, &args.records)?;

    info!(steps = resolved.plan.len(), "Correspondences are consistent");
    output.plan(&resolved.plan)
}
