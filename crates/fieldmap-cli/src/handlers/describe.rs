//! Describe command handler

use super::utils::load_profile;
use crate::cli::DescribeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use fieldmap_core::RecordSpec;

/// Handle the describe command
pub fn handle_describe(args: DescribeArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let profile = load_profile(args.profile.as_deref(), config)?;

    let records: Vec<&RecordSpec> = match &args.record {
        Some(name) => vec![profile.record(name)?],
        None => profile.records.iter().collect(),
    };

    output.records(&records)
}
