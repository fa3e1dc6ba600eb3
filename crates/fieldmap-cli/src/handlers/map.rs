//! Map command handler

use super::utils::{load_profile, resolve_pair, ResolvedPair};
use crate::cli::MapArgs;
use crate::config::Config;
use crate::error::{Error, ErrorContext, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::{fs, io};
use tracing::{debug, info, instrument, trace, warn};

/// Handle the map command
///
/// The input holds either one instance or an array of instances of the
/// source record; the output keeps the same shape.
#[instrument(skip(config, output), fields(input = %args.input.display(), reverse = args.records.reverse))]
pub fn handle_map(args: MapArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("map_command", &format!("input: {}", args.input.display()));

    let profile = load_profile(args.records.profile.as_deref(), config)?;
    let resolved = resolve_pair(&profile, &args.records)?;
    debug!(
        source = %resolved.plan.source_type,
        target = %resolved.plan.target_type,
        steps = resolved.plan.len(),
        "Plan ready"
    );

    let input = read_input(&args.input)?;

    let mapped = match input {
        Value::Array(items) => {
            let results = map_batch(&resolved, &items, config, output)?;
            info!(count = results.len(), "Mapped batch");
            Value::Array(results)
        }
        single => map_one(&resolved, &single)?,
    };

    match &args.save_to {
        Some(path) => {
            save_output(path, &mapped)?;
            let count = mapped.as_array().map_or(1, Vec::len);
            output.success(&format!("✓ Wrote {} instance(s) to {}", count, path.display()))
        }
        None => output.data(&mapped),
    }
}

fn map_one(resolved: &ResolvedPair, item: &Value) -> Result<Value> {
    trace!(instance = %redaction::redacted(item), "Mapping instance");
    let instance = resolved.source.instance_from_json(item)?;
    let target = resolved
        .plan
        .execute(&resolved.source, &resolved.target, &instance)?;
    Ok(Value::Object(target))
}

fn map_batch(
    resolved: &ResolvedPair,
    items: &[Value],
    config: &Config,
    output: &OutputWriter,
) -> Result<Vec<Value>> {
    let progress = if config.output.progress && items.len() >= config.output.progress_threshold {
        output.progress_bar(items.len() as u64, "Mapping instances")
    } else {
        None
    };

    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match map_one(resolved, item) {
            Ok(value) => results.push(value),
            Err(e) => {
                warn!(index, error = %e, "Failed to map instance");
                if let Some(pb) = &progress {
                    pb.abandon();
                }
                return Err(e);
            }
        }
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    Ok(results)
}

/// Read JSON from a file, or from stdin when the path is `-`
fn read_input(path: &Path) -> Result<Value> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read instances from stdin")?;
        buffer
    } else {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        fs::read_to_string(path)?
    };
    debug!("Input read, {} bytes", content.len());

    serde_json::from_str(&content).map_err(|e| {
        debug!(error = %e, "Input is not valid JSON");
        Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        }
    })
}

/// Save mapped instances as YAML or pretty JSON, by extension
fn save_output(path: &Path, value: &Value) -> Result<()> {
    let is_yaml = matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    );
    let content = if is_yaml {
        serde_yaml::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
