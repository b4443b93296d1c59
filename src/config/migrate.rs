//! Configuration file upgrades: add keys introduced by newer releases to an
//! existing YAML file without touching the values the user already set.

use super::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Keys present in the defaults but missing from `current`.
fn missing_keys(current: &Mapping, defaults: &Mapping) -> Vec<(Value, Value)> {
    defaults
        .iter()
        .filter(|(k, _)| !current.contains_key(*k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Compare the file at `path` with the default configuration.
///
/// Returns the names of the missing keys. When `write` is true they are
/// appended to the file with their default values.
pub fn check_config_file(path: &Path, write: bool) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;

    let mut yaml: Value = serde_yaml::from_str(&content)?;
    let map = yaml
        .as_mapping_mut()
        .ok_or_else(|| AppError::Config("configuration root is not a mapping".into()))?;

    let defaults = serde_yaml::to_value(Config::default())?;
    let defaults = defaults
        .as_mapping()
        .ok_or_else(|| AppError::Config("default configuration is not a mapping".into()))?;

    let missing = missing_keys(map, defaults);
    let names: Vec<String> = missing
        .iter()
        .filter_map(|(k, _)| k.as_str().map(str::to_string))
        .collect();

    if write && !missing.is_empty() {
        for (k, v) in missing {
            map.insert(k, v);
        }
        fs::write(path, serde_yaml::to_string(&yaml)?)?;
    }

    Ok(names)
}
