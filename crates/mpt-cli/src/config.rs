use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Defaults applied to command input that does not set them itself.
///
/// Loaded from a YAML (or JSON) file passed with `--config`. Keys use the same
/// camelCase names as the JSON input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CliConfig {
    pub risk_free_rate: Option<f64>,
    pub num_iterations: Option<usize>,
    pub frontier_sample_size: Option<usize>,
    pub num_runs: Option<usize>,
    pub iterations_per_run: Option<usize>,
    pub seed: Option<u64>,
    pub validate: Option<bool>,
}

impl CliConfig {
    /// Read the config file, or return the empty config when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let p = Path::new(path);
        if !p.is_file() {
            return Err(format!("Config file not found: {}", p.display()).into());
        }
        let contents = fs::read_to_string(p)
            .map_err(|e| format!("Failed to read config '{}': {}", p.display(), e))?;
        let config: CliConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", p.display(), e))?;
        debug!(?config, path, "loaded config");
        Ok(config)
    }

    /// Fill keys missing from `input` with the configured values.
    pub fn apply_defaults(&self, input: &mut Value) {
        let Value::Object(map) = input else {
            return;
        };
        insert_missing(map, "riskFreeRate", self.risk_free_rate);
        insert_missing(map, "numIterations", self.num_iterations);
        insert_missing(map, "frontierSampleSize", self.frontier_sample_size);
        insert_missing(map, "numRuns", self.num_runs);
        insert_missing(map, "iterationsPerRun", self.iterations_per_run);
        insert_missing(map, "seed", self.seed);
        insert_missing(map, "validate", self.validate);
    }
}

/// Overwrite `key` in `input` when a command-line flag supplied a value.
pub fn override_value<T: Into<Value>>(input: &mut Value, key: &str, value: Option<T>) {
    if let (Value::Object(map), Some(v)) = (input, value) {
        map.insert(key.to_string(), v.into());
    }
}

fn insert_missing<T: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(v) = value {
        if map.get(key).map_or(true, Value::is_null) {
            map.insert(key.to_string(), v.into());
        }
    }
}
