use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_NODE_SEP: f64 = 28.0;
pub const DEFAULT_RANK_SEP: f64 = 28.0;

/// User-tunable settings of the arrange operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangeConfig {
    /// Location of the `dot` executable. Autodetected from `PATH` when unset or empty.
    pub dot_path: Option<PathBuf>,
    /// Separation between nodes of the same rank, in host units.
    pub node_sep: f64,
    /// Separation between ranks, in host units.
    pub rank_sep: f64,
    /// Font family for the rendered preview. Layout does not depend on it.
    pub font_name: Option<String>,
    /// Upper bound on each Graphviz invocation. `None` or zero waits forever.
    pub timeout_secs: Option<u64>,
}

impl Default for ArrangeConfig {
    fn default() -> Self {
        Self {
            dot_path: None,
            node_sep: DEFAULT_NODE_SEP,
            rank_sep: DEFAULT_RANK_SEP,
            font_name: None,
            timeout_secs: None,
        }
    }
}

impl ArrangeConfig {
    /// Zero is treated like unset; it would stop `dot` before it could start.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    /// Applies a (possibly partial) JSON object on top of the current values.
    pub fn merge_json(&mut self, overrides: &Value) -> Result<()> {
        let mut base = serde_json::to_value(&*self)?;
        deep_merge_value(&mut base, overrides);
        *self = serde_json::from_value(base)?;
        Ok(())
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
