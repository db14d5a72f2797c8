//! Environment lookups: `.env` → process environment snapshot → named values with defaults.
//!
//! Only [`Environment::from_process`] touches the process environment. Everything downstream
//! receives resolved values through [`Opts`](crate::Opts).

use log::debug;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{FixError, FixResult};

/// Variable naming the manifold-repair executable.
pub const MANIFOLD_VAR: &str = "manifold";
/// Variable naming the simplify executable.
pub const SIMPLIFY_VAR: &str = "simplify";
/// Variable overriding the worker count.
pub const PROCESSES_VAR: &str = "processes";

/// Immutable snapshot of environment variables.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Load `.env` from `dir` (if present; its values win over variables already set), then
    /// snapshot the process environment.
    pub fn from_process(dir: &Path) -> Self {
        let env_path = dir.join(".env");
        if env_path.is_file() {
            match dotenvy::from_path_override(&env_path) {
                Ok(()) => debug!("Loaded {}", env_path.display()),
                Err(e) => log::warn!("{}: {}", env_path.display(), e),
            }
        }
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw lookup; empty values count as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Value of `name`, else `default` when it is non-empty, else [`FixError::ConfigurationMissing`].
    pub fn resolve(&self, name: &str, default: Option<&str>) -> FixResult<String> {
        self.get(name)
            .or(default.filter(|d| !d.is_empty()))
            .map(str::to_string)
            .ok_or_else(|| FixError::ConfigurationMissing {
                name: name.to_string(),
            })
    }

    /// Worker count override from `processes`, if set. Must be a positive integer.
    pub fn processes(&self) -> FixResult<Option<usize>> {
        match self.get(PROCESSES_VAR) {
            None => Ok(None),
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(Some(n)),
                _ => Err(FixError::config(format!(
                    "`{PROCESSES_VAR}` must be a positive integer, got `{raw}`"
                ))),
            },
        }
    }
}
