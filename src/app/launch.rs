use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config;
use crate::error::ContextError;

/// Opaque launch parameter bag.
///
/// This layer never looks inside; schema validation belongs to the
/// receiving application module.
pub type Params = serde_json::Map<String, Value>;

/// Policy governing how a launch affects existing instances of the same
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaunchMode {
    /// Always create a new instance at the tail.
    Push,
    /// Promote the most recent instance with the name; create otherwise.
    Singleton,
    /// Reuse the current instance when its name matches; create otherwise.
    SingleTop,
    /// Remove every instance with the name, then create a new one.
    ClearTop,
}

impl Default for LaunchMode {
    fn default() -> Self {
        LaunchMode::Push
    }
}

impl LaunchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchMode::Push => "push",
            LaunchMode::Singleton => "singleton",
            LaunchMode::SingleTop => "singleTop",
            LaunchMode::ClearTop => "clearTop",
        }
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaunchMode {
    type Err = ContextError;

    /// Unknown values are rejected, never silently defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(LaunchMode::Push),
            "singleton" => Ok(LaunchMode::Singleton),
            "singleTop" => Ok(LaunchMode::SingleTop),
            "clearTop" => Ok(LaunchMode::ClearTop),
            other => Err(ContextError::InvalidLaunchMode(other.to_string())),
        }
    }
}

/// One launch request, consumed by a single resolution pass.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    /// Application name; non-unique across instances.
    pub name: String,
    /// Opaque parameters handed to the launched application.
    pub params: Params,
    pub launch_mode: LaunchMode,
    /// Identity of the launcher, when known.
    pub source_id: Option<String>,
    /// When false, clear-top launches degrade to plain pushes.
    pub app_clear_top: bool,
    /// Presentation hint forwarded to the presenter; no model effect.
    pub animated: bool,
}

impl LaunchRequest {
    /// New push-mode request with the process-wide animation default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Params::new(),
            launch_mode: LaunchMode::default(),
            source_id: None,
            app_clear_top: true,
            animated: config::context_config().default_animated,
        }
    }

    /// Replace the whole parameter bag.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Insert a single parameter, keeping the rest of the bag.
    pub fn param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    pub fn with_launch_mode(mut self, mode: LaunchMode) -> Self {
        self.launch_mode = mode;
        self
    }

    pub fn with_source_id(mut self, source: impl Into<String>) -> Self {
        self.source_id = Some(source.into());
        self
    }

    pub fn with_clear_top(mut self, clear: bool) -> Self {
        self.app_clear_top = clear;
        self
    }

    pub fn with_animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }
}
