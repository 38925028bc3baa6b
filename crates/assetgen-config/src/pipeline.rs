use serde::Deserialize;

/// Request validation switches
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Reject requests without a `type` tag
    #[serde(default = "default_require_type")]
    pub require_type: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            require_type: default_require_type(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_require_type() -> bool {
    true
}
