// crates/tagwarden-config/src/config.rs
// ============================================================================
// Module: Tagwarden Configuration
// Description: Configuration loading and validation for the tagging policy.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: tagwarden-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The parsed model converts into a validated core [`TagPolicy`]; any policy
//! inconsistency surfaces here, at initialization, so evaluation never sees
//! an invalid policy. Config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use tagwarden_core::EnforcementLevel;
use tagwarden_core::PolicyValidationError;
use tagwarden_core::TagPolicy;
use tagwarden_core::TagPolicyPack;
use tagwarden_core::TaggabilityOracle;
use tagwarden_core::runtime::DEFAULT_PACK_NAME;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "tagwarden.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "TAGWARDEN_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Tagwarden configuration root.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagwardenConfig {
    /// Policy pack registration settings.
    #[serde(default)]
    pub pack: PackConfig,
    /// Required-tag policy settings.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Optional check toggles.
    #[serde(default)]
    pub checks: ChecksConfig,
}

impl TagwardenConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|err| ConfigError::Invalid(format!("config is not valid utf-8: {err}")))?;
        Self::from_toml_str(content)
    }

    /// Parses configuration from a TOML string and validates the policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or policy validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.to_policy()?;
        Ok(config)
    }

    /// Converts the parsed model into a validated core policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the policy is inconsistent.
    pub fn to_policy(&self) -> Result<TagPolicy, ConfigError> {
        let policy = TagPolicy {
            required_tags: self.policy.required_tags.clone(),
            tag_derivatives: self.policy.tag_derivatives.clone(),
            time_tags: self.policy.time_tags.clone(),
            timed_type_markers: self.policy.timed_type_markers.clone(),
            stack_tags: self.policy.stack_tags.clone(),
            environment_values: self.policy.environment_values.clone(),
            check_stack_tags: self.checks.stack_tags,
            check_date_formats: self.checks.date_formats,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Builds a policy pack from this configuration and a taggability oracle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the policy is inconsistent.
    pub fn into_pack<O: TaggabilityOracle>(
        self,
        oracle: O,
    ) -> Result<TagPolicyPack<O>, ConfigError> {
        let policy = self.to_policy()?;
        let pack = TagPolicyPack::new(policy, oracle)?
            .with_name(self.pack.name)
            .with_enforcement(self.pack.enforcement);
        Ok(pack)
    }
}

/// Policy pack registration settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackConfig {
    /// Pack name registered with the provisioning engine.
    #[serde(default = "default_pack_name")]
    pub name: String,
    /// Enforcement level (advisory by default).
    #[serde(default)]
    pub enforcement: EnforcementLevel,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            name: default_pack_name(),
            enforcement: EnforcementLevel::default(),
        }
    }
}

/// Required-tag policy settings.
///
/// Field defaults mirror the default core policy, so an empty `[policy]`
/// table evaluates the stock tagging rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Canonical tag names that must be present on taggable resources.
    #[serde(default = "default_required_tags")]
    pub required_tags: Vec<String>,
    /// Alias substrings per canonical tag name.
    #[serde(default = "default_tag_derivatives")]
    pub tag_derivatives: BTreeMap<String, Vec<String>>,
    /// Lifecycle tags required only for timed resources.
    #[serde(default = "default_time_tags")]
    pub time_tags: Vec<String>,
    /// Case-sensitive type-token substrings identifying timed resources.
    #[serde(default = "default_timed_type_markers")]
    pub timed_type_markers: Vec<String>,
    /// Provisioning-stack bookkeeping tags.
    #[serde(default = "default_stack_tags")]
    pub stack_tags: Vec<String>,
    /// Allowed values for the environment tag.
    #[serde(default = "default_environment_values")]
    pub environment_values: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            required_tags: default_required_tags(),
            tag_derivatives: default_tag_derivatives(),
            time_tags: default_time_tags(),
            timed_type_markers: default_timed_type_markers(),
            stack_tags: default_stack_tags(),
            environment_values: default_environment_values(),
        }
    }
}

/// Optional check toggles.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChecksConfig {
    /// Enables the stack-tags check.
    #[serde(default)]
    pub stack_tags: bool,
    /// Enables the calendar-date format check for lifecycle tags.
    #[serde(default)]
    pub date_formats: bool,
}

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Policy inconsistency detected during conversion.
    #[error("invalid policy config: {0}")]
    Policy(#[from] PolicyValidationError),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Returns the default pack name.
fn default_pack_name() -> String {
    DEFAULT_PACK_NAME.to_string()
}

/// Returns the default required tag names.
fn default_required_tags() -> Vec<String> {
    TagPolicy::default().required_tags
}

/// Returns the default derivative alias mapping.
fn default_tag_derivatives() -> BTreeMap<String, Vec<String>> {
    TagPolicy::default().tag_derivatives
}

/// Returns the default lifecycle tag names.
fn default_time_tags() -> Vec<String> {
    TagPolicy::default().time_tags
}

/// Returns the default timed-resource type markers.
fn default_timed_type_markers() -> Vec<String> {
    TagPolicy::default().timed_type_markers
}

/// Returns the default stack bookkeeping tag names.
fn default_stack_tags() -> Vec<String> {
    TagPolicy::default().stack_tags
}

/// Returns the default allowed environment values.
fn default_environment_values() -> Vec<String> {
    TagPolicy::default().environment_values
}
