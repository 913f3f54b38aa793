// crates/tagwarden-config/tests/config_defaults.rs
// ============================================================================
// Module: Config Defaults Tests
// Description: Validate default values of the tagwarden configuration model.
// Purpose: Ensure an empty config evaluates the stock tagging rules.
// Dependencies: tagwarden-config, tagwarden-core
// ============================================================================

//! Default-value tests for the configuration model.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use tagwarden_config::TagwardenConfig;
use tagwarden_core::EnforcementLevel;
use tagwarden_core::TagPolicy;
use tagwarden_core::runtime::DEFAULT_PACK_NAME;

/// Tests an empty document parses into the full default configuration.
#[test]
fn empty_document_yields_defaults() {
    let config = TagwardenConfig::from_toml_str("").expect("empty config parses");
    assert_eq!(config.pack.name, DEFAULT_PACK_NAME);
    assert_eq!(config.pack.enforcement, EnforcementLevel::Advisory);
    assert!(!config.checks.stack_tags);
    assert!(!config.checks.date_formats);
    let policy = config.to_policy().expect("default policy validates");
    assert_eq!(policy, TagPolicy::default());
}

/// Tests the default policy carries the stock required tags in order.
#[test]
fn default_required_tags_are_stable() {
    let config = TagwardenConfig::from_toml_str("").expect("empty config parses");
    let policy = config.to_policy().expect("default policy validates");
    assert_eq!(
        policy.required_tags,
        vec!["application", "cost-center", "environment", "product", "product-area"]
    );
    assert_eq!(policy.time_tags, vec!["backup-by", "delete-after"]);
    assert_eq!(policy.timed_type_markers, vec!["ec2", "ebs"]);
    assert_eq!(
        policy.environment_values,
        vec!["sandbox", "dev", "test", "staging", "alpha", "alpha2", "prod"]
    );
    assert_eq!(policy.aliases_of("application"), &["app".to_string()]);
}

/// Tests a partial policy table keeps unlisted fields at their defaults.
#[test]
fn partial_policy_table_keeps_defaults() {
    let config = TagwardenConfig::from_toml_str(
        r#"
        [policy]
        required_tags = ["application", "owner"]
        tag_derivatives = {}
        "#,
    )
    .expect("partial config parses");
    let policy = config.to_policy().expect("policy validates");
    assert_eq!(policy.required_tags, vec!["application", "owner"]);
    assert_eq!(policy.time_tags, TagPolicy::default().time_tags);
    assert_eq!(policy.environment_values, TagPolicy::default().environment_values);
}

/// Tests check toggles flow into the converted policy.
#[test]
fn check_toggles_reach_the_policy() {
    let config = TagwardenConfig::from_toml_str(
        r"
        [checks]
        stack_tags = true
        date_formats = true
        ",
    )
    .expect("config parses");
    let policy = config.to_policy().expect("policy validates");
    assert!(policy.check_stack_tags);
    assert!(policy.check_date_formats);
}
