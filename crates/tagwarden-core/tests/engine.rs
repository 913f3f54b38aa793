// crates/tagwarden-core/tests/engine.rs
// ============================================================================
// Module: Evaluation Facade Tests
// Description: Validate end-to-end pack evaluation and reporter behavior.
// Purpose: Ensure taggability gating, ordering, idempotence, and sinks work.
// Dependencies: tagwarden-core, serde_json
// ============================================================================

//! Policy pack evaluation tests over the default tag policy.

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

use serde_json::Value;
use serde_json::json;
use tagwarden_core::CollectingReporter;
use tagwarden_core::EnforcementLevel;
use tagwarden_core::LogReporter;
use tagwarden_core::PolicyValidationError;
use tagwarden_core::ResourceDescriptor;
use tagwarden_core::ResourceType;
use tagwarden_core::TagPolicy;
use tagwarden_core::TagPolicyPack;
use tagwarden_core::TaggabilityOracle;
use tagwarden_core::ViolationKind;
use tagwarden_core::runtime::DEFAULT_PACK_NAME;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Oracle answering the same classification for every resource type.
#[derive(Debug, Clone, Copy)]
struct StaticOracle {
    /// Classification returned for every query.
    taggable: bool,
}

impl TaggabilityOracle for StaticOracle {
    fn is_taggable(&self, _resource_type: &ResourceType) -> bool {
        self.taggable
    }
}

/// Builds a pack over the default policy with a fixed oracle answer.
fn default_pack(taggable: bool) -> TagPolicyPack<StaticOracle> {
    TagPolicyPack::new(
        TagPolicy::default(),
        StaticOracle {
            taggable,
        },
    )
    .unwrap_or_else(|err| panic!("default policy must validate: {err}"))
}

/// Builds the ec2 instance descriptor used by the scenario tests.
fn ec2_instance(properties: Value) -> ResourceDescriptor {
    ResourceDescriptor::new("aws:ec2/instance:Instance", "urn:test:web-server", properties)
}

// ============================================================================
// SECTION: Taggability Gating
// ============================================================================

/// Tests non-taggable resources produce zero violations regardless of tags.
#[test]
fn non_taggable_resources_are_skipped() {
    let pack = default_pack(false);
    let resource = ec2_instance(json!({"tags": "garbage"}));
    let violations = pack.evaluate_collect(&resource).unwrap_or_else(|err| panic!("sink: {err}"));
    assert!(violations.is_empty());
}

/// Tests disabled enforcement skips evaluation entirely.
#[test]
fn disabled_enforcement_skips_evaluation() {
    let pack = default_pack(true).with_enforcement(EnforcementLevel::Disabled);
    let resource = ec2_instance(json!({"name": "untagged"}));
    let violations = pack.evaluate_collect(&resource).unwrap_or_else(|err| panic!("sink: {err}"));
    assert!(violations.is_empty());
}

// ============================================================================
// SECTION: Scenario Coverage
// ============================================================================

/// Tests the timed-resource scenario: fully tagged except backup-by.
#[test]
fn ec2_missing_backup_by_yields_one_violation() {
    let pack = default_pack(true);
    let resource = ec2_instance(json!({"tags": {
        "application": "web",
        "cost-center": "390",
        "environment": "prod",
        "product": "x",
        "product-area": "y",
        "delete-after": "2025-01-01",
    }}));
    let violations = pack.evaluate_collect(&resource).unwrap_or_else(|err| panic!("sink: {err}"));
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].kind,
        ViolationKind::MissingRequiredTag {
            tag: "backup-by".to_string(),
        }
    );
    assert_eq!(
        violations[0].message(),
        "Taggable resource 'urn:test:web-server' is missing required tag 'backup-by'"
    );
}

/// Tests an untagged taggable resource reports presence exactly once, with no
/// duplicate missing-tag messages from the required-tags check.
#[test]
fn untagged_resource_reports_presence_once() {
    let pack = default_pack(true);
    let resource = ec2_instance(json!({"name": "untagged"}));
    let violations = pack.evaluate_collect(&resource).unwrap_or_else(|err| panic!("sink: {err}"));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::NoTags);
    assert_eq!(
        violations[0].message(),
        "Taggable resource 'urn:test:web-server' does not have any tags"
    );
}

/// Tests unsupported storage reports the shape but still runs other checks.
#[test]
fn unsupported_storage_reports_shape_once() {
    let pack = default_pack(true);
    let resource = ec2_instance(json!({"tags": ["scalar", 12]}));
    // An array of non-record elements extracts as an empty ordered-pairs set,
    // so required and timed checks still see a tag set.
    let violations = pack.evaluate_collect(&resource).unwrap_or_else(|err| panic!("sink: {err}"));
    assert_eq!(violations.len(), 7);

    let scalar = ec2_instance(json!({"tags": true}));
    let violations = pack.evaluate_collect(&scalar).unwrap_or_else(|err| panic!("sink: {err}"));
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].kind,
        ViolationKind::UnsupportedTagShape {
            found: "boolean".to_string(),
        }
    );
}

/// Tests check order: presence, required, timed, then environment findings.
#[test]
fn violations_follow_check_order() {
    let pack = default_pack(true);
    let resource = ec2_instance(json!({"tags": {
        "application": "web",
        "environment": "Production",
    }}));
    let violations = pack.evaluate_collect(&resource).unwrap_or_else(|err| panic!("sink: {err}"));
    let kinds: Vec<&ViolationKind> = violations.iter().map(|violation| &violation.kind).collect();
    // Missing: cost-center, environment... environment is present; required
    // misses cost-center, product, product-area; timed misses both lifecycle
    // tags; environment value is invalid.
    assert_eq!(violations.len(), 6);
    assert!(matches!(kinds[0], ViolationKind::MissingRequiredTag { tag } if tag == "cost-center"));
    assert!(matches!(kinds[1], ViolationKind::MissingRequiredTag { tag } if tag == "product"));
    assert!(
        matches!(kinds[2], ViolationKind::MissingRequiredTag { tag } if tag == "product-area")
    );
    assert!(matches!(kinds[3], ViolationKind::MissingRequiredTag { tag } if tag == "backup-by"));
    assert!(
        matches!(kinds[4], ViolationKind::MissingRequiredTag { tag } if tag == "delete-after")
    );
    assert!(matches!(kinds[5], ViolationKind::InvalidEnvironmentValue { .. }));
}

/// Tests evaluation is idempotent over an immutable descriptor.
#[test]
fn evaluation_is_idempotent() {
    let pack = default_pack(true);
    let resource = ec2_instance(json!({"tags": {"App": "web", "environment": "qa"}}));
    let first = pack.evaluate_collect(&resource).unwrap_or_else(|err| panic!("sink: {err}"));
    let second = pack.evaluate_collect(&resource).unwrap_or_else(|err| panic!("sink: {err}"));
    let first_messages: Vec<String> = first.iter().map(|v| v.message()).collect();
    let second_messages: Vec<String> = second.iter().map(|v| v.message()).collect();
    assert_eq!(first_messages, second_messages);
}

/// Tests the date-format check participates once enabled by policy.
#[test]
fn date_format_check_runs_when_enabled() {
    let policy = TagPolicy {
        check_date_formats: true,
        ..TagPolicy::default()
    };
    let pack = TagPolicyPack::new(
        policy,
        StaticOracle {
            taggable: true,
        },
    )
    .unwrap_or_else(|err| panic!("policy must validate: {err}"));
    let resource = ec2_instance(json!({"tags": {
        "application": "web",
        "cost-center": "390",
        "environment": "prod",
        "product": "x",
        "product-area": "y",
        "backup-by": "someday",
        "delete-after": "Never",
    }}));
    let violations = pack.evaluate_collect(&resource).unwrap_or_else(|err| panic!("sink: {err}"));
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].kind,
        ViolationKind::InvalidDateValue {
            tag: "backup-by".to_string(),
            value: "someday".to_string(),
        }
    );
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Tests pack construction fails loudly on inconsistent policy.
#[test]
fn inconsistent_policy_fails_construction() {
    let mut policy = TagPolicy::default();
    policy
        .tag_derivatives
        .insert("owner".to_string(), vec!["own".to_string()]);
    let result = TagPolicyPack::new(
        policy,
        StaticOracle {
            taggable: true,
        },
    );
    match result {
        Err(PolicyValidationError::DerivativeNotRequired {
            canonical,
        }) => assert_eq!(canonical, "owner"),
        other => panic!("expected derivative validation failure, got {other:?}"),
    }
}

/// Tests the default pack name and override.
#[test]
fn pack_name_defaults_and_overrides() {
    let pack = default_pack(true);
    assert_eq!(pack.name(), DEFAULT_PACK_NAME);
    let renamed = default_pack(true).with_name("team-tagging");
    assert_eq!(renamed.name(), "team-tagging");
}

// ============================================================================
// SECTION: Reporters
// ============================================================================

/// Tests the collecting reporter preserves report order and drains once.
#[test]
fn collecting_reporter_preserves_order() {
    let pack = default_pack(true);
    let resource = ec2_instance(json!({"tags": {"product": "x"}}));
    let reporter = CollectingReporter::new();
    pack.evaluate(&resource, &reporter).unwrap_or_else(|err| panic!("sink: {err}"));
    let drained = reporter.drain();
    assert!(!drained.is_empty());
    assert!(reporter.drain().is_empty());
}

/// Tests the log reporter writes one parseable JSON record per violation.
#[test]
fn log_reporter_writes_json_records() {
    let pack = default_pack(true);
    let resource = ec2_instance(json!({"name": "untagged"}));
    let reporter = LogReporter::new(Vec::new());
    pack.evaluate(&resource, &reporter).unwrap_or_else(|err| panic!("sink: {err}"));
    let buffer = reporter.into_inner().unwrap_or_else(|err| panic!("writer: {err}"));
    let output = String::from_utf8(buffer).expect("utf8 log output");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 1);
    let record: Value = serde_json::from_str(lines[0]).expect("parse json record");
    assert_eq!(record["urn"], "urn:test:web-server");
    assert_eq!(record["violation"]["kind"], "no_tags");
    assert_eq!(
        record["message"],
        "Taggable resource 'urn:test:web-server' does not have any tags"
    );
}

/// Tests reporter sinks accept concurrent appends from multiple threads.
#[test]
fn collecting_reporter_supports_concurrent_appends() {
    let pack = default_pack(true);
    let reporter = CollectingReporter::new();
    std::thread::scope(|scope| {
        for index in 0 .. 4 {
            let pack = &pack;
            let reporter = &reporter;
            scope.spawn(move || {
                let resource = ResourceDescriptor::new(
                    "aws:ec2/instance:Instance",
                    format!("urn:test:worker-{index}"),
                    json!({"name": "untagged"}),
                );
                pack.evaluate(&resource, reporter).unwrap_or_else(|err| panic!("sink: {err}"));
            });
        }
    });
    assert_eq!(reporter.drain().len(), 4);
}
