// crates/tagwarden-core/src/runtime/engine.rs
// ============================================================================
// Module: Tagwarden Evaluation Facade
// Description: Policy pack facade and reference violation reporters.
// Purpose: Run the enabled checks per resource and deliver violations.
// Dependencies: crate::core, crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! The [`TagPolicyPack`] holds the validated policy, the taggability oracle,
//! and the ordered enabled checks. Evaluation consults the oracle once per
//! resource, extracts tags once, and runs every enabled check in declared
//! order, converting internal check faults into diagnostic violations so no
//! fault aborts the remaining checks or other resources.
//! Invariants:
//! - Non-taggable resource types produce zero violations regardless of tags.
//! - Evaluating the same immutable descriptor twice yields identical ordered
//!   violation sequences.
//! - Enforcement is advisory; evaluation never blocks provisioning.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::sync::Mutex;

use crate::core::EnforcementLevel;
use crate::core::PolicyValidationError;
use crate::core::ResourceDescriptor;
use crate::core::TagPolicy;
use crate::core::Violation;
use crate::core::ViolationKind;
use crate::core::extract_tags;
use crate::interfaces::ReportError;
use crate::interfaces::TaggabilityOracle;
use crate::interfaces::ViolationReporter;
use crate::runtime::checks::RuleCheck;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default policy pack name.
pub const DEFAULT_PACK_NAME: &str = "tagging-policy";
/// Default name of the tag-compliance policy within the pack.
pub const DEFAULT_POLICY_NAME: &str = "check-for-tags";

// ============================================================================
// SECTION: Policy Pack Facade
// ============================================================================

/// Advisory tag-compliance policy pack.
///
/// # Invariants
/// - The policy is validated at construction and immutable afterwards.
/// - The check list and its order are fixed for the pack's lifetime.
#[derive(Debug)]
pub struct TagPolicyPack<O> {
    /// Pack name used for registration with the provisioning engine.
    name: String,
    /// Enforcement level (advisory by default; never blocking).
    enforcement: EnforcementLevel,
    /// Validated required-tag policy.
    policy: TagPolicy,
    /// Taggability classifier consulted before any check runs.
    oracle: O,
    /// Enabled checks in declared order.
    checks: Vec<RuleCheck>,
}

impl<O: TaggabilityOracle> TagPolicyPack<O> {
    /// Creates a pack from a policy and taggability oracle.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyValidationError`] when the policy is inconsistent;
    /// this fails loudly at initialization, before any evaluation.
    pub fn new(policy: TagPolicy, oracle: O) -> Result<Self, PolicyValidationError> {
        policy.validate()?;
        let checks = enabled_checks(&policy);
        Ok(Self {
            name: DEFAULT_PACK_NAME.to_string(),
            enforcement: EnforcementLevel::Advisory,
            policy,
            oracle,
            checks,
        })
    }

    /// Overrides the pack name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Overrides the enforcement level.
    #[must_use]
    pub const fn with_enforcement(mut self, enforcement: EnforcementLevel) -> Self {
        self.enforcement = enforcement;
        self
    }

    /// Returns the pack name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the enforcement level.
    #[must_use]
    pub const fn enforcement(&self) -> EnforcementLevel {
        self.enforcement
    }

    /// Returns the validated policy.
    #[must_use]
    pub const fn policy(&self) -> &TagPolicy {
        &self.policy
    }

    /// Returns the enabled checks in declared order.
    #[must_use]
    pub fn checks(&self) -> &[RuleCheck] {
        &self.checks
    }

    /// Evaluates one resource, reporting violations into the sink.
    ///
    /// Non-taggable resource types skip all checks. Internal check faults are
    /// converted into diagnostic violations and reported like any other
    /// finding.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] only when the sink itself fails; policy
    /// findings are never an error.
    pub fn evaluate(
        &self,
        resource: &ResourceDescriptor,
        reporter: &dyn ViolationReporter,
    ) -> Result<(), ReportError> {
        if self.enforcement == EnforcementLevel::Disabled {
            return Ok(());
        }
        if !self.oracle.is_taggable(&resource.resource_type) {
            return Ok(());
        }
        let storage = extract_tags(&resource.properties);
        for check in &self.checks {
            match check.run(resource, &storage, &self.policy) {
                Ok(violations) => {
                    for violation in violations {
                        reporter.report(violation)?;
                    }
                }
                Err(fault) => {
                    reporter.report(Violation::new(
                        resource.urn.clone(),
                        ViolationKind::CheckFailed {
                            check: fault.check.to_string(),
                            detail: fault.detail,
                        },
                    ))?;
                }
            }
        }
        Ok(())
    }

    /// Evaluates one resource into an ordered violation list.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the internal collector fails.
    pub fn evaluate_collect(
        &self,
        resource: &ResourceDescriptor,
    ) -> Result<Vec<Violation>, ReportError> {
        let reporter = CollectingReporter::new();
        self.evaluate(resource, &reporter)?;
        Ok(reporter.drain())
    }
}

/// Builds the enabled check list for a policy, in declared order.
fn enabled_checks(policy: &TagPolicy) -> Vec<RuleCheck> {
    let mut checks = vec![RuleCheck::Presence, RuleCheck::RequiredTags, RuleCheck::TimedTags];
    if policy.check_stack_tags {
        checks.push(RuleCheck::StackTags);
    }
    checks.push(RuleCheck::EnvironmentValue);
    if policy.check_date_formats {
        checks.push(RuleCheck::DateFormat);
    }
    checks
}

// ============================================================================
// SECTION: Collecting Reporter
// ============================================================================

/// Thread-safe reporter accumulating violations in report order.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    /// Accumulated violations.
    violations: Mutex<Vec<Violation>>,
}

impl CollectingReporter {
    /// Creates an empty collecting reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the accumulated violations, leaving the collector empty.
    #[must_use]
    pub fn drain(&self) -> Vec<Violation> {
        self.violations.lock().map_or_else(|_| Vec::new(), |mut guard| std::mem::take(&mut *guard))
    }

    /// Returns the rendered messages of the accumulated violations, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.violations.lock().map_or_else(
            |_| Vec::new(),
            |guard| guard.iter().map(Violation::message).collect(),
        )
    }
}

impl ViolationReporter for CollectingReporter {
    fn report(&self, violation: Violation) -> Result<(), ReportError> {
        let mut guard = self
            .violations
            .lock()
            .map_err(|_| ReportError::SinkWrite("violation collector lock poisoned".to_string()))?;
        guard.push(violation);
        Ok(())
    }
}

// ============================================================================
// SECTION: Log Reporter
// ============================================================================

/// Reporter writing one JSON record per violation to a writer.
#[derive(Debug)]
pub struct LogReporter<W> {
    /// Underlying writer guarded for concurrent appends.
    writer: Mutex<W>,
}

impl<W: io::Write + Send> LogReporter<W> {
    /// Creates a log reporter over a writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the reporter and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the writer lock is poisoned.
    pub fn into_inner(self) -> Result<W, ReportError> {
        self.writer
            .into_inner()
            .map_err(|_| ReportError::SinkWrite("log writer lock poisoned".to_string()))
    }
}

impl<W: io::Write + Send> ViolationReporter for LogReporter<W> {
    fn report(&self, violation: Violation) -> Result<(), ReportError> {
        let message = violation.message();
        let record = serde_json::json!({
            "urn": violation.urn,
            "message": message,
            "violation": violation.kind,
        });
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| ReportError::SinkWrite("log writer lock poisoned".to_string()))?;
        serde_json::to_writer(&mut *guard, &record)
            .map_err(|err| ReportError::SinkWrite(err.to_string()))?;
        guard.write_all(b"\n").map_err(|err| ReportError::SinkWrite(err.to_string()))
    }
}
