// crates/tagwarden-taxonomy/src/registry.rs
// ============================================================================
// Module: Taggable Type Registry
// Description: Rule-table classifier for taggable resource types.
// Purpose: Answer taggability queries with deterministic, default-deny rules.
// Dependencies: tagwarden-core, serde
// ============================================================================

//! ## Overview
//! The registry classifies resource type tokens against an ordered rule table
//! with an exception list that overrides it. Unknown types are non-taggable
//! by default, so resources that cannot carry tags never accumulate spurious
//! violations. The builtin table covers the common AWS taggable types; hosts
//! with other providers supply their own rules.
//! Invariants:
//! - `exceptions` override `rules` when both match.
//! - Classification is a pure function of the type token.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use tagwarden_core::ResourceType;
use tagwarden_core::TaggabilityOracle;

// ============================================================================
// SECTION: Type Rules
// ============================================================================

/// One classification rule over a resource type token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", content = "token", rename_all = "snake_case")]
pub enum TypeRule {
    /// Matches the full type token exactly.
    Exact(String),
    /// Matches any type token starting with the prefix.
    Prefix(String),
    /// Matches any type token containing the substring.
    Contains(String),
}

impl TypeRule {
    /// Returns true when the rule matches the type token (case-sensitive).
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Self::Exact(expected) => token == expected,
            Self::Prefix(prefix) => token.starts_with(prefix.as_str()),
            Self::Contains(needle) => token.contains(needle.as_str()),
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Rule-table taggability classifier.
///
/// # Invariants
/// - Exceptions override taggable rules when both match.
/// - Types matching no rule are non-taggable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggableRegistry {
    /// Rules marking resource types as taggable.
    rules: Vec<TypeRule>,
    /// Exceptions that are never taggable even when a rule matches.
    exceptions: Vec<TypeRule>,
}

impl TaggableRegistry {
    /// Creates a registry from explicit rules and exceptions.
    #[must_use]
    pub const fn new(rules: Vec<TypeRule>, exceptions: Vec<TypeRule>) -> Self {
        Self {
            rules,
            exceptions,
        }
    }

    /// Returns the registry covering the common AWS taggable types.
    #[must_use]
    pub fn builtin_aws() -> Self {
        let rules = BUILTIN_AWS_TAGGABLE.iter().map(|token| TypeRule::Exact((*token).to_string()));
        Self {
            rules: rules.collect(),
            exceptions: Vec::new(),
        }
    }

    /// Returns true when the type token is classified as taggable.
    #[must_use]
    pub fn is_type_taggable(&self, token: &str) -> bool {
        if self.exceptions.iter().any(|rule| rule.matches(token)) {
            return false;
        }
        self.rules.iter().any(|rule| rule.matches(token))
    }
}

impl TaggabilityOracle for TaggableRegistry {
    fn is_taggable(&self, resource_type: &ResourceType) -> bool {
        self.is_type_taggable(resource_type.as_str())
    }
}

// ============================================================================
// SECTION: Builtin Table
// ============================================================================

/// Common AWS resource types that carry key/value tags.
const BUILTIN_AWS_TAGGABLE: [&str; 32] = [
    "aws:accessanalyzer/analyzer:Analyzer",
    "aws:acm/certificate:Certificate",
    "aws:autoscaling/group:Group",
    "aws:cloudformation/stack:Stack",
    "aws:cloudfront/distribution:Distribution",
    "aws:cloudtrail/trail:Trail",
    "aws:dynamodb/table:Table",
    "aws:ebs/snapshot:Snapshot",
    "aws:ebs/volume:Volume",
    "aws:ec2/instance:Instance",
    "aws:ec2/launchTemplate:LaunchTemplate",
    "aws:ec2/natGateway:NatGateway",
    "aws:ec2/securityGroup:SecurityGroup",
    "aws:ec2/subnet:Subnet",
    "aws:ec2/vpc:Vpc",
    "aws:ecr/repository:Repository",
    "aws:ecs/cluster:Cluster",
    "aws:ecs/service:Service",
    "aws:efs/fileSystem:FileSystem",
    "aws:eks/cluster:Cluster",
    "aws:elasticache/cluster:Cluster",
    "aws:iam/role:Role",
    "aws:kinesis/stream:Stream",
    "aws:kms/key:Key",
    "aws:lambda/function:Function",
    "aws:lb/loadBalancer:LoadBalancer",
    "aws:rds/cluster:Cluster",
    "aws:rds/instance:Instance",
    "aws:redshift/cluster:Cluster",
    "aws:s3/bucket:Bucket",
    "aws:sns/topic:Topic",
    "aws:sqs/queue:Queue",
];
