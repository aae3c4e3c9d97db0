//! Engine configuration.
//!
//! Acceleration and instrumentation switches live here rather than in
//! process-wide flags, so engines with different configurations can coexist
//! (and tests can run in parallel). Pass a config to
//! [`GameBuilder::with_config`](crate::engine::GameBuilder::with_config).

use serde::{Deserialize, Serialize};

/// How a leaf phase's rules are applied to one event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleEvaluation {
    /// The first rule whose condition is valid applies; evaluation stops.
    #[default]
    FirstMatch,
    /// Every valid rule applies in declaration order, each seeing the state
    /// produced by the previous one.
    Cascade,
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Resolve paths through the precompiled pattern table.
    pub compiled_patterns: bool,

    /// Maintain bitboard occupancy snapshots and attack rays.
    pub bitboards: bool,

    /// Patch bitboards for changed pieces instead of rebuilding.
    /// Off by default: full rebuild is the correctness baseline.
    pub incremental_bitboards: bool,

    /// Compare every incremental patch against a full rebuild.
    pub verify_incremental: bool,

    /// Buffer observer callbacks and dispatch them in batches.
    pub observer_batching: bool,

    /// Buffer size for batched observer dispatch.
    pub batch_capacity: usize,

    /// Fingerprint every resulting state and report it to observers.
    pub hash_states: bool,

    /// Rule application mode for leaf phases.
    pub rule_evaluation: RuleEvaluation,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            compiled_patterns: true,
            bitboards: true,
            incremental_bitboards: false,
            verify_incremental: true,
            observer_batching: false,
            batch_capacity: 16,
            hash_states: true,
            rule_evaluation: RuleEvaluation::FirstMatch,
        }
    }
}

impl EngineConfig {
    /// Configuration with every acceleration disabled (reference behaviour).
    #[must_use]
    pub fn baseline() -> Self {
        Self {
            compiled_patterns: false,
            bitboards: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_compiled_patterns(mut self, enabled: bool) -> Self {
        self.compiled_patterns = enabled;
        self
    }

    #[must_use]
    pub fn with_bitboards(mut self, enabled: bool) -> Self {
        self.bitboards = enabled;
        self
    }

    /// Enable incremental bitboard patching (with or without verification).
    #[must_use]
    pub fn with_incremental_bitboards(mut self, enabled: bool, verify: bool) -> Self {
        self.incremental_bitboards = enabled;
        self.verify_incremental = verify;
        self
    }

    /// Enable batched observer dispatch with the given buffer size.
    #[must_use]
    pub fn with_observer_batching(mut self, capacity: usize) -> Self {
        self.observer_batching = true;
        self.batch_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_state_hashing(mut self, enabled: bool) -> Self {
        self.hash_states = enabled;
        self
    }

    #[must_use]
    pub fn with_rule_evaluation(mut self, mode: RuleEvaluation) -> Self {
        self.rule_evaluation = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.compiled_patterns);
        assert!(config.bitboards);
        assert!(!config.incremental_bitboards);
        assert!(!config.observer_batching);
        assert_eq!(config.rule_evaluation, RuleEvaluation::FirstMatch);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::baseline()
            .with_observer_batching(0)
            .with_rule_evaluation(RuleEvaluation::Cascade);

        assert!(!config.compiled_patterns);
        assert!(config.observer_batching);
        assert_eq!(config.batch_capacity, 1);
        assert_eq!(config.rule_evaluation, RuleEvaluation::Cascade);
    }

    #[test]
    fn test_serialization() {
        let config = EngineConfig::default().with_incremental_bitboards(true, false);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
