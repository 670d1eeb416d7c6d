// crates/trellis-graph/src/config.rs
//
// Engine configuration. Loaded from a TOML file or populated with defaults,
// then adjustable at runtime by an administrator. Every write is validated.

use std::fs;

use serde::{Deserialize, Serialize};

use trellis_core::bps::{is_valid_bps, BPS_DENOMINATOR};
use trellis_core::{SubScoreWeights, TrellisError};
use trellis_economics::slashing::{DEFAULT_CHALLENGER_SHARE_BPS, DEFAULT_DISPUTE_SLASH_BPS};
use trellis_economics::{RewardSchedule, UNITS_PER_TRL};

const DAY_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum stake (base units) that must back a new edge.
    #[serde(default = "default_min_edge_stake")]
    pub min_edge_stake: u64,

    /// Cycle search gives up (assumes no cycle) past this many hops.
    #[serde(default = "default_max_cycle_search_depth")]
    pub max_cycle_search_depth: u32,

    /// Share of the intrinsic score kept regardless of dependency strength.
    #[serde(default = "default_propagation_floor_bps")]
    pub propagation_floor_bps: u64,

    /// Share of the intrinsic score scaled by the weakest dependency.
    #[serde(default = "default_propagation_damping_bps")]
    pub propagation_damping_bps: u64,

    /// Multiplier reduction per Active Contradicts edge.
    #[serde(default = "default_contradiction_penalty_bps")]
    pub contradiction_penalty_bps: u64,

    /// The contradiction multiplier never drops below this.
    #[serde(default = "default_contradiction_floor_bps")]
    pub contradiction_floor_bps: u64,

    /// Flags resolved within this many seconds of being raised earn the bounty.
    #[serde(default = "default_weak_link_window_secs")]
    pub weak_link_window_secs: u64,

    /// Seconds an edge must stay Active before its maturity reward can be claimed.
    #[serde(default = "default_edge_maturity_secs")]
    pub edge_maturity_secs: u64,

    #[serde(default = "default_dispute_slash_bps")]
    pub dispute_slash_bps: u64,

    /// Challenger's share of the post-slash remainder.
    #[serde(default = "default_challenger_share_bps")]
    pub challenger_share_bps: u64,

    #[serde(default)]
    pub intrinsic_weights: SubScoreWeights,

    #[serde(default)]
    pub rewards: RewardSchedule,
}

fn default_min_edge_stake() -> u64 {
    100 * UNITS_PER_TRL
}

fn default_max_cycle_search_depth() -> u32 {
    20
}

fn default_propagation_floor_bps() -> u64 {
    3_000
}

fn default_propagation_damping_bps() -> u64 {
    7_000
}

fn default_contradiction_penalty_bps() -> u64 {
    1_500
}

fn default_contradiction_floor_bps() -> u64 {
    4_000
}

fn default_weak_link_window_secs() -> u64 {
    30 * DAY_SECS
}

fn default_edge_maturity_secs() -> u64 {
    7 * DAY_SECS
}

fn default_dispute_slash_bps() -> u64 {
    DEFAULT_DISPUTE_SLASH_BPS
}

fn default_challenger_share_bps() -> u64 {
    DEFAULT_CHALLENGER_SHARE_BPS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_edge_stake: default_min_edge_stake(),
            max_cycle_search_depth: default_max_cycle_search_depth(),
            propagation_floor_bps: default_propagation_floor_bps(),
            propagation_damping_bps: default_propagation_damping_bps(),
            contradiction_penalty_bps: default_contradiction_penalty_bps(),
            contradiction_floor_bps: default_contradiction_floor_bps(),
            weak_link_window_secs: default_weak_link_window_secs(),
            edge_maturity_secs: default_edge_maturity_secs(),
            dispute_slash_bps: default_dispute_slash_bps(),
            challenger_share_bps: default_challenger_share_bps(),
            intrinsic_weights: SubScoreWeights::default(),
            rewards: RewardSchedule::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, TrellisError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| TrellisError::InvalidConfig(format!("cannot read {}: {}", path, e)))?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, TrellisError> {
        let config: EngineConfig =
            toml::from_str(contents).map_err(|e| TrellisError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TrellisError> {
        if self.min_edge_stake == 0 {
            return Err(invalid("min_edge_stake must be positive"));
        }
        if self.max_cycle_search_depth == 0 {
            return Err(invalid("max_cycle_search_depth must be at least 1"));
        }
        for (name, bps) in [
            ("propagation_floor_bps", self.propagation_floor_bps),
            ("propagation_damping_bps", self.propagation_damping_bps),
            ("contradiction_penalty_bps", self.contradiction_penalty_bps),
            ("contradiction_floor_bps", self.contradiction_floor_bps),
            ("challenger_share_bps", self.challenger_share_bps),
        ] {
            if !is_valid_bps(bps) {
                return Err(invalid(&format!("{} = {} exceeds {}", name, bps, BPS_DENOMINATOR)));
            }
        }
        if self.propagation_floor_bps + self.propagation_damping_bps > BPS_DENOMINATOR {
            return Err(invalid("propagation floor + damping must not exceed 10000"));
        }
        if self.dispute_slash_bps == 0 || self.dispute_slash_bps > BPS_DENOMINATOR {
            return Err(invalid("dispute_slash_bps must be in (0, 10000]"));
        }
        if self.weak_link_window_secs == 0 {
            return Err(invalid("weak_link_window_secs must be positive"));
        }
        if self.edge_maturity_secs == 0 {
            return Err(invalid("edge_maturity_secs must be positive"));
        }
        self.intrinsic_weights.validate()
    }
}

fn invalid(msg: &str) -> TrellisError {
    TrellisError::InvalidConfig(msg.to_string())
}
