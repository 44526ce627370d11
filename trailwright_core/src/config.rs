// Data-driven planner configuration.
//
// All tunable planner parameters live in `PlannerConfig`, loaded from JSON
// by the host. The planner never uses magic numbers: cost weights, scan
// windows, the obstacle buffer, and search budgets are all read from here.
// Parameters are grouped into nested structs (`SearchBudget`, `CostParams`,
// `SurfaceParams`) so a host can override one group and keep the defaults
// for the rest; every struct is `#[serde(default)]`.
//
// The node budget is a per-request parameter as well: `NetworkRequest`
// (see `network.rs`) may carry its own `SearchBudget`, which replaces the
// configured one for that group's build.
//
// See also: `cost.rs` for how `CostParams` feeds classification,
// `surface.rs` for the scan window, `planner.rs` for budget enforcement.
//
// **Critical constraint: determinism.** Config values feed directly into
// search ordering. Two builds agree only if their configs agree.

use crate::error::{PathingError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a group's hub and members are paired into searches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairingPolicy {
    /// One search from the hub to each member, in member order.
    #[default]
    HubAndSpoke,
    /// Hub to member 0, member 0 to member 1, and so on.
    Chain,
    /// Every unordered pair among hub and members, in index order.
    Complete,
}

/// Limits on a single pair search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    /// Maximum number of distinct nodes dequeued before the search aborts.
    pub max_explored_nodes: u32,
    /// Maximum straight-line horizontal start–goal distance. Checked before
    /// any search work happens.
    pub max_distance: f64,
}

impl SearchBudget {
    /// Rejects a zero node budget and a negative or NaN distance limit.
    pub fn validate(&self) -> Result<()> {
        if self.max_explored_nodes == 0 {
            return Err(PathingError::InvalidConfig(
                "budget.max_explored_nodes must be positive".into(),
            ));
        }
        if !(self.max_distance >= 0.0) {
            return Err(PathingError::InvalidConfig(
                "budget.max_distance must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_explored_nodes: 5000,
            max_distance: 200.0,
        }
    }
}

/// Traversal cost weights used by the terrain classifier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParams {
    /// Cost of a level step.
    pub flat_cost: f32,
    /// Multiplied by `|dy|` for any step that changes height.
    pub slope_cost_multiplier: f32,
    /// Added on top of the height cost when the cell is a fluid surface.
    pub water_cost: f32,
    /// `|dy|` at or above which a step is classified steep.
    pub steep_threshold: u32,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            flat_cost: 1.0,
            slope_cost_multiplier: 2.0,
            water_cost: 10.0,
            steep_threshold: 2,
        }
    }
}

/// Surface scanning and vertical alignment rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceParams {
    /// How far below the reference height the resolver scans for support.
    pub scan_down: i32,
    /// How far above the reference height the resolver looks when the
    /// reference is buried.
    pub scan_up: i32,
    /// Allowed `|y - resolved|` for a position to count as walkable.
    pub walkable_tolerance: i32,
    /// Largest vertical step the planner accepts between neighbors.
    pub max_step: i32,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            scan_down: 20,
            scan_up: 4,
            walkable_tolerance: 1,
            max_step: 1,
        }
    }
}

/// Complete planner configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub budget: SearchBudget,
    pub costs: CostParams,
    pub surface: SurfaceParams,
    /// Cells added on every side of each occupied volume before it becomes
    /// an obstacle.
    pub obstacle_buffer: i32,
    /// Upper bound on pair searches running at once across all builds.
    pub max_concurrent_searches: usize,
    pub pairing: PairingPolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            budget: SearchBudget::default(),
            costs: CostParams::default(),
            surface: SurfaceParams::default(),
            obstacle_buffer: 2,
            max_concurrent_searches: 4,
            pairing: PairingPolicy::HubAndSpoke,
        }
    }
}

impl PlannerConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PathingError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.budget.validate()?;
        if self.obstacle_buffer < 0 {
            return Err(PathingError::InvalidConfig(
                "obstacle_buffer must not be negative".into(),
            ));
        }
        let c = &self.costs;
        if !(c.flat_cost >= 1.0) {
            // The heuristic assumes every step costs at least one cell.
            return Err(PathingError::InvalidConfig(
                "costs.flat_cost must be at least 1.0".into(),
            ));
        }
        if !(c.slope_cost_multiplier >= 1.0) || !(c.water_cost >= 0.0) {
            return Err(PathingError::InvalidConfig(
                "costs.slope_cost_multiplier must be >= 1.0 and costs.water_cost >= 0.0".into(),
            ));
        }
        let s = &self.surface;
        if s.scan_down < 0 || s.scan_up < 0 || s.walkable_tolerance < 0 || s.max_step < 0 {
            return Err(PathingError::InvalidConfig(
                "surface parameters must not be negative".into(),
            ));
        }
        if self.max_concurrent_searches == 0 {
            return Err(PathingError::InvalidConfig(
                "max_concurrent_searches must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrips_through_json() {
        let config = PlannerConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let restored = PlannerConfig::from_json_str(&json).unwrap();
        assert_eq!(config, restored);
        assert_eq!(restored.budget.max_explored_nodes, 5000);
        assert_eq!(restored.budget.max_distance, 200.0);
        assert_eq!(restored.obstacle_buffer, 2);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "budget": { "max_explored_nodes": 800 },
            "costs": { "water_cost": 25.0 },
            "pairing": "Chain"
        }"#;
        let config = PlannerConfig::from_json_str(json).unwrap();
        assert_eq!(config.budget.max_explored_nodes, 800);
        assert_eq!(config.budget.max_distance, 200.0);
        assert_eq!(config.costs.water_cost, 25.0);
        assert_eq!(config.costs.flat_cost, 1.0);
        assert_eq!(config.surface.scan_down, 20);
        assert_eq!(config.pairing, PairingPolicy::Chain);
    }

    #[test]
    fn empty_object_is_the_default() {
        let config = PlannerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn zero_budget_is_rejected() {
        let err = PlannerConfig::from_json_str(r#"{"budget": {"max_explored_nodes": 0}}"#)
            .unwrap_err();
        assert!(matches!(err, PathingError::InvalidConfig(_)));
    }

    #[test]
    fn nan_distance_is_rejected() {
        let budget = SearchBudget {
            max_explored_nodes: 10,
            max_distance: f64::NAN,
        };
        assert!(matches!(budget.validate(), Err(PathingError::InvalidConfig(_))));
        assert!(SearchBudget::default().validate().is_ok());
    }

    #[test]
    fn negative_buffer_is_rejected() {
        let config = PlannerConfig {
            obstacle_buffer: -1,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn sub_unit_flat_cost_is_rejected() {
        let config = PlannerConfig {
            costs: CostParams {
                flat_cost: 0.5,
                ..CostParams::default()
            },
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let config = PlannerConfig {
            max_concurrent_searches: 0,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = PlannerConfig::load("/nonexistent/trailwright.json").unwrap_err();
        match err {
            PathingError::ConfigIo { path, .. } => {
                assert!(path.ends_with("trailwright.json"));
            }
            other => panic!("expected ConfigIo, got {other:?}"),
        }
    }
}
