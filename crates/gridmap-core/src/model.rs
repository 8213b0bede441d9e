//! Equipment model fed by the host application.
//!
//! The structs mirror the JSON payloads a grid backend serves: substations
//! owning voltage levels, and lines referencing a voltage level on each side.
//! [`Network`] wraps them in insertion-ordered maps plus a reverse index from
//! voltage level to substation, which is the lookup every routing step makes.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A voltage level inside a substation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageLevel {
    pub id: String,
    pub substation_id: String,
    /// Nominal voltage, kV.
    pub nominal_v: f64,
}

/// A substation and the voltage levels it hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substation {
    pub id: String,
    #[serde(default)]
    pub voltage_levels: Vec<VoltageLevel>,
}

/// Operating status reported by the backend. Unrecognized values fall back to
/// in-operation rather than failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatingStatus {
    PlannedOutage,
    ForcedOutage,
    #[default]
    #[serde(other)]
    InOperation,
}

/// A transmission line between two voltage levels.
///
/// Electrical fields are optional: state-estimation results may be absent or
/// partial, and display code treats missing values as "no data" rather than
/// zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    pub voltage_level_id1: String,
    pub voltage_level_id2: String,
    #[serde(default)]
    pub connected1: bool,
    #[serde(default)]
    pub connected2: bool,
    /// Active power on side 1, MW. Its sign picks the flow direction.
    #[serde(default)]
    pub p1: Option<f64>,
    #[serde(default)]
    pub p2: Option<f64>,
    /// Current on side 1, A.
    #[serde(default)]
    pub i1: Option<f64>,
    #[serde(default)]
    pub i2: Option<f64>,
    /// Permanent current limit on side 1, A.
    #[serde(default)]
    pub permanent_limit1: Option<f64>,
    #[serde(default)]
    pub permanent_limit2: Option<f64>,
    #[serde(default)]
    pub operating_status: OperatingStatus,
}

impl Line {
    /// |current| / permanent limit for side 1, when both values are usable.
    pub fn loading_ratio1(&self) -> Option<f64> {
        side_loading_ratio(self.i1, self.permanent_limit1)
    }

    /// |current| / permanent limit for side 2, when both values are usable.
    pub fn loading_ratio2(&self) -> Option<f64> {
        side_loading_ratio(self.i2, self.permanent_limit2)
    }
}

fn side_loading_ratio(current: Option<f64>, limit: Option<f64>) -> Option<f64> {
    match (current, limit) {
        (Some(i), Some(l)) if l > 0.0 => Some(i.abs() / l),
        _ => None,
    }
}

/// Read-only equipment store.
///
/// Iteration order over substations and lines follows insertion order, which
/// keeps derived artifacts (parallel slots in particular) stable across
/// rebuilds from the same payload.
#[derive(Debug, Clone, Default)]
pub struct Network {
    substations: IndexMap<String, Substation>,
    lines: IndexMap<String, Line>,
    voltage_level_index: FxHashMap<String, String>,
}

impl Network {
    pub fn new(substations: Vec<Substation>, lines: Vec<Line>) -> Self {
        let mut voltage_level_index = FxHashMap::default();
        for substation in &substations {
            for voltage_level in &substation.voltage_levels {
                voltage_level_index.insert(voltage_level.id.clone(), substation.id.clone());
            }
        }
        Self {
            substations: substations
                .into_iter()
                .map(|substation| (substation.id.clone(), substation))
                .collect(),
            lines: lines.into_iter().map(|line| (line.id.clone(), line)).collect(),
            voltage_level_index,
        }
    }

    pub fn substations(&self) -> impl Iterator<Item = &Substation> {
        self.substations.values()
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    pub fn substation(&self, id: &str) -> Option<&Substation> {
        self.substations.get(id)
    }

    pub fn line(&self, id: &str) -> Option<&Line> {
        self.lines.get(id)
    }

    /// Resolves a voltage level by id, failing fast on unknown references.
    pub fn voltage_level(&self, id: &str) -> Result<&VoltageLevel> {
        let substation = self.substation_of(id)?;
        substation
            .voltage_levels
            .iter()
            .find(|voltage_level| voltage_level.id == id)
            .ok_or_else(|| Error::UnknownVoltageLevel { id: id.to_string() })
    }

    /// Resolves the substation hosting a voltage level.
    pub fn substation_of(&self, voltage_level_id: &str) -> Result<&Substation> {
        let substation_id = self.voltage_level_index.get(voltage_level_id).ok_or_else(|| {
            Error::UnknownVoltageLevel { id: voltage_level_id.to_string() }
        })?;
        self.substations
            .get(substation_id)
            .ok_or_else(|| Error::UnknownSubstation { id: substation_id.clone() })
    }

    /// Rank of a voltage level within its substation when levels are ordered
    /// by descending nominal voltage (ties keep insertion order). Fork stubs
    /// use the rank to stagger multi-level substations vertically. Unknown
    /// ids rank 0.
    pub fn voltage_level_rank(&self, voltage_level_id: &str) -> usize {
        let Ok(substation) = self.substation_of(voltage_level_id) else {
            return 0;
        };
        let mut ordered: Vec<&VoltageLevel> = substation.voltage_levels.iter().collect();
        ordered.sort_by(|a, b| b.nominal_v.total_cmp(&a.nominal_v));
        ordered
            .iter()
            .position(|voltage_level| voltage_level.id == voltage_level_id)
            .unwrap_or(0)
    }
}
