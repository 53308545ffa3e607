//! Route entity type - derived supplier-to-warehouse transport links
//!
//! Routes are computed, not collected: the classifier derives distance,
//! mode, and display color from the endpoints. One route exists per
//! (supplier, warehouse) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityKind};

/// Known transport modes with their map display colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Road,
    Rail,
    Sea,
    Air,
    Multimodal,
}

impl TransportMode {
    /// Parse a free-form label; `None` for unrecognized modes
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "road" => Some(TransportMode::Road),
            "rail" => Some(TransportMode::Rail),
            "sea" => Some(TransportMode::Sea),
            "air" => Some(TransportMode::Air),
            "multimodal" => Some(TransportMode::Multimodal),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransportMode::Road => "road",
            TransportMode::Rail => "rail",
            TransportMode::Sea => "sea",
            TransportMode::Air => "air",
            TransportMode::Multimodal => "multimodal",
        }
    }

    /// Fixed mode-to-color mapping used on route maps
    pub fn color(&self) -> &'static str {
        match self {
            TransportMode::Road => "#3b82f6",
            TransportMode::Rail => "#10b981",
            TransportMode::Sea => "#6366f1",
            TransportMode::Air => "#f59e0b",
            TransportMode::Multimodal => "#8b5cf6",
        }
    }

    pub fn all() -> [TransportMode; 5] {
        [
            TransportMode::Road,
            TransportMode::Rail,
            TransportMode::Sea,
            TransportMode::Air,
            TransportMode::Multimodal,
        ]
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Color for an arbitrary mode label; unknown labels use the road color
pub fn color_for_label(label: &str) -> &'static str {
    TransportMode::from_label(label)
        .unwrap_or(TransportMode::Road)
        .color()
}

/// A Route entity connecting a supplier to a warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// Unique identifier (`rt-<token>`)
    pub id: EntityId,

    pub supplier_id: EntityId,

    pub warehouse_id: EntityId,

    /// Mode label carried from the supplier, or "road" by default
    pub transport_mode: String,

    /// Great-circle distance between the endpoints
    pub distance_km: f64,

    /// Display color derived from the mode
    pub color_hex: String,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

/// Partial route update used when a refresh changes derived fields;
/// endpoints are immutable
#[derive(Debug, Clone, Default)]
pub struct RoutePatch {
    pub transport_mode: Option<String>,
    pub distance_km: Option<f64>,
    pub color_hex: Option<String>,
}

impl crate::core::store::Patch<Route> for RoutePatch {
    fn apply(self, target: &mut Route) {
        if let Some(mode) = self.transport_mode {
            target.transport_mode = mode;
        }
        if let Some(distance) = self.distance_km {
            target.distance_km = distance;
        }
        if let Some(color) = self.color_hex {
            target.color_hex = color;
        }
    }
}

impl Entity for Route {
    const KIND: EntityKind = EntityKind::Route;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        self.id.as_str()
    }

    fn check(&self, issues: &mut Vec<String>) {
        if self.id.is_empty() {
            issues.push("id must not be empty".to_string());
        }
        if self.supplier_id.is_empty() {
            issues.push("supplier_id must not be empty".to_string());
        }
        if self.warehouse_id.is_empty() {
            issues.push("warehouse_id must not be empty".to_string());
        }
        if self.transport_mode.trim().is_empty() {
            issues.push("transport_mode must not be empty".to_string());
        }
        if !self.distance_km.is_finite() || self.distance_km < 0.0 {
            issues.push(format!("distance_km must be >= 0, got {}", self.distance_km));
        }
    }
}
