//! Entity identity - namespaced opaque identifiers
//!
//! Every entity carries an opaque string ID prefixed with its kind
//! (`sup-`, `mat-`, `wh-`, `rt-`) so the origin of a reference is visible
//! in the data files. The token after the prefix is a ULID; collisions are
//! statistically negligible and are not re-checked at generation time.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// The four entity collections managed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Supplier,
    Material,
    Warehouse,
    Route,
}

impl EntityKind {
    /// ID namespace prefix for this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Supplier => "sup",
            EntityKind::Material => "mat",
            EntityKind::Warehouse => "wh",
            EntityKind::Route => "rt",
        }
    }

    /// Collection name, used for file names and log fields
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Supplier => "suppliers",
            EntityKind::Material => "materials",
            EntityKind::Warehouse => "warehouses",
            EntityKind::Route => "routes",
        }
    }

    /// All kinds in hydration order (referenced collections first)
    pub fn all() -> [EntityKind; 4] {
        [
            EntityKind::Material,
            EntityKind::Supplier,
            EntityKind::Warehouse,
            EntityKind::Route,
        ]
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Supplier => write!(f, "supplier"),
            EntityKind::Material => write!(f, "material"),
            EntityKind::Warehouse => write!(f, "warehouse"),
            EntityKind::Route => write!(f, "route"),
        }
    }
}

/// An opaque entity identifier
///
/// Generated IDs follow the `<prefix>-<ulid>` convention, but any non-empty
/// string loaded from a data file is accepted so that legacy records keep
/// their identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a fresh namespaced ID for the given kind
    pub fn generate(kind: EntityKind) -> Self {
        Self(format!(
            "{}-{}",
            kind.prefix(),
            Ulid::new().to_string().to_lowercase()
        ))
    }

    /// Wrap an existing identifier (hydration and test paths)
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Kind inferred from the prefix, if the ID follows the convention
    pub fn kind(&self) -> Option<EntityKind> {
        let prefix = self.0.split('-').next()?;
        match prefix {
            "sup" => Some(EntityKind::Supplier),
            "mat" => Some(EntityKind::Material),
            "wh" => Some(EntityKind::Warehouse),
            "rt" => Some(EntityKind::Route),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}
