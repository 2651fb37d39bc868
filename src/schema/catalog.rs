//! Catalog of placeable item types offered to the solver.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single item definition in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Stable identifier. Never changes across edits.
    pub id: u32,
    /// Display name, also used to match solver allocations.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Footprint of one unit in m².
    #[serde(rename = "area")]
    pub unit_area: f64,
    /// Benefit of one unit in currency units.
    #[serde(rename = "beneficio")]
    pub unit_benefit: f64,
    /// Units available to the solver.
    pub stock: u32,
}

impl CatalogItem {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        unit_area: f64,
        unit_benefit: f64,
        stock: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            unit_area,
            unit_benefit,
            stock,
        }
    }

    /// Benefit per m² of floor space.
    pub fn efficiency(&self) -> f64 {
        if self.unit_area > 0.0 {
            self.unit_benefit / self.unit_area
        } else {
            0.0
        }
    }
}

/// Editable catalog field, addressed by its wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogField {
    Name,
    UnitArea,
    UnitBenefit,
    Stock,
}

impl CatalogField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "nombre",
            Self::UnitArea => "area",
            Self::UnitBenefit => "beneficio",
            Self::Stock => "stock",
        }
    }
}

impl FromStr for CatalogField {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nombre" | "name" => Ok(Self::Name),
            "area" | "unit_area" => Ok(Self::UnitArea),
            "beneficio" | "unit_benefit" => Ok(Self::UnitBenefit),
            "stock" => Ok(Self::Stock),
            other => Err(EditError::UnknownField(other.to_string())),
        }
    }
}

/// Ordered list of catalog items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Default for Catalog {
    /// The stock appliance catalog the planner starts with.
    fn default() -> Self {
        Self::new(vec![
            CatalogItem::new(1, "Mini nevera", 0.25, 40.0, 5),
            CatalogItem::new(2, "Televisor 32\"", 0.1125, 60.0, 6),
            CatalogItem::new(3, "Lavadora", 0.36, 90.0, 300),
            CatalogItem::new(4, "Microondas", 0.2, 25.0, 8),
            CatalogItem::new(5, "Aire acondicionado", 0.27, 110.0, 2),
            CatalogItem::new(6, "Licuadora", 0.04, 8.0, 10),
            CatalogItem::new(7, "Nevera grande", 0.6, 220.0, 2),
            CatalogItem::new(8, "Horno eléctrico", 0.36, 65.0, 3),
            CatalogItem::new(9, "Aspiradora", 0.0875, 28.0, 6),
            CatalogItem::new(10, "Plancha", 0.06, 10.0, 12),
            CatalogItem::new(11, "Cocina a gas", 0.48, 130.0, 2),
            CatalogItem::new(12, "Extractor cocina", 0.18, 45.0, 4),
        ])
    }
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    pub fn find_by_id(&self, id: u32) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Apply a raw form value to one field of the item at `index`.
    ///
    /// The item is left untouched if the value does not parse.
    pub fn edit(
        &mut self,
        index: usize,
        field: CatalogField,
        raw: &str,
    ) -> Result<(), EditError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(EditError::IndexOutOfRange { index, len })?;

        match field {
            CatalogField::Name => item.name = raw.to_string(),
            CatalogField::UnitArea => item.unit_area = parse_real(field.key(), raw)?,
            CatalogField::UnitBenefit => item.unit_benefit = parse_real(field.key(), raw)?,
            CatalogField::Stock => item.stock = parse_count(field.key(), raw)?,
        }
        Ok(())
    }

    /// Validate catalog contents before a run.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.items.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
            if item.name.trim().is_empty() {
                return Err(CatalogError::EmptyName { id: item.id });
            }
            if !item.unit_area.is_finite() || item.unit_area <= 0.0 {
                return Err(CatalogError::InvalidArea {
                    id: item.id,
                    area: item.unit_area,
                });
            }
            if !item.unit_benefit.is_finite() {
                return Err(CatalogError::InvalidBenefit { id: item.id });
            }
        }
        Ok(())
    }
}

pub(super) fn parse_real(field: &'static str, raw: &str) -> Result<f64, EditError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EditError::InvalidValue {
            field,
            value: raw.to_string(),
        })
}

/// Parse a count from a numeric form field. Accepts `"200"` and `"200.0"`.
pub(super) fn parse_count(field: &'static str, raw: &str) -> Result<u32, EditError> {
    let invalid = || EditError::InvalidValue {
        field,
        value: raw.to_string(),
    };
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<u32>() {
        return Ok(v);
    }
    let v = trimmed.parse::<f64>().map_err(|_| invalid())?;
    if v.fract() == 0.0 && v >= 0.0 && v <= u32::MAX as f64 {
        Ok(v as u32)
    } else {
        Err(invalid())
    }
}

/// Errors from applying a raw form value to a catalog or parameter field.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),
    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidValue { field: &'static str, value: String },
    #[error("Row {index} out of range (catalog has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Catalog validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("Catalog must contain at least one item")]
    Empty,
    #[error("Catalog id {0} is used by more than one item")]
    DuplicateId(u32),
    #[error("Item {id} has an empty name")]
    EmptyName { id: u32 },
    #[error("Item {id} has invalid unit area {area}")]
    InvalidArea { id: u32, area: f64 },
    #[error("Item {id} has a non-finite benefit")]
    InvalidBenefit { id: u32 },
}
