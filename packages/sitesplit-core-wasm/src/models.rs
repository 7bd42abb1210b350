// Site input (building limits, height plateaus) and per-building split records
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{SiteError, SiteResult};

/// A single `[x, y]` coordinate.
pub type Point = [f64; 2];

/// Closed polygon boundary. Repeating the first point at the end is optional.
pub type Ring = Vec<Point>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingLimit {
    pub id: usize,
    pub boundary: Ring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightPlateau {
    pub id: usize,
    pub boundary: Ring,
    pub elevation: f64,
}

// Building limits and height plateaus for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSite {
    #[serde(alias = "building_limits")]
    pub buildings: Vec<BuildingLimit>,
    #[serde(alias = "height_plateaus")]
    pub plateaus: Vec<HeightPlateau>,
}

/// Part of a building lying on one plateau. `geometry` holds one ring per
/// disjoint part of the intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPiece {
    pub geometry: Vec<Ring>,
    pub elevation: f64,
}

// One record per building, ready to be stored or rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitResult {
    pub project_name: String,
    pub building_id: usize,
    pub pieces: Vec<SplitPiece>,
    pub building_geometry: Ring,
    pub all_plateaus: Vec<HeightPlateau>,
}

impl BuildingLimit {
    pub fn new(id: usize, boundary: Ring) -> Self {
        BuildingLimit { id, boundary }
    }
}

impl HeightPlateau {
    pub fn new(id: usize, boundary: Ring, elevation: f64) -> Self {
        HeightPlateau {
            id,
            boundary,
            elevation,
        }
    }
}

impl BuildSite {
    /// Build a site, rejecting structurally malformed input.
    pub fn new(buildings: Vec<BuildingLimit>, plateaus: Vec<HeightPlateau>) -> SiteResult<Self> {
        let site = BuildSite {
            buildings,
            plateaus,
        };
        site.check_structure()?;
        Ok(site)
    }

    /// Structural checks that must hold before any geometry is evaluated.
    /// Runs plateaus first, matching the order of the geometric checks.
    pub fn check_structure(&self) -> SiteResult<()> {
        if self.plateaus.is_empty() {
            return Err(SiteError::Structural(
                "At least one height plateau must be provided".to_string(),
            ));
        }
        if self.buildings.is_empty() {
            return Err(SiteError::Structural(
                "At least one building limit must be provided".to_string(),
            ));
        }

        for (i, plateau) in self.plateaus.iter().enumerate() {
            check_ring(&plateau.boundary, "Height plateau", i)?;
            if !plateau.elevation.is_finite() {
                return Err(SiteError::Structural(format!(
                    "Height plateau {} elevation must be a finite number",
                    i
                )));
            }
        }
        for (i, building) in self.buildings.iter().enumerate() {
            check_ring(&building.boundary, "Building limit", i)?;
        }

        let mut seen = HashSet::new();
        for building in &self.buildings {
            if !seen.insert(building.id) {
                return Err(SiteError::Structural(format!(
                    "Building id {} is used more than once",
                    building.id
                )));
            }
        }

        Ok(())
    }

    /// Site whose ids are the positions of the boundaries in the input.
    pub fn from_rings(buildings: Vec<Ring>, plateaus: Vec<(Ring, f64)>) -> SiteResult<Self> {
        let buildings = buildings
            .into_iter()
            .enumerate()
            .map(|(i, boundary)| BuildingLimit::new(i, boundary))
            .collect();
        let plateaus = plateaus
            .into_iter()
            .enumerate()
            .map(|(i, (boundary, elevation))| HeightPlateau::new(i, boundary, elevation))
            .collect();
        BuildSite::new(buildings, plateaus)
    }
}

fn check_ring(ring: &Ring, label: &str, index: usize) -> SiteResult<()> {
    if ring.len() < 3 {
        return Err(SiteError::Structural(format!(
            "{} {} must have at least 3 coordinates",
            label, index
        )));
    }
    if ring.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
        return Err(SiteError::Structural(format!(
            "{} {} has a non-finite coordinate",
            label, index
        )));
    }
    Ok(())
}
