use crate::geometry::rings_area;
use crate::models::{HeightPlateau, Ring, SplitPiece, SplitResult};

/// Bundle one building's pieces with the geometry they were computed from.
pub fn assemble(
    project_name: &str,
    building_id: usize,
    pieces: Vec<SplitPiece>,
    building_geometry: Ring,
    all_plateaus: Vec<HeightPlateau>,
) -> SplitResult {
    SplitResult {
        project_name: project_name.to_string(),
        building_id,
        pieces,
        building_geometry,
        all_plateaus,
    }
}

impl SplitPiece {
    pub fn area(&self) -> f64 {
        rings_area(&self.geometry)
    }
}

impl SplitResult {
    /// Sum of piece areas; equals the building area for a validated site.
    pub fn total_area(&self) -> f64 {
        self.pieces.iter().map(SplitPiece::area).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
