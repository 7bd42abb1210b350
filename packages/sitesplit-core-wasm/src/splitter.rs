// Splits each building limit into the parts lying on each height plateau
use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::assembler::assemble;
use crate::console_log;
use crate::geometry::{multipolygon_to_rings, Shape};
use crate::models::{BuildingLimit, HeightPlateau, SplitPiece, SplitResult};

/// Pieces of `building` on each plateau, in plateau order. Plateaus touching
/// the building only along an edge or at a point contribute nothing.
pub fn split_building(building: &BuildingLimit, plateaus: &[(Shape, f64)]) -> Vec<SplitPiece> {
    let shape = Shape::from_ring(&building.boundary);

    plateaus
        .iter()
        .filter_map(|(plateau, elevation)| {
            let parts = multipolygon_to_rings(&shape.intersection(plateau));
            if parts.is_empty() {
                None
            } else {
                Some(SplitPiece {
                    geometry: parts,
                    elevation: *elevation,
                })
            }
        })
        .collect()
}

/// Split every building by every plateau, keyed by building id.
///
/// Does not validate: overlapping plateaus yield the shared area in more than
/// one piece, and uncovered area simply appears in no piece.
pub fn split(
    project_name: &str,
    buildings: &[BuildingLimit],
    plateaus: &[HeightPlateau],
) -> BTreeMap<usize, SplitResult> {
    let prepared: Vec<(Shape, f64)> = plateaus
        .iter()
        .map(|p| (Shape::from_ring(&p.boundary), p.elevation))
        .collect();

    let results: BTreeMap<usize, SplitResult> = buildings
        .par_iter()
        .map(|building| {
            let pieces = split_building(building, &prepared);
            let result = assemble(
                project_name,
                building.id,
                pieces,
                building.boundary.clone(),
                plateaus.to_vec(),
            );
            (building.id, result)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect();

    console_log!(
        "Split {} building limit(s) by {} height plateau(s) for project '{}'",
        buildings.len(),
        plateaus.len(),
        project_name
    );

    results
}
