//! Geometric validation of a building site.
//!
//! A site is valid when every shape has area, the plateaus jointly cover
//! every building, and no two plateaus share area. All comparisons round
//! areas to `tolerance` decimal places first, so boundary noise from the
//! boolean ops never counts as a violation.

use geo::{Area, BooleanOps};
use rayon::prelude::*;

use crate::console_log;
use crate::error::{SiteError, SiteResult};
use crate::geometry::{has_area, round_to_tolerance, union_all, Shape};
use crate::models::BuildSite;

// Shapes built once per validation pass
struct PreparedSite {
    buildings: Vec<Shape>,
    plateaus: Vec<Shape>,
}

impl PreparedSite {
    fn new(site: &BuildSite) -> Self {
        PreparedSite {
            buildings: site
                .buildings
                .iter()
                .map(|b| Shape::from_ring(&b.boundary))
                .collect(),
            plateaus: site
                .plateaus
                .iter()
                .map(|p| Shape::from_ring(&p.boundary))
                .collect(),
        }
    }

    fn plateaus_without_area(&self, tolerance: u32) -> impl Iterator<Item = SiteError> + '_ {
        self.plateaus
            .iter()
            .enumerate()
            .filter(move |(_, shape)| !has_area(shape.area(), tolerance))
            .map(|(index, _)| SiteError::PlateauNoArea { index })
    }

    fn buildings_without_area(&self, tolerance: u32) -> impl Iterator<Item = SiteError> + '_ {
        self.buildings
            .iter()
            .enumerate()
            .filter(move |(_, shape)| !has_area(shape.area(), tolerance))
            .map(|(index, _)| SiteError::BuildingNoArea { index })
    }

    fn uncovered_buildings(&self, tolerance: u32) -> impl Iterator<Item = SiteError> + '_ {
        let combined = union_all(&self.plateaus);
        self.buildings
            .iter()
            .enumerate()
            .filter(move |(_, shape)| {
                let remaining = shape.region.difference(&combined).unsigned_area();
                has_area(remaining, tolerance)
            })
            .map(|(building, _)| SiteError::IncompleteCoverage { building })
    }

    fn overlap_area(&self, first: usize, second: usize, tolerance: u32) -> f64 {
        round_to_tolerance(
            self.plateaus[first].intersection_area(&self.plateaus[second]),
            tolerance,
        )
    }

    // Intersection area is symmetric, so (i, j) with i < j covers every ordered pair
    fn plateau_pairs(&self) -> Vec<(usize, usize)> {
        let n = self.plateaus.len();
        (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect()
    }

    fn first_overlap(&self, tolerance: u32) -> Option<SiteError> {
        self.plateau_pairs()
            .par_iter()
            .find_first(|&&(i, j)| self.overlap_area(i, j, tolerance) > 0.0)
            .map(|&(first, second)| SiteError::PlateauOverlap { first, second })
    }

    fn all_overlaps(&self, tolerance: u32) -> Vec<SiteError> {
        self.plateau_pairs()
            .par_iter()
            .filter(|&&(i, j)| self.overlap_area(i, j, tolerance) > 0.0)
            .map(|&(first, second)| SiteError::PlateauOverlap { first, second })
            .collect()
    }
}

/// Validate `site`, stopping at the first violation.
///
/// Checks run in a fixed order: plateau areas, building areas, coverage of
/// each building by the union of plateaus, then pairwise plateau overlap.
pub fn validate(site: &BuildSite, tolerance: u32) -> SiteResult<()> {
    let prepared = PreparedSite::new(site);

    if let Some(err) = prepared.plateaus_without_area(tolerance).next() {
        return Err(err);
    }
    if let Some(err) = prepared.buildings_without_area(tolerance).next() {
        return Err(err);
    }

    if let Some(err) = prepared.uncovered_buildings(tolerance).next() {
        return Err(err);
    }
    console_log!(
        "Buildings are covered by height plateaus to {} decimal places",
        tolerance
    );

    if let Some(err) = prepared.first_overlap(tolerance) {
        return Err(err);
    }
    console_log!(
        "Height plateaus do not overlap to {} decimal places",
        tolerance
    );

    Ok(())
}

/// Validate `site` and collect every violation, in the same order
/// [`validate`] would encounter them. An empty vector means the site is valid.
pub fn validate_all(site: &BuildSite, tolerance: u32) -> Vec<SiteError> {
    let prepared = PreparedSite::new(site);

    let mut errors: Vec<SiteError> = prepared.plateaus_without_area(tolerance).collect();
    errors.extend(prepared.buildings_without_area(tolerance));
    errors.extend(prepared.uncovered_buildings(tolerance));
    errors.extend(prepared.all_overlaps(tolerance));

    console_log!(
        "Site validation to {} decimal places found {} violation(s)",
        tolerance,
        errors.len()
    );
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ring;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]
    }

    fn site(buildings: Vec<Ring>, plateaus: Vec<(Ring, f64)>) -> BuildSite {
        BuildSite::from_rings(buildings, plateaus).unwrap()
    }

    fn halves() -> BuildSite {
        site(
            vec![square(0.0, 0.0, 10.0, 10.0)],
            vec![
                (square(0.0, 0.0, 5.0, 10.0), 1.0),
                (square(5.0, 0.0, 10.0, 10.0), 2.0),
            ],
        )
    }

    #[test]
    fn plateaus_splitting_building_in_half_are_valid() {
        assert_eq!(validate(&halves(), 6), Ok(()));
        assert!(validate_all(&halves(), 6).is_empty());
    }

    #[test]
    fn single_plateau_equal_to_building_is_valid() {
        let s = site(
            vec![square(0.0, 0.0, 10.0, 10.0)],
            vec![(square(0.0, 0.0, 10.0, 10.0), 5.0)],
        );
        assert_eq!(validate(&s, 6), Ok(()));
    }

    #[test]
    fn gap_between_plateaus_fails_coverage() {
        let s = site(
            vec![square(0.0, 0.0, 10.0, 10.0)],
            vec![
                (square(0.0, 0.0, 4.0, 10.0), 1.0),
                (square(6.0, 0.0, 10.0, 10.0), 2.0),
            ],
        );
        let err = validate(&s, 6).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Height plateaus do not completely cover building 0."
        );
    }

    #[test]
    fn overlapping_plateaus_fail() {
        let s = site(
            vec![square(0.0, 0.0, 10.0, 10.0)],
            vec![
                (square(0.0, 0.0, 6.0, 10.0), 1.0),
                (square(4.0, 0.0, 10.0, 10.0), 2.0),
            ],
        );
        let err = validate(&s, 6).unwrap_err();
        assert_eq!(err.to_string(), "Height plateaus 0 and 1 overlap.");
    }

    #[test]
    fn collinear_building_has_no_area() {
        let s = site(
            vec![vec![[0.0, 0.0], [5.0, 5.0], [10.0, 10.0]]],
            vec![(square(0.0, 0.0, 10.0, 10.0), 1.0)],
        );
        let err = validate(&s, 6).unwrap_err();
        assert_eq!(err.to_string(), "Building limit 0 has no area.");
    }

    #[test]
    fn plateau_area_is_checked_before_building_area() {
        let s = site(
            vec![vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]],
            vec![
                (square(0.0, 0.0, 10.0, 10.0), 1.0),
                (vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]], 2.0),
            ],
        );
        assert_eq!(
            validate(&s, 6),
            Err(SiteError::PlateauNoArea { index: 1 })
        );
    }

    #[test]
    fn coverage_is_checked_before_overlap() {
        let s = site(
            vec![square(0.0, 0.0, 10.0, 10.0)],
            vec![
                (square(0.0, 0.0, 6.0, 10.0), 1.0),
                (square(4.0, 0.0, 9.0, 10.0), 2.0),
            ],
        );
        assert_eq!(
            validate(&s, 6),
            Err(SiteError::IncompleteCoverage { building: 0 })
        );
    }

    #[test]
    fn first_overlapping_pair_is_reported_in_order() {
        let s = site(
            vec![square(0.0, 0.0, 30.0, 10.0)],
            vec![
                (square(0.0, 0.0, 10.0, 10.0), 1.0),
                (square(10.0, 0.0, 21.0, 10.0), 2.0),
                (square(20.0, 0.0, 30.0, 10.0), 3.0),
                (square(0.0, 0.0, 10.0, 10.0), 4.0),
            ],
        );
        assert_eq!(
            validate(&s, 6),
            Err(SiteError::PlateauOverlap { first: 0, second: 3 })
        );
        assert_eq!(
            validate_all(&s, 6),
            vec![
                SiteError::PlateauOverlap { first: 0, second: 3 },
                SiteError::PlateauOverlap { first: 1, second: 2 },
            ]
        );
    }

    #[test]
    fn building_on_several_plateaus_and_outside_extent_is_uncovered() {
        let s = site(
            vec![square(0.0, 0.0, 10.0, 10.0), square(8.0, 8.0, 12.0, 12.0)],
            vec![(square(0.0, 0.0, 10.0, 10.0), 1.0)],
        );
        assert_eq!(
            validate(&s, 6),
            Err(SiteError::IncompleteCoverage { building: 1 })
        );
    }

    #[test]
    fn accumulating_validation_reports_every_violation_in_order() {
        let s = site(
            vec![
                vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]],
                square(0.0, 0.0, 10.0, 10.0),
            ],
            vec![
                (square(0.0, 0.0, 6.0, 10.0), 1.0),
                (square(4.0, 0.0, 9.0, 10.0), 2.0),
            ],
        );
        assert_eq!(
            validate_all(&s, 6),
            vec![
                SiteError::BuildingNoArea { index: 0 },
                SiteError::IncompleteCoverage { building: 1 },
                SiteError::PlateauOverlap { first: 0, second: 1 },
            ]
        );
    }

    #[test]
    fn sliver_gap_below_tolerance_is_accepted() {
        // 10 x 0.00001 gap, area 1e-4
        let s = site(
            vec![square(0.0, 0.0, 10.0, 10.0)],
            vec![
                (square(0.0, 0.0, 10.0, 5.0), 1.0),
                (square(0.0, 5.000_01, 10.0, 10.0), 2.0),
            ],
        );
        assert_eq!(validate(&s, 3), Ok(()));
        assert_eq!(
            validate(&s, 6),
            Err(SiteError::IncompleteCoverage { building: 0 })
        );
    }

    #[test]
    fn stricter_tolerance_never_turns_failure_into_success() {
        let sites = vec![
            halves(),
            site(
                vec![square(0.0, 0.0, 10.0, 10.0)],
                vec![
                    (square(0.0, 0.0, 10.0, 5.0), 1.0),
                    (square(0.0, 5.000_01, 10.0, 10.0), 2.0),
                ],
            ),
            site(
                vec![square(0.0, 0.0, 10.0, 10.0)],
                vec![
                    (square(0.0, 0.0, 5.000_2, 10.0), 1.0),
                    (square(5.0, 0.0, 10.0, 10.0), 2.0),
                ],
            ),
        ];

        for s in &sites {
            let outcomes: Vec<bool> = (0..10).map(|t| validate(s, t).is_ok()).collect();
            for t in 1..outcomes.len() {
                assert!(
                    outcomes[t - 1] || !outcomes[t],
                    "passed at {} digits after failing at {}",
                    t,
                    t - 1
                );
            }
        }
    }

    #[test]
    fn validation_does_not_mutate_site() {
        let s = halves();
        let before = s.clone();
        let _ = validate(&s, 6);
        let _ = validate_all(&s, 6);
        assert_eq!(s, before);
    }
}
