//! Priority resolution between the three class masks.
//!
//! Order, highest first: building > park > road. The building mask is never
//! touched; the result is pairwise disjoint and resolving it again changes
//! nothing.
use crate::diagnostics::ConflictStage;
use crate::error::FrameError;
use crate::image::Mask;
use log::debug;

#[derive(Clone, Debug)]
pub struct ResolvedMasks {
    pub road: Mask,
    pub park: Mask,
    pub stage: ConflictStage,
}

/// `road' = road ∧ ¬building ∧ ¬park`, `park' = park ∧ ¬building`.
pub fn resolve_conflicts(
    building: &Mask,
    road: &Mask,
    park: &Mask,
) -> Result<ResolvedMasks, FrameError> {
    building.ensure_same_shape(road)?;
    building.ensure_same_shape(park)?;

    let road_outside_buildings = road.and_not(building);
    let stage = ConflictStage {
        road_lost_to_building: road.overlap(building),
        road_lost_to_park: road_outside_buildings.overlap(park),
        park_lost_to_building: park.overlap(building),
    };
    let road = road_outside_buildings.and_not(park);
    let park = park.and_not(building);
    if stage.road_lost_to_building + stage.road_lost_to_park + stage.park_lost_to_building > 0 {
        debug!(
            "conflicts: road -{} (building) -{} (park), park -{} (building)",
            stage.road_lost_to_building, stage.road_lost_to_park, stage.park_lost_to_building
        );
    }
    Ok(ResolvedMasks { road, park, stage })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(w: usize, h: usize, x0: usize, y0: usize, size: usize) -> Mask {
        Mask::from_fn(w, h, |x, y| {
            (x0..x0 + size).contains(&x) && (y0..y0 + size).contains(&y)
        })
    }

    #[test]
    fn building_wins_a_fully_contested_region() {
        let all = square(20, 20, 5, 5, 10);
        let resolved = resolve_conflicts(&all, &all, &all).unwrap();
        assert!(!resolved.road.any());
        assert!(!resolved.park.any());
        assert_eq!(resolved.stage.road_lost_to_building, 100);
        assert_eq!(resolved.stage.road_lost_to_park, 0);
        assert_eq!(resolved.stage.park_lost_to_building, 100);
    }

    #[test]
    fn park_outranks_road() {
        let building = Mask::new(20, 20);
        let road = square(20, 20, 0, 0, 12);
        let park = square(20, 20, 8, 8, 12);
        let resolved = resolve_conflicts(&building, &road, &park).unwrap();
        assert_eq!(resolved.park, park);
        assert!(!resolved.road.get(10, 10));
        assert!(resolved.road.get(2, 2));
        assert_eq!(resolved.road.overlap(&resolved.park), 0);
        assert_eq!(resolved.stage.road_lost_to_park, 16);
    }

    #[test]
    fn resolving_twice_changes_nothing() {
        let building = square(30, 30, 10, 10, 8);
        let road = Mask::from_fn(30, 30, |x, y| (x + y) % 3 != 0);
        let park = square(30, 30, 4, 4, 16);
        let first = resolve_conflicts(&building, &road, &park).unwrap();
        let second = resolve_conflicts(&building, &first.road, &first.park).unwrap();
        assert_eq!(first.road, second.road);
        assert_eq!(first.park, second.park);
        assert_eq!(second.stage.road_lost_to_building, 0);
        assert_eq!(second.stage.park_lost_to_building, 0);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let a = Mask::new(4, 4);
        let b = Mask::new(5, 4);
        assert!(resolve_conflicts(&a, &a, &b).is_err());
        assert!(resolve_conflicts(&a, &b, &a).is_err());
    }
}
