use serde::Serialize;

/// Pixels each class lost to a higher-priority class.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictStage {
    pub road_lost_to_building: usize,
    pub road_lost_to_park: usize,
    pub park_lost_to_building: usize,
}
