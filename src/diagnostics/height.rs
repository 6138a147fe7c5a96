use crate::height::HeightField;
use serde::Serialize;

/// Height extraction statistics.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeightStage {
    pub valid_pixels: usize,
    pub total_pixels: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height_m: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height_m: Option<f32>,
    /// No valid depth sample: every mask is reported empty.
    pub no_signal: bool,
    /// All valid heights equal: relative height is 0 everywhere.
    pub degenerate_range: bool,
}

impl HeightStage {
    pub fn from_field(field: &HeightField) -> Self {
        let range = field.range();
        Self {
            valid_pixels: field.valid_count,
            total_pixels: field.height.w * field.height.h,
            min_height_m: range.map(|(lo, _)| lo),
            max_height_m: range.map(|(_, hi)| hi),
            no_signal: field.valid_count == 0,
            degenerate_range: field.is_flat(),
        }
    }
}
