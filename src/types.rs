use crate::image::Mask;
use serde::Serialize;

/// The three disjoint class masks of one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMasks {
    pub building: Mask,
    pub road: Mask,
    pub park: Mask,
}

impl TerrainMasks {
    /// All-empty masks: what a frame without signal reports.
    pub fn empty(w: usize, h: usize) -> Self {
        Self {
            building: Mask::new(w, h),
            road: Mask::new(w, h),
            park: Mask::new(w, h),
        }
    }

    pub fn width(&self) -> usize {
        self.building.w
    }

    pub fn height(&self) -> usize {
        self.building.h
    }

    pub fn is_empty(&self) -> bool {
        !self.building.any() && !self.road.any() && !self.park.any()
    }

    /// No pixel is claimed by two classes.
    pub fn is_disjoint(&self) -> bool {
        self.building.overlap(&self.road) == 0
            && self.building.overlap(&self.park) == 0
            && self.road.overlap(&self.park) == 0
    }

    /// Compose the masks into one class raster. Overlaps, which resolved
    /// masks never have, fall to the higher-priority class.
    pub fn label_map(&self) -> LabelMap {
        let data = (0..self.building.data.len())
            .map(|i| {
                if self.building.data[i] {
                    TerrainClass::Building
                } else if self.park.data[i] {
                    TerrainClass::Park
                } else if self.road.data[i] {
                    TerrainClass::Road
                } else {
                    TerrainClass::None
                }
            })
            .collect();
        LabelMap {
            w: self.width(),
            h: self.height(),
            data,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TerrainClass {
    #[default]
    None = 0,
    Building = 1,
    Road = 2,
    Park = 3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelMap {
    pub w: usize,
    pub h: usize,
    pub data: Vec<TerrainClass>,
}

impl LabelMap {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> TerrainClass {
        self.data[y * self.w + x]
    }

    /// Raw class codes (0 none, 1 building, 2 road, 3 park).
    pub fn to_u8(&self) -> Vec<u8> {
        self.data.iter().map(|&c| c as u8).collect()
    }

    pub fn count(&self, class: TerrainClass) -> usize {
        self.data.iter().filter(|&&c| c == class).count()
    }
}

/// Per-frame outcome in serializable form.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainSummary {
    pub width: usize,
    pub height: usize,
    pub building_pixels: usize,
    pub road_pixels: usize,
    pub park_pixels: usize,
    /// False when the frame carried no valid depth.
    pub has_signal: bool,
    pub latency_ms: f64,
}

impl TerrainSummary {
    pub fn from_masks(masks: &TerrainMasks, has_signal: bool, latency_ms: f64) -> Self {
        Self {
            width: masks.width(),
            height: masks.height(),
            building_pixels: masks.building.count(),
            road_pixels: masks.road.count(),
            park_pixels: masks.park.count(),
            has_signal,
            latency_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_map_uses_class_codes() {
        let mut masks = TerrainMasks::empty(4, 1);
        masks.building.set(0, 0, true);
        masks.road.set(1, 0, true);
        masks.park.set(2, 0, true);
        let labels = masks.label_map();
        assert_eq!(labels.to_u8(), vec![1, 2, 3, 0]);
        assert_eq!(labels.get(2, 0), TerrainClass::Park);
        assert_eq!(labels.count(TerrainClass::None), 1);
        assert!(masks.is_disjoint());
    }
}
