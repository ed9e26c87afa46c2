use crate::error::Error;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

/// Inclusive HSV box in OpenCV 8-bit scale (H in 0..180, S and V in 0..=255).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| self.lower[i] <= hsv[i] && hsv[i] <= self.upper[i])
    }
}

/// Size limits a raw candidate has to satisfy to be considered a player.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CandidateFilter {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self {
            min_width: 10,
            min_height: 20,
            max_width: 100,
            max_height: 200,
        }
    }
}

impl CandidateFilter {
    #[inline]
    pub fn accepts(&self, width: i32, height: i32) -> bool {
        width >= self.min_width
            && height >= self.min_height
            && width <= self.max_width
            && height <= self.max_height
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Canonical (width, height) every player crop is resized to.
    pub patch_size: (u32, u32),
    /// Number of most intense pixels averaged into a color feature.
    pub pixel_budget: usize,
    pub field_hsv: HsvRange,

    pub kmeans_attempts: usize,
    pub kmeans_max_iter: usize,
    pub kmeans_epsilon: f32,
    pub seed: u64,

    /// Weight given to fresh centroids while anchors are still adapting.
    pub anchor_learning_rate: f32,
    pub anchor_update_frames: u32,

    /// Center-to-center distance (px) under which a box continues a track.
    pub match_distance: f32,

    pub candidate_filter: Option<CandidateFilter>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            patch_size: (32, 64),
            pixel_budget: 500,
            field_hsv: HsvRange {
                lower: [35, 40, 40],
                upper: [90, 255, 255],
            },
            kmeans_attempts: 5,
            kmeans_max_iter: 10,
            kmeans_epsilon: 1.0,
            seed: 0x5eed,
            anchor_learning_rate: 0.1,
            anchor_update_frames: 10,
            match_distance: 50.0,
            candidate_filter: None,
        }
    }
}

impl TrackerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = TrackerConfig::from_yaml("match_distance: 30.0\nseed: 7\n").unwrap();
        assert_eq!(cfg.match_distance, 30.0);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.patch_size, (32, 64));
        assert_eq!(cfg.anchor_update_frames, 10);
        assert!(cfg.candidate_filter.is_none());
    }

    #[test]
    fn candidate_filter_from_yaml() {
        let cfg = TrackerConfig::from_yaml("candidate_filter:\n  max_width: 80\n").unwrap();
        let filter = cfg.candidate_filter.unwrap();
        assert_eq!(filter.max_width, 80);
        assert_eq!(filter.min_height, 20);
        assert!(filter.accepts(40, 60));
        assert!(!filter.accepts(90, 60));
    }

    #[test]
    fn field_range_is_inclusive() {
        let range = TrackerConfig::default().field_hsv;
        assert!(range.contains([35, 40, 40]));
        assert!(range.contains([90, 255, 255]));
        assert!(!range.contains([34, 200, 200]));
        assert!(!range.contains([60, 39, 200]));
    }
}
