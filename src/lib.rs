pub mod bbox;
pub mod classifier;
pub mod color;
pub mod config;
pub mod detection;
pub mod error;
pub mod frame;
pub mod kmeans;
pub mod merge;
pub mod sink;
pub mod source;
pub mod team;
pub mod tracker;

mod track;

pub use config::TrackerConfig;
pub use detection::Detection;
pub use frame::Frame;
pub use team::Team;
pub use track::Track;

use bbox::{BBox, Ltwh};
use classifier::TeamClassifier;
use color::Feature;
use std::rc::Rc;
use tracing::debug;
use tracker::IdentityTracker;

pub trait TeamTracking {
    /// Runs one frame through the pipeline and returns the players found in
    /// it. Frames with fewer than two players yield nothing.
    fn process(&mut self, frame: &Frame) -> Vec<Detection>;
    fn tracks(&self) -> Rc<[Track]>;
    fn reset(&mut self);
}

/// Session state for one video: team anchors, live tracks and id counter.
pub struct TeamTracker {
    config: TrackerConfig,
    classifier: TeamClassifier,
    tracker: IdentityTracker,
}

impl TeamTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            classifier: TeamClassifier::new(&config),
            tracker: IdentityTracker::new(config.match_distance),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    #[inline]
    pub fn classifier(&self) -> &TeamClassifier {
        &self.classifier
    }

    /// Frame-clipped, size-filtered and merged player boxes.
    pub fn player_boxes(&self, frame: &Frame) -> Vec<BBox<Ltwh>> {
        let (fw, fh) = frame.dims();

        let candidates: Vec<_> = frame
            .iter()
            .map(|b| b.clip(fw, fh))
            .filter(|b| !b.is_empty())
            .filter(|b| match &self.config.candidate_filter {
                Some(filter) => filter.accepts(b.width(), b.height()),
                None => true,
            })
            .collect();

        merge::merge_boxes(&candidates)
    }

    pub fn features(&self, frame: &Frame, boxes: &[BBox<Ltwh>]) -> Vec<Feature> {
        boxes
            .iter()
            .map(|b| color::extract_feature(&frame.image, b, &self.config))
            .collect()
    }
}

impl Default for TeamTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl TeamTracking for TeamTracker {
    fn process(&mut self, frame: &Frame) -> Vec<Detection> {
        let boxes = self.player_boxes(frame);
        debug!(
            frame = frame.index,
            candidates = frame.len(),
            players = boxes.len(),
            "boxes merged"
        );

        let features = self.features(frame, &boxes);

        match self.classifier.classify(&features) {
            Some(teams) => self.tracker.update(&boxes, &teams),
            None => {
                debug!(frame = frame.index, "frame skipped");
                Vec::new()
            }
        }
    }

    #[inline]
    fn tracks(&self) -> Rc<[Track]> {
        self.tracker.tracks().copied().collect()
    }

    fn reset(&mut self) {
        self.classifier.reset();
        self.tracker.reset();
    }
}
