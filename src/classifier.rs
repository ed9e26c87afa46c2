use crate::color::Feature;
use crate::config::TrackerConfig;
use crate::kmeans::{kmeans, KMeansParams};
use crate::team::Team;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

/// Maps raw cluster indices onto teams.
///
/// Teams pick in order, each taking the still unclaimed centroid closest to
/// its anchor, so the result is always a permutation. Returns the team for
/// every raw cluster index.
pub fn realign(anchors: &[Feature; 2], centers: &[Feature; 2]) -> [Team; 2] {
    let mut mapping = [Team::A, Team::B];
    let mut used = [false; 2];

    for team in Team::ALL {
        let mut best: Option<(usize, f32)> = None;

        for (idx, center) in centers.iter().enumerate() {
            if used[idx] {
                continue;
            }

            let d = (anchors[team.index()] - center).norm();
            trace!(team = team.index(), cluster = idx, distance = d, "anchor distance");

            if best.map_or(true, |(_, md)| d < md) {
                best = Some((idx, d));
            }
        }

        if let Some((idx, _)) = best {
            mapping[idx] = team;
            used[idx] = true;
        }
    }

    mapping
}

/// Two-way color clustering with labels kept stable across frames.
///
/// Anchors follow the first `anchor_update_frames` clusterings with
/// exponential smoothing and are frozen afterwards.
#[derive(Debug, Clone)]
pub struct TeamClassifier {
    params: KMeansParams,
    learning_rate: f32,
    update_frames: u32,
    seed: u64,
    rng: StdRng,
    anchors: Option<[Feature; 2]>,
    updates: u32,
}

impl TeamClassifier {
    pub fn new(cfg: &TrackerConfig) -> Self {
        Self {
            params: KMeansParams {
                k: 2,
                attempts: cfg.kmeans_attempts,
                max_iter: cfg.kmeans_max_iter,
                epsilon: cfg.kmeans_epsilon,
            },
            learning_rate: cfg.anchor_learning_rate,
            update_frames: cfg.anchor_update_frames,
            seed: cfg.seed,
            rng: StdRng::seed_from_u64(cfg.seed),
            anchors: None,
            updates: 0,
        }
    }

    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.anchors = None;
        self.updates = 0;
    }

    #[inline]
    pub fn anchors(&self) -> Option<&[Feature; 2]> {
        self.anchors.as_ref()
    }

    #[inline]
    pub fn updates(&self) -> u32 {
        self.updates
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.updates >= self.update_frames
    }

    /// Blends fresh centroids into the anchors unless they are already frozen.
    /// Unset anchors are always seeded, even with a zero update budget.
    pub fn update_anchors(&mut self, centers: &[Feature; 2]) {
        if self.anchors.is_some() && self.is_frozen() {
            return;
        }

        let rate = self.learning_rate;

        match self.anchors.as_mut() {
            None => self.anchors = Some(*centers),
            Some(anchors) => {
                for (anchor, center) in anchors.iter_mut().zip(centers) {
                    *anchor = *anchor * (1.0 - rate) + center * rate;
                }
            }
        }

        self.updates += 1;

        if self.is_frozen() {
            info!(anchors = ?self.anchors, "team anchors frozen");
        }
    }

    /// Team for every feature, in input order.
    ///
    /// Returns `None` when fewer than two features are given.
    pub fn classify(&mut self, features: &[Feature]) -> Option<Vec<Team>> {
        if features.len() < 2 {
            debug!(count = features.len(), "not enough players to split into teams");
            return None;
        }

        let data = Array2::from_shape_fn((features.len(), 3), |(i, j)| features[i][j]);
        let clustering = kmeans(data.view(), &self.params, &mut self.rng)?;

        let centers = [
            Feature::from_iterator(clustering.centers.row(0).iter().copied()),
            Feature::from_iterator(clustering.centers.row(1).iter().copied()),
        ];

        self.update_anchors(&centers);

        let anchors = self.anchors.as_ref()?;
        let mapping = realign(anchors, &centers);

        Some(clustering.labels.iter().map(|&raw| mapping[raw]).collect())
    }
}
