use crate::bbox::{BBox, Ltwh};
use crate::{Detection, Team, Track};

use nalgebra as na;
use std::collections::BTreeMap;
use tracing::debug;

/// Nearest-center identity association with sticky team labels.
///
/// Only the previous frame is remembered: a track that finds no box within
/// `match_distance` is dropped. Matching is not exclusive, two boxes may
/// continue the same track and the later one wins its slot.
#[derive(Debug, Clone)]
pub struct IdentityTracker {
    match_distance: f32,
    next_id: u32,
    tracks: BTreeMap<u32, Track>,
}

impl IdentityTracker {
    pub fn new(match_distance: f32) -> Self {
        Self {
            match_distance,
            next_id: 0,
            tracks: BTreeMap::new(),
        }
    }

    pub fn reset(&mut self) {
        self.next_id = 0;
        self.tracks.clear();
    }

    /// Live tracks ordered by id.
    #[inline]
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    #[inline]
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Previous-frame track whose center is nearest to `bbox`, if closer than
    /// the match distance. Equal distances go to the lower id.
    pub fn closest_track(&self, bbox: &BBox<Ltwh>) -> Option<&Track> {
        let center = bbox.center();
        let mut best: Option<&Track> = None;
        let mut dmin = self.match_distance;

        for track in self.tracks.values() {
            let d = na::distance(&center, &track.bbox.center());

            if d < dmin {
                dmin = d;
                best = Some(track);
            }
        }

        best
    }

    /// Associates this frame's boxes with the previous frame and replaces the
    /// track table with the result. `teams` holds the fresh labels, one per box.
    pub fn update(&mut self, boxes: &[BBox<Ltwh>], teams: &[Team]) -> Vec<Detection> {
        let mut current = BTreeMap::new();
        let mut detections = Vec::with_capacity(boxes.len());
        let mut created = 0;

        for (bbox, &fresh) in boxes.iter().zip(teams) {
            let (id, team) = match self.closest_track(bbox).map(|t| (t.id, t.team)) {
                Some(prev) => prev,
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    created += 1;

                    (id, fresh)
                }
            };

            current.insert(
                id,
                Track {
                    id,
                    bbox: *bbox,
                    team,
                },
            );

            detections.push(Detection {
                bbox: *bbox,
                team,
                track_id: id,
            });
        }

        debug!(
            matched = detections.len() - created,
            created,
            dropped = self
                .tracks
                .keys()
                .filter(|id| !current.contains_key(*id))
                .count(),
            "tracks associated"
        );

        self.tracks = current;

        detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> IdentityTracker {
        IdentityTracker::new(50.0)
    }

    #[test]
    fn new_boxes_get_fresh_ids() {
        let mut t = tracker();
        let out = t.update(
            &[BBox::ltwh(0, 0, 20, 40), BBox::ltwh(300, 0, 20, 40)],
            &[Team::A, Team::B],
        );

        assert_eq!(out[0].track_id, 0);
        assert_eq!(out[1].track_id, 1);
        assert_eq!(out[0].team, Team::A);
        assert_eq!(out[1].team, Team::B);
        assert_eq!(t.next_id(), 2);
    }

    #[test]
    fn team_sticks_to_track() {
        let mut t = tracker();
        t.update(&[BBox::ltwh(100, 100, 20, 40)], &[Team::A]);

        let out = t.update(&[BBox::ltwh(110, 105, 20, 40)], &[Team::B]);
        assert_eq!(out[0].track_id, 0);
        assert_eq!(out[0].team, Team::A);
    }

    #[test]
    fn far_box_starts_new_track_with_fresh_label() {
        let mut t = tracker();
        t.update(&[BBox::ltwh(100, 100, 20, 40)], &[Team::A]);

        // centers exactly 50 px apart do not match
        let out = t.update(&[BBox::ltwh(150, 100, 20, 40)], &[Team::B]);
        assert_eq!(out[0].track_id, 1);
        assert_eq!(out[0].team, Team::B);

        let ids: Vec<u32> = t.tracks().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn unmatched_tracks_are_dropped_and_ids_never_reused() {
        let mut t = tracker();
        t.update(&[BBox::ltwh(0, 0, 20, 40)], &[Team::A]);
        t.update(&[BBox::ltwh(500, 500, 20, 40)], &[Team::B]);

        // the first location is back, but its track is gone
        let out = t.update(&[BBox::ltwh(0, 0, 20, 40)], &[Team::B]);
        assert_eq!(out[0].track_id, 2);
        assert_eq!(out[0].team, Team::B);
    }

    #[test]
    fn nearest_track_wins() {
        let mut t = tracker();
        t.update(
            &[BBox::ltwh(100, 100, 20, 40), BBox::ltwh(130, 100, 20, 40)],
            &[Team::A, Team::B],
        );

        let out = t.update(&[BBox::ltwh(125, 100, 20, 40)], &[Team::A]);
        assert_eq!(out[0].track_id, 1);
        assert_eq!(out[0].team, Team::B);
    }

    #[test]
    fn matching_is_not_exclusive() {
        let mut t = tracker();
        t.update(&[BBox::ltwh(100, 100, 20, 40)], &[Team::B]);

        let out = t.update(
            &[BBox::ltwh(95, 100, 20, 40), BBox::ltwh(108, 100, 20, 40)],
            &[Team::A, Team::A],
        );
        assert_eq!(out[0].track_id, 0);
        assert_eq!(out[1].track_id, 0);
        assert!(out.iter().all(|d| d.team == Team::B));

        let live: Vec<&Track> = t.tracks().collect();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].bbox, BBox::ltwh(108, 100, 20, 40));
    }

    #[test]
    fn reset_restarts_ids() {
        let mut t = tracker();
        t.update(&[BBox::ltwh(0, 0, 20, 40)], &[Team::A]);
        t.reset();

        assert_eq!(t.tracks().count(), 0);
        let out = t.update(&[BBox::ltwh(0, 0, 20, 40)], &[Team::B]);
        assert_eq!(out[0].track_id, 0);
        assert_eq!(out[0].team, Team::B);
    }
}
