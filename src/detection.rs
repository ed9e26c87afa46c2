use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltrb, Ltwh};
use crate::team::Team;

/// A player box as emitted for one frame: where it is, which team it plays
/// for and which track it continues.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub bbox: BBox<Ltwh>,
    pub team: Team,
    pub track_id: u32,
}

impl Detection {
    /// Corner form used by the CSV record: `x2`/`y2` are exclusive.
    #[inline]
    pub fn corners(&self) -> BBox<Ltrb> {
        self.bbox.as_ltrb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_are_exclusive_bottom_right() {
        let det = Detection {
            bbox: BBox::ltwh(10, 20, 30, 40),
            team: Team::A,
            track_id: 7,
        };
        assert_eq!(det.corners(), BBox::ltrb(10, 20, 40, 60));
        assert!(!det.bbox.contains((det.corners().right(), det.corners().bottom())));
    }
}
