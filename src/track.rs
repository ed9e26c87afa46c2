use crate::bbox::{BBox, Ltwh};
use crate::team::Team;
use serde_derive::{Deserialize, Serialize};

/// Identity carried from one frame to the next.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub id: u32,
    pub bbox: BBox<Ltwh>,
    pub team: Team,
}
