use image::Rgb;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(into = "u8", try_from = "u8")]
pub enum Team {
    A,
    B,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Team::A => 0,
            Team::B => 1,
        }
    }

    #[inline]
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Team::A),
            1 => Some(Team::B),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Team::A => "Team A",
            Team::B => "Team B",
        }
    }

    /// Overlay color for renderers.
    pub fn color(self) -> Rgb<u8> {
        match self {
            Team::A => Rgb([255, 0, 0]),
            Team::B => Rgb([0, 0, 255]),
        }
    }
}

impl From<Team> for u8 {
    fn from(team: Team) -> Self {
        team.index() as u8
    }
}

impl TryFrom<u8> for Team {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Team::from_index(value as usize).ok_or_else(|| format!("unknown team label {}", value))
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for team in Team::ALL {
            assert_eq!(Team::from_index(team.index()), Some(team));
        }
        assert_eq!(Team::from_index(2), None);
        assert!(Team::try_from(7u8).is_err());
    }

    #[test]
    fn labels_for_display() {
        assert_eq!(Team::A.name(), "Team A");
        assert_eq!(Team::B.name(), "Team B");
        assert_eq!(Team::B.to_string(), "1");
        assert_ne!(Team::A.color(), Team::B.color());
    }

    #[test]
    fn serialized_as_label() {
        assert_eq!(serde_json::to_string(&Team::B).unwrap(), "1");
        assert_eq!(serde_json::from_str::<Team>("0").unwrap(), Team::A);
        assert!(serde_json::from_str::<Team>("3").is_err());
    }
}
