use std::{fmt, slice::Iter};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum APIVersion {
    #[serde(rename = "1")]
    One,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn iter() -> Iter<'static, Self> {
        static DIRECTIONS: [Direction; 4] = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];
        DIRECTIONS.iter()
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The spelling used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Coord {
    /// The adjacent coordinate in `direction`. The board origin is the
    /// bottom-left corner, so `Up` increases `y`.
    #[must_use]
    pub const fn neighbour(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Self {
                x: self.x,
                y: self.y + 1,
            },
            Direction::Down => Self {
                x: self.x,
                y: self.y - 1,
            },
            Direction::Left => Self {
                x: self.x - 1,
                y: self.y,
            },
            Direction::Right => Self {
                x: self.x + 1,
                y: self.y,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_use_wire_spelling() {
        let spelled: Vec<_> = Direction::iter().map(ToString::to_string).collect();
        assert_eq!(spelled, ["up", "down", "left", "right"]);

        for direction in Direction::iter() {
            let json = serde_json::to_string(direction).unwrap_or_default();
            assert_eq!(json, format!("\"{direction}\""));
        }
    }

    #[test]
    fn opposite_is_an_involution() {
        for &direction in Direction::iter() {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn neighbour_then_opposite_returns_home() {
        let home = Coord { x: 5, y: 5 };
        assert_eq!(home.neighbour(Direction::Up), Coord { x: 5, y: 6 });
        assert_eq!(home.neighbour(Direction::Left), Coord { x: 4, y: 5 });
        for &direction in Direction::iter() {
            assert_eq!(
                home.neighbour(direction).neighbour(direction.opposite()),
                home
            );
        }
    }

    #[test]
    fn api_version_serializes_as_string() {
        assert_eq!(
            serde_json::to_string(&APIVersion::One).unwrap_or_default(),
            "\"1\""
        );
    }
}
