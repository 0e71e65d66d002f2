use std::{collections::VecDeque, fmt};

use serde::{de, de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::fightsnake::types::{APIVersion, Coord, Direction};

struct DeserializeU64OrStringVisitor;

impl<'de> de::Visitor<'de> for DeserializeU64OrStringVisitor {
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or string")
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(v)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(v.parse::<u64>().unwrap_or(0))
    }
}

fn from_string_or_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DeserializeU64OrStringVisitor)
}

/// Response to the info request.
#[derive(Serialize, Debug, Clone)]
pub struct Status {
    pub apiversion: APIVersion,
    pub author:     String,
    pub color:      String,
    pub head:       String,
    pub tail:       String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version:    Option<String>,
}

/// Response to a move request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    #[serde(rename = "move")]
    pub movement: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shout:    Option<String>,
}

impl Movement {
    #[must_use]
    pub const fn new(movement: Direction) -> Self {
        Self {
            movement,
            shout: None,
        }
    }

    #[must_use]
    pub fn with_shout(mut self, shout: impl Into<String>) -> Self {
        self.shout = Some(shout.into());
        self
    }
}

/// The game state document sent by the platform with every lifecycle call.
///
/// The server treats it as opaque JSON. Strategies that want structure can
/// [`decode`](GameState::decode) it into a [`GameSnapshot`] or their own
/// type.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct GameState(Value);

impl GameState {
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// # Errors
    ///
    /// Fails when the document does not have the shape of `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.0)
    }

    #[must_use]
    pub fn turn(&self) -> Option<u64> {
        self.0.get("turn").and_then(Value::as_u64)
    }

    #[must_use]
    pub fn game_id(&self) -> Option<&str> {
        self.0.pointer("/game/id").and_then(Value::as_str)
    }
}

impl From<Value> for GameState {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Settings {
    #[serde(rename = "foodSpawnChance")]
    pub food_spawn_chance:      Option<u64>,
    #[serde(rename = "minimumFood")]
    pub minimum_food:           Option<u64>,
    #[serde(rename = "hazardDamagePerTurn")]
    pub hazard_damage_per_turn: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Ruleset {
    pub name:     String,
    pub version:  String,
    pub settings: Option<Settings>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Game {
    pub id:      String,
    pub ruleset: Ruleset,
    pub map:     Option<String>,
    pub source:  Option<String>,
    pub timeout: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Board {
    pub height:  i64,
    pub width:   i64,
    #[serde(default)]
    pub food:    Vec<Coord>,
    #[serde(default)]
    pub hazards: Vec<Coord>,
    #[serde(default)]
    pub snakes:  Vec<Snake>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Customizations {
    pub color: String,
    pub head:  String,
    pub tail:  String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Snake {
    pub id:             String,
    pub name:           String,
    pub health:         i64,
    pub body:           VecDeque<Coord>,
    #[serde(deserialize_with = "from_string_or_u64", default)]
    pub latency:        u64,
    pub head:           Coord,
    pub length:         u64,
    #[serde(default)]
    pub shout:          String,
    #[serde(default)]
    pub squad:          String,
    pub customizations: Option<Customizations>,
}

/// Typed view of a complete [`GameState`].
#[derive(Deserialize, Debug, Clone)]
pub struct GameSnapshot {
    pub game:  Game,
    pub turn:  u64,
    pub board: Board,
    pub you:   Snake,
}
