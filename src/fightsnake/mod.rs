//! Wire types of the Battlesnake API.

pub mod models;
pub mod types;
