//! Placeholder handlers used when no real decision logic is available.
//!
//! They satisfy the protocol and nothing more: the snake always heads up.

use color_eyre::Result;
use log::debug;

use super::RegistryBuilder;
use crate::fightsnake::{
    models::{GameState, Movement, Status},
    types::{APIVersion, Direction},
};

#[must_use]
pub fn info() -> Status {
    Status {
        apiversion: APIVersion::One,
        author:     "MySnake".to_owned(),
        color:      "#888888".to_owned(),
        head:       "default".to_owned(),
        tail:       "default".to_owned(),
        version:    None,
    }
}

#[allow(clippy::unnecessary_wraps)]
fn start(game_state: &GameState) -> Result<()> {
    debug!("game {} started", game_state.game_id().unwrap_or("<unknown>"));
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn get_movement(game_state: &GameState) -> Result<Movement> {
    if let Some(turn) = game_state.turn() {
        debug!("turn {turn}: moving {}", Direction::Up);
    }
    Ok(Movement::new(Direction::Up))
}

#[allow(clippy::unnecessary_wraps)]
fn end(game_state: &GameState) -> Result<()> {
    debug!("game {} over", game_state.game_id().unwrap_or("<unknown>"));
    Ok(())
}

#[must_use]
pub fn registry() -> RegistryBuilder {
    RegistryBuilder::default()
        .on_info(info)
        .on_start(start)
        .on_move(get_movement)
        .on_end(end)
}
