//! Name-keyed handler registry.
//!
//! A [`HandlerRegistry`] is put together from one closure per protocol
//! [`Event`]. It can only be built once every event has a handler, so an
//! incomplete registry is caught when the server starts rather than when the
//! platform first calls the missing endpoint.

use std::fmt;

use color_eyre::Result;
use itertools::Itertools;
use thiserror::Error;

use super::Strategy;
use crate::fightsnake::models::{GameState, Movement, Status};

type InfoHandler = Box<dyn Fn() -> Status + Send + Sync>;
type NotifyHandler = Box<dyn Fn(&GameState) -> Result<()> + Send + Sync>;
type MoveHandler = Box<dyn Fn(&GameState) -> Result<Movement> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Info,
    Start,
    Move,
    End,
}

impl Event {
    pub const ALL: [Self; 4] = [Self::Info, Self::Start, Self::Move, Self::End];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Start => "start",
            Self::Move => "move",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("handler registry has no handler for: {}", .0.iter().join(", "))]
    MissingHandlers(Vec<Event>),
}

#[derive(Default)]
pub struct RegistryBuilder {
    info:     Option<InfoHandler>,
    start:    Option<NotifyHandler>,
    movement: Option<MoveHandler>,
    end:      Option<NotifyHandler>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn on_info(
        mut self,
        handler: impl Fn() -> Status + Send + Sync + 'static,
    ) -> Self {
        self.info = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_start(
        mut self,
        handler: impl Fn(&GameState) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.start = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_move(
        mut self,
        handler: impl Fn(&GameState) -> Result<Movement> + Send + Sync + 'static,
    ) -> Self {
        self.movement = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_end(
        mut self,
        handler: impl Fn(&GameState) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.end = Some(Box::new(handler));
        self
    }

    fn missing(&self) -> Vec<Event> {
        Event::ALL
            .into_iter()
            .filter(|event| match event {
                Event::Info => self.info.is_none(),
                Event::Start => self.start.is_none(),
                Event::Move => self.movement.is_none(),
                Event::End => self.end.is_none(),
            })
            .collect()
    }

    /// # Errors
    ///
    /// Lists every event that was never given a handler.
    pub fn build(self) -> Result<HandlerRegistry, RegistryError> {
        let missing = self.missing();
        match self {
            Self {
                info: Some(info),
                start: Some(start),
                movement: Some(movement),
                end: Some(end),
            } => Ok(HandlerRegistry {
                info,
                start,
                movement,
                end,
            }),
            _ => Err(RegistryError::MissingHandlers(missing)),
        }
    }
}

/// A [`Strategy`] assembled from standalone functions.
pub struct HandlerRegistry {
    info:     InfoHandler,
    start:    NotifyHandler,
    movement: MoveHandler,
    end:      NotifyHandler,
}

impl HandlerRegistry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HandlerRegistry").finish_non_exhaustive()
    }
}

impl Strategy for HandlerRegistry {
    fn info(&self) -> Status {
        (self.info)()
    }

    fn start(&self, game_state: &GameState) -> Result<()> {
        (self.start)(game_state)
    }

    fn get_movement(&self, game_state: &GameState) -> Result<Movement> {
        (self.movement)(game_state)
    }

    fn end(&self, game_state: &GameState) -> Result<()> {
        (self.end)(game_state)
    }
}
