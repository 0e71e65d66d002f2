pub mod fallback;
pub mod registry;

use std::sync::Arc;

use color_eyre::Result;
use log::warn;
pub use registry::{Event, HandlerRegistry, RegistryBuilder, RegistryError};

use crate::fightsnake::models::{GameState, Movement, Status};

/// The four decisions a snake has to make over the course of a game.
///
/// Implementations are shared between concurrent requests, so they must be
/// safe to call from several threads at once.
pub trait Strategy: Send + Sync {
    fn info(&self) -> Status;

    /// # Errors
    ///
    /// A failure is reported to the platform as a server error.
    fn start(&self, game_state: &GameState) -> Result<()>;

    /// # Errors
    ///
    /// Can fail for a wide range of reasons usually due to invalid game states.
    fn get_movement(&self, game_state: &GameState) -> Result<Movement>;

    /// # Errors
    ///
    /// A failure is reported to the platform as a server error.
    fn end(&self, game_state: &GameState) -> Result<()>;
}

/// Builds the strategy the server will run with.
///
/// `external` is the registry supplied by real decision logic, if there is
/// any. Without one the [fallback](fallback::registry) is used instead.
///
/// # Errors
///
/// Fails if the chosen registry is missing any of its handlers.
pub fn resolve(
    external: Option<RegistryBuilder>,
) -> Result<Arc<dyn Strategy>, RegistryError> {
    let builder = external.unwrap_or_else(|| {
        warn!("no decision logic supplied, using the fallback handlers");
        fallback::registry()
    });

    Ok(Arc::new(builder.build()?))
}
