//=========================================================================
// Engine Errors
//=========================================================================
//
// Fatal (construction-time) and recoverable error kinds surfaced by the
// engine. Image decode failures are not listed here: they are recovered
// inside the sprite module and never reach game code.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== GameError ===========================================================

/// Errors surfaced by the engine and by game setup.
#[derive(Debug, Error)]
pub enum GameError {
    /// The surface locator did not resolve to a drawable surface.
    #[error("surface not found: {0}")]
    SurfaceNotFound(String),

    /// A 2D drawing context could not be obtained for the surface.
    #[error("drawing context unavailable: {0}")]
    ContextUnavailable(String),

    /// Operation not valid for the current state (e.g. reordering an empty set).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Game setup reported a failure.
    #[error("setup failed: {0}")]
    Setup(String),

    /// The host event loop could not be created or stopped abnormally.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<GameError>();
    }

    #[test]
    fn display_includes_detail() {
        let err = GameError::SurfaceNotFound("#game".into());
        assert_eq!(err.to_string(), "surface not found: #game");

        let err = GameError::InvalidOperation("empty sprite set".into());
        assert!(err.to_string().contains("empty sprite set"));
    }
}
