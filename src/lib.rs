//! Front-panel user interface for a groovebox-style instrument.
//!
//! A [`UiRouter`] tracks which panel keys are held, sends each key event to
//! either a global shortcut or the active screen, switches screens when an
//! engine is selected and persists that selection through a [`StateStore`].
//! [`UiRuntime`] drives the router from a terminal, drawing onto a
//! character-grid [`TerminalCanvas`].

pub mod canvas;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod exit;
pub mod geometry;
pub mod keys;
pub mod logging;
pub mod metrics;
pub mod render;
pub mod router;
pub mod runtime;
pub mod screen;
pub mod session;
pub mod width;

pub use canvas::{Canvas, LineCap, LineJoin, StrokeStyle};
pub use engine::{
    BasicEngine, DEFAULT_ENGINE, Engine, EngineLookup, EngineRegistry, Transport, TransportState,
};
pub use error::{Result, UiError};
pub use exit::{ErrorCode, ExitHandler, ExitSignal, ProcessExit};
pub use geometry::Size;
pub use keys::{Key, KeyState, Rotary, RotaryEvent};
pub use logging::{LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult};
pub use metrics::{MetricSnapshot, RouterMetrics};
pub use render::TerminalCanvas;
pub use router::audit::{
    NullRouterAudit, RecordingAudit, RouterAudit, RouterAuditEvent, RouterAuditEventBuilder,
    RouterAuditStage,
};
pub use router::global::{GLOBAL_KEYS, GlobalAction, global_action};
pub use router::{DEFAULT_STATE_SECTION, RouterConfig, RouterServices, UiRouter};
pub use runtime::driver::{CliDriver, CliDriverError, DriverResult};
pub use runtime::{InputEvent, KeyBindings, RuntimeConfig, UiRuntime};
pub use screen::{
    EmptyScreen, EventFlow, Screen, ScreenContext, SharedScreen, TitleScreen, same_screen, shared,
};
pub use session::{SELECTED_ENGINE_FIELD, SessionState, StateSection, StateStore};
pub use width::display_width;
