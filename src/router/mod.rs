//! Key routing and active-screen management.
//!
//! [`UiRouter`] owns the held-key table, the handle to the active screen and
//! the persisted engine selection. Key events run through it one at a time:
//! encoder directions go straight to the screen, every other key-down is
//! offered to the global shortcut table first, and key-ups always reach the
//! screen. Screen changes run `on_hide` on the outgoing screen and `on_show`
//! on the incoming one, in that order, even when both are the same object.

pub mod audit;
mod config;
pub mod global;

pub use config::{DEFAULT_STATE_SECTION, RouterConfig};

use std::sync::Arc;

use serde_json::{Value, json};

use crate::canvas::{Canvas, LineCap, LineJoin};
use crate::engine::{EngineLookup, Transport};
use crate::error::{Result, UiError};
use crate::exit::{ErrorCode, ExitHandler};
use crate::keys::{Key, KeyState};
use crate::logging::{LogLevel, event_with_fields, json_kv, json_str};
use crate::metrics::RouterMetrics;
use crate::screen::{
    EmptyScreen, EventFlow, ScreenContext, SharedScreen, lock_screen, same_screen, shared,
};
use crate::session::{SessionState, StateSection, StateStore};

use audit::{RouterAuditEventBuilder, RouterAuditStage};
use global::{GlobalAction, global_action};

const ROUTER_TARGET: &str = "instrument_ui::router";

/// Collaborators the router delegates to.
#[derive(Clone)]
pub struct RouterServices {
    pub engines: Arc<dyn EngineLookup>,
    pub transport: Arc<dyn Transport>,
    pub exit: Arc<dyn ExitHandler>,
}

pub struct UiRouter {
    keys: KeyState,
    empty: SharedScreen,
    active: SharedScreen,
    session: SessionState,
    services: RouterServices,
    config: RouterConfig,
}

impl UiRouter {
    pub fn new(services: RouterServices) -> Self {
        Self::with_config(services, RouterConfig::default())
    }

    pub fn with_config(services: RouterServices, config: RouterConfig) -> Self {
        let empty = shared(EmptyScreen);
        Self {
            keys: KeyState::new(),
            active: Arc::clone(&empty),
            empty,
            session: SessionState::new(),
            services,
            config,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RouterConfig {
        &mut self.config
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.keys.is_pressed(key)
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    pub fn active_screen(&self) -> &SharedScreen {
        &self.active
    }

    /// True until the first screen has been displayed.
    pub fn showing_empty_screen(&self) -> bool {
        same_screen(&self.active, &self.empty)
    }

    pub fn selected_engine(&self) -> &str {
        self.session.selected_engine()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Register the router's section with the state store. Loading and saving
    /// happen when the store's owner calls `load_into`/`save_from`.
    pub fn init(&self, store: &mut StateStore) {
        store.attach(self.config.state_section.clone());
    }

    /// Make `screen` the active screen: hide the current one, swap, show the
    /// new one.
    pub fn display(&mut self, screen: SharedScreen) -> Result<()> {
        let ctx = ScreenContext::new(&self.keys);

        let outgoing = {
            let mut current = lock_screen(&self.active)?;
            current.on_hide(&ctx)?;
            current.name().to_string()
        };
        self.audit(
            RouterAuditEventBuilder::new(RouterAuditStage::ScreenHidden)
                .detail("screen", outgoing.clone()),
        );

        self.active = screen;

        let incoming = {
            let mut next = lock_screen(&self.active)?;
            next.on_show(&ctx)?;
            next.name().to_string()
        };
        self.audit(
            RouterAuditEventBuilder::new(RouterAuditStage::ScreenShown)
                .detail("screen", incoming.clone()),
        );

        self.with_metrics(RouterMetrics::record_transition);
        self.log(
            LogLevel::Debug,
            "screen_displayed",
            [json_str("from", outgoing), json_str("to", incoming)],
        );
        Ok(())
    }

    /// Select the engine called `name`, falling back to the configured default
    /// engine when no such engine exists, and display its screen. The
    /// requested name is kept as the selection either way.
    pub fn select_engine(&mut self, name: &str) -> Result<()> {
        self.session.set_selected_engine(name);

        let engine = match self.services.engines.engine_by_name(name) {
            Some(engine) => {
                self.audit(
                    RouterAuditEventBuilder::new(RouterAuditStage::EngineSelected)
                        .detail("engine", engine.name()),
                );
                engine
            }
            None => {
                let fallback = self.config.default_engine.as_str();
                let engine = self
                    .services
                    .engines
                    .engine_by_name(fallback)
                    .ok_or_else(|| UiError::DefaultEngineMissing(fallback.to_string()))?;
                self.audit(
                    RouterAuditEventBuilder::new(RouterAuditStage::EngineFallback)
                        .detail("requested", name)
                        .detail("engine", engine.name()),
                );
                self.log(
                    LogLevel::Debug,
                    "engine_fallback",
                    [json_str("requested", name), json_str("engine", engine.name())],
                );
                engine
            }
        };

        self.log(
            LogLevel::Info,
            "engine_selected",
            [json_str("engine", engine.name())],
        );
        self.display(engine.screen())
    }

    /// Route a key-down. Returns whether the key was consumed.
    pub fn keypress(&mut self, key: Key) -> Result<EventFlow> {
        if let Some(event) = key.rotary() {
            let ctx = ScreenContext::new(&self.keys);
            lock_screen(&self.active)?.rotary(&ctx, event)?;
            self.with_metrics(RouterMetrics::record_rotary);
            self.audit(
                RouterAuditEventBuilder::new(RouterAuditStage::RotaryForwarded)
                    .detail("rotary", format!("{:?}", event.rotary))
                    .detail("clicks", event.clicks),
            );
            return Ok(EventFlow::Consumed);
        }

        self.keys.set(key, true);
        self.with_metrics(RouterMetrics::record_keypress);
        self.audit(
            RouterAuditEventBuilder::new(RouterAuditStage::KeyPressed)
                .detail("key", format!("{key:?}")),
        );

        if self.handle_global(key)?.is_consumed() {
            return Ok(EventFlow::Consumed);
        }

        let ctx = ScreenContext::new(&self.keys);
        lock_screen(&self.active)?.keypress(&ctx, key)
    }

    /// Route a key-up. The screen always sees it.
    pub fn keyrelease(&mut self, key: Key) -> Result<EventFlow> {
        self.keys.set(key, false);
        self.with_metrics(RouterMetrics::record_keyrelease);
        self.audit(
            RouterAuditEventBuilder::new(RouterAuditStage::KeyReleased)
                .detail("key", format!("{key:?}")),
        );

        let ctx = ScreenContext::new(&self.keys);
        lock_screen(&self.active)?.keyrelease(&ctx, key)
    }

    /// Run the global action bound to `key`, if any.
    pub fn handle_global(&mut self, key: Key) -> Result<EventFlow> {
        let Some(action) = global_action(key) else {
            return Ok(EventFlow::Continue);
        };

        self.with_metrics(RouterMetrics::record_global_shortcut);
        self.audit(
            RouterAuditEventBuilder::new(RouterAuditStage::GlobalShortcut)
                .detail("key", format!("{key:?}"))
                .detail("action", format!("{action:?}")),
        );
        self.log(
            LogLevel::Debug,
            "global_shortcut",
            [
                json_str("key", format!("{key:?}")),
                json_str("action", format!("{action:?}")),
            ],
        );

        match action {
            GlobalAction::Quit => self.services.exit.exit(ErrorCode::UserExit),
            GlobalAction::SelectEngine(name) => self.select_engine(name)?,
            GlobalAction::TogglePlay => self.toggle_play(),
        }
        Ok(EventFlow::Consumed)
    }

    /// Set up the stroke state every frame starts from and let the active
    /// screen draw.
    pub fn draw_frame(&self, canvas: &mut dyn Canvas) -> Result<()> {
        canvas.line_width(2.0);
        canvas.line_cap(LineCap::Round);
        canvas.line_join(LineJoin::Round);

        let ctx = ScreenContext::new(&self.keys);
        lock_screen(&self.active)?.draw(canvas, &ctx)?;

        self.with_metrics(RouterMetrics::record_frame);
        self.audit(RouterAuditEventBuilder::new(RouterAuditStage::FrameDrawn));
        Ok(())
    }

    fn toggle_play(&self) {
        let transport = &self.services.transport;
        if transport.is_playing() {
            transport.stop();
        } else {
            transport.play();
        }
    }

    fn audit(&self, builder: RouterAuditEventBuilder) {
        self.config.audit.record(builder.finish());
    }

    fn with_metrics(&self, record: impl FnOnce(&mut RouterMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut *guard);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, ROUTER_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

impl StateSection for UiRouter {
    fn section(&self) -> &str {
        &self.config.state_section
    }

    /// Adopt the persisted selection when the record carries one, then select
    /// whatever name is held. An empty name resolves to the default engine.
    fn load(&mut self, record: &Value) -> Result<()> {
        let adopted = self.session.apply(record);
        let name = self.session.selected_engine().to_string();
        self.audit(
            RouterAuditEventBuilder::new(RouterAuditStage::SessionLoaded)
                .detail("adopted", adopted)
                .detail("engine", name.clone()),
        );
        self.log(
            LogLevel::Info,
            "session_loaded",
            [json_kv("adopted", json!(adopted)), json_str("engine", name.clone())],
        );
        self.select_engine(&name)
    }

    fn save(&self) -> Value {
        self.audit(
            RouterAuditEventBuilder::new(RouterAuditStage::SessionSaved)
                .detail("engine", self.session.selected_engine()),
        );
        self.session.to_value()
    }
}
