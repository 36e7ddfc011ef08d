//! Event loop that feeds terminal input through a [`UiRouter`] and redraws
//! the active screen onto a [`TerminalCanvas`].

mod bindings;
pub mod driver;

pub use bindings::KeyBindings;

use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEventKind, KeyModifiers};
use serde_json::{Value, json};

use crate::canvas::Canvas;
use crate::error::Result;
use crate::exit::{ErrorCode, ExitHandler, ExitSignal};
use crate::geometry::Size;
use crate::keys::Key;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::render::TerminalCanvas;
use crate::router::UiRouter;

const RUNTIME_TARGET: &str = "instrument_ui::runtime";

/// Configuration knobs for the runtime loop.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Interval between synthetic tick events.
    pub tick_interval: Duration,
    /// Optional structured logger used by the loop itself.
    pub logger: Option<Logger>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    /// Follow every key-down with a key-up. Needed on terminals that never
    /// report releases.
    pub synthesize_release: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            logger: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "instrument_ui::runtime.metrics".to_string(),
            synthesize_release: true,
        }
    }
}

/// Input already translated into panel terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Key),
    Release(Key),
    Tick { elapsed: Duration },
    Resize(Size),
    /// The terminal asked to close (Ctrl-C).
    Close,
}

pub struct UiRuntime {
    router: UiRouter,
    canvas: TerminalCanvas,
    bindings: KeyBindings,
    exit: Arc<ExitSignal>,
    config: RuntimeConfig,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl UiRuntime {
    /// `exit` must be the handler the router was built with, otherwise a quit
    /// shortcut never stops the loop.
    pub fn new(router: UiRouter, exit: Arc<ExitSignal>, size: Size) -> Self {
        Self {
            router,
            canvas: TerminalCanvas::new(size),
            bindings: KeyBindings::default(),
            exit,
            config: RuntimeConfig::default(),
            start_instant: None,
            last_metrics_emit: None,
        }
    }

    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn router(&self) -> &UiRouter {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut UiRouter {
        &mut self.router
    }

    pub fn canvas(&self) -> &TerminalCanvas {
        &self.canvas
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn into_router(self) -> UiRouter {
        self.router
    }

    pub fn resize(&mut self, size: Size) {
        self.canvas.resize(size);
    }

    pub fn run(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.bootstrap(stdout)?;
        let mut last_tick = Instant::now();

        while !self.exit.is_requested() {
            let timeout = self
                .config
                .tick_interval
                .checked_sub(last_tick.elapsed())
                .unwrap_or_default();

            if event::poll(timeout)? {
                let crossterm_event = event::read()?;
                for input in self.map_event(crossterm_event) {
                    self.dispatch(input)?;
                    if self.exit.is_requested() {
                        break;
                    }
                }
                self.draw(stdout)?;
            }

            if last_tick.elapsed() >= self.config.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                self.dispatch(InputEvent::Tick { elapsed })?;
                self.draw(stdout)?;
            }

            self.maybe_emit_metrics();
        }

        self.finalize();
        Ok(())
    }

    /// Replay `events` as if they had come from the terminal. Stops early once
    /// an exit has been requested.
    pub fn run_scripted<I>(&mut self, stdout: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = InputEvent>,
    {
        self.bootstrap(stdout)?;
        for input in events {
            if self.exit.is_requested() {
                break;
            }
            self.dispatch(input)?;
            self.draw(stdout)?;
        }
        self.finalize();
        Ok(())
    }

    pub fn dispatch(&mut self, input: InputEvent) -> Result<()> {
        match input {
            InputEvent::Press(key) => {
                self.router.keypress(key)?;
            }
            InputEvent::Release(key) => {
                self.router.keyrelease(key)?;
            }
            InputEvent::Tick { .. } => {}
            InputEvent::Resize(size) => {
                self.canvas.resize(size);
                self.log_runtime_event(
                    LogLevel::Debug,
                    "resized",
                    [
                        json_kv("width", json!(size.width)),
                        json_kv("height", json!(size.height)),
                    ],
                );
            }
            InputEvent::Close => self.exit.exit(ErrorCode::UiClosed),
        }
        Ok(())
    }

    /// Translate a terminal event. A key-down yields one press, plus a release
    /// when `synthesize_release` is set. Auto-repeat only moves encoders.
    pub fn map_event(&self, event: CrosstermEvent) -> Vec<InputEvent> {
        match event {
            CrosstermEvent::Key(key_event) => {
                if key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return if key_event.kind == KeyEventKind::Release {
                        Vec::new()
                    } else {
                        vec![InputEvent::Close]
                    };
                }
                let Some(key) = self.bindings.resolve(&key_event) else {
                    return Vec::new();
                };
                match key_event.kind {
                    KeyEventKind::Press if self.config.synthesize_release => {
                        vec![InputEvent::Press(key), InputEvent::Release(key)]
                    }
                    KeyEventKind::Press => vec![InputEvent::Press(key)],
                    KeyEventKind::Repeat if key.is_rotary() => vec![InputEvent::Press(key)],
                    KeyEventKind::Repeat => Vec::new(),
                    KeyEventKind::Release => vec![InputEvent::Release(key)],
                }
            }
            CrosstermEvent::Resize(width, height) => {
                vec![InputEvent::Resize(Size::new(width, height))]
            }
            _ => Vec::new(),
        }
    }

    fn draw(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.canvas.clear();
        self.router.draw_frame(&mut self.canvas)?;
        self.canvas.render(stdout)?;
        Ok(())
    }

    fn bootstrap(&mut self, stdout: &mut impl Write) -> Result<()> {
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);
        let size = self.canvas.size();
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
                json_kv("engine", json!(self.router.selected_engine())),
            ],
        );
        self.draw(stdout)
    }

    fn finalize(&mut self) {
        if let Some(code) = self.exit.requested() {
            self.log_runtime_event(
                LogLevel::Info,
                "exit_requested",
                [json_kv("code", json!(format!("{code:?}")))],
            );
        }
        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis())
            .unwrap_or(0);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_stopped",
            [json_kv("uptime_ms", json!(uptime_ms))],
        );
    }

    fn log_runtime_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, RUNTIME_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn maybe_emit_metrics(&mut self) {
        let Some(metrics) = self.router.config().metrics_handle() else {
            return;
        };
        if self.config.metrics_interval.is_zero() {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => return,
            _ => self.last_metrics_emit = Some(now),
        }

        let uptime = self
            .start_instant
            .map(|start| now.duration_since(start))
            .unwrap_or_default();

        if let Some(logger) = self.config.logger.as_ref() {
            if let Ok(guard) = metrics.lock() {
                let target = self.config.metrics_target.as_str();
                let _ = logger.log_event(guard.snapshot(uptime).to_log_event(target));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineRegistry, Transport, TransportState};
    use crate::logging::MemorySink;
    use crate::router::RouterServices;
    use crossterm::event::KeyEvent;

    struct Harness {
        runtime: UiRuntime,
        transport: Arc<TransportState>,
        exit: Arc<ExitSignal>,
    }

    fn harness() -> Harness {
        let transport = Arc::new(TransportState::new());
        let exit = Arc::new(ExitSignal::new());
        let services = RouterServices {
            engines: Arc::new(EngineRegistry::with_panel_engines()),
            transport: transport.clone(),
            exit: exit.clone(),
        };
        let runtime = UiRuntime::new(UiRouter::new(services), exit.clone(), Size::new(40, 4));
        Harness {
            runtime,
            transport,
            exit,
        }
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    #[test]
    fn scripted_engine_switch_draws_new_screen() {
        let mut h = harness();
        let mut out = Vec::new();
        h.runtime
            .run_scripted(
                &mut out,
                [
                    InputEvent::Press(Key::Synth),
                    InputEvent::Release(Key::Synth),
                ],
            )
            .unwrap();

        assert_eq!(h.runtime.router().selected_engine(), "Synth");
        assert!(h.runtime.canvas().line(0).starts_with("Synth"));
        assert!(!out.is_empty());
    }

    #[test]
    fn quit_stops_the_script() {
        let mut h = harness();
        let mut out = Vec::new();
        h.runtime
            .run_scripted(
                &mut out,
                [
                    InputEvent::Press(Key::Quit),
                    InputEvent::Press(Key::Play),
                ],
            )
            .unwrap();

        assert_eq!(h.exit.requested(), Some(ErrorCode::UserExit));
        assert!(!h.transport.is_playing());
    }

    #[test]
    fn held_keys_show_until_released() {
        let mut h = harness();
        let mut out = Vec::new();
        h.runtime
            .run_scripted(
                &mut out,
                [
                    InputEvent::Press(Key::Drums),
                    InputEvent::Press(Key::Rec),
                ],
            )
            .unwrap();
        assert!(h.runtime.canvas().line(2).contains("Rec"));

        h.runtime.dispatch(InputEvent::Release(Key::Rec)).unwrap();
        h.runtime.draw(&mut out).unwrap();
        assert!(!h.runtime.canvas().line(2).contains("Rec"));
    }

    #[test]
    fn close_requests_ui_closed() {
        let mut h = harness();
        let mut out = Vec::new();
        h.runtime
            .run_scripted(&mut out, [InputEvent::Close])
            .unwrap();
        assert_eq!(h.exit.requested(), Some(ErrorCode::UiClosed));
    }

    #[test]
    fn resize_reshapes_canvas() {
        let mut h = harness();
        let mut out = Vec::new();
        h.runtime
            .run_scripted(&mut out, [InputEvent::Resize(Size::new(20, 2))])
            .unwrap();
        assert_eq!(h.runtime.canvas().size(), Size::new(20, 2));
    }

    #[test]
    fn press_is_followed_by_synthetic_release() {
        let h = harness();
        let mapped = h
            .runtime
            .map_event(key(KeyCode::Char(' '), KeyEventKind::Press));
        assert_eq!(
            mapped,
            vec![InputEvent::Press(Key::Play), InputEvent::Release(Key::Play)]
        );
    }

    #[test]
    fn reported_releases_pass_through() {
        let mut h = harness();
        h.runtime.config_mut().synthesize_release = false;
        let rt = &h.runtime;
        assert_eq!(
            rt.map_event(key(KeyCode::Char('g'), KeyEventKind::Press)),
            vec![InputEvent::Press(Key::Rec)]
        );
        assert_eq!(
            rt.map_event(key(KeyCode::Char('g'), KeyEventKind::Repeat)),
            Vec::new()
        );
        assert_eq!(
            rt.map_event(key(KeyCode::Char('g'), KeyEventKind::Release)),
            vec![InputEvent::Release(Key::Rec)]
        );
    }

    #[test]
    fn encoders_step_on_repeat_and_forward_release() {
        let mut h = harness();
        h.runtime.config_mut().synthesize_release = false;
        let rt = &h.runtime;
        assert_eq!(
            rt.map_event(key(KeyCode::Char('w'), KeyEventKind::Press)),
            vec![InputEvent::Press(Key::BlueUp)]
        );
        assert_eq!(
            rt.map_event(key(KeyCode::Char('w'), KeyEventKind::Repeat)),
            vec![InputEvent::Press(Key::BlueUp)]
        );
        assert_eq!(
            rt.map_event(key(KeyCode::Char('w'), KeyEventKind::Release)),
            vec![InputEvent::Release(Key::BlueUp)]
        );
    }

    #[test]
    fn encoder_presses_get_a_synthetic_release() {
        let h = harness();
        assert_eq!(
            h.runtime
                .map_event(key(KeyCode::Char('s'), KeyEventKind::Press)),
            vec![
                InputEvent::Press(Key::BlueDown),
                InputEvent::Release(Key::BlueDown)
            ]
        );
    }

    #[test]
    fn ctrl_c_closes_and_resize_maps() {
        let h = harness();
        let ctrl_c = CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(h.runtime.map_event(ctrl_c), vec![InputEvent::Close]);
        assert_eq!(
            h.runtime.map_event(CrosstermEvent::Resize(80, 24)),
            vec![InputEvent::Resize(Size::new(80, 24))]
        );
        assert!(h.runtime.map_event(CrosstermEvent::FocusGained).is_empty());
    }

    #[test]
    fn lifecycle_is_logged() {
        let mut h = harness();
        let sink = Arc::new(MemorySink::new());
        h.runtime.config_mut().logger = Some(Logger::from_arc(sink.clone()));
        let mut out = Vec::new();
        h.runtime
            .run_scripted(&mut out, [InputEvent::Press(Key::Quit)])
            .unwrap();

        let messages = sink.messages();
        assert_eq!(
            messages,
            vec![
                "runtime_started".to_string(),
                "exit_requested".to_string(),
                "runtime_stopped".to_string(),
            ]
        );
        let events = sink.events();
        assert_eq!(events[1].field("code"), Some(&json!("UserExit")));
        assert_eq!(events[0].target, RUNTIME_TARGET);
    }

    #[test]
    fn metrics_snapshot_is_emitted_once_interval_passes() {
        let mut h = harness();
        let sink = Arc::new(MemorySink::new());
        h.runtime.config_mut().logger = Some(Logger::from_arc(sink.clone()));
        h.runtime.config_mut().metrics_interval = Duration::from_millis(1);
        h.runtime.router_mut().config_mut().enable_metrics();

        let mut out = Vec::new();
        h.runtime
            .run_scripted(&mut out, [InputEvent::Press(Key::Mixer)])
            .unwrap();
        std::thread::sleep(Duration::from_millis(5));
        h.runtime.maybe_emit_metrics();

        let snapshot = sink
            .events()
            .into_iter()
            .find(|event| event.message == "router_metrics")
            .expect("snapshot logged");
        assert_eq!(snapshot.target, "instrument_ui::runtime.metrics");
        assert_eq!(snapshot.field("keypresses"), Some(&json!(1)));
    }
}
