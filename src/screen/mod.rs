//! Screen contract and the screens the routing core ships with.
//!
//! Screens are owned by the engine subsystem. The router only keeps a
//! [`SharedScreen`] handle to whichever one is active and talks to it through
//! the [`Screen`] trait.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::canvas::Canvas;
use crate::error::{Result, UiError};
use crate::keys::{Key, KeyState, RotaryEvent};

/// Shared handle to a screen owned elsewhere.
pub type SharedScreen = Arc<Mutex<dyn Screen>>;

pub fn shared<S>(screen: S) -> SharedScreen
where
    S: Screen + 'static,
{
    Arc::new(Mutex::new(screen))
}

/// True when both handles point at the same screen object.
pub fn same_screen(a: &SharedScreen, b: &SharedScreen) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

pub(crate) fn lock_screen(
    screen: &SharedScreen,
) -> Result<MutexGuard<'_, dyn Screen + 'static>> {
    screen
        .lock()
        .map_err(|err| UiError::ScreenPoisoned(err.into_inner().name().to_string()))
}

/// Control the propagation of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    Consumed,
}

impl EventFlow {
    pub fn is_consumed(self) -> bool {
        matches!(self, EventFlow::Consumed)
    }
}

/// Read-only view of router state handed to screen callbacks. The key table
/// already reflects the event being delivered.
pub struct ScreenContext<'a> {
    keys: &'a KeyState,
}

impl<'a> ScreenContext<'a> {
    pub fn new(keys: &'a KeyState) -> Self {
        Self { keys }
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.keys.is_pressed(key)
    }

    pub fn keys(&self) -> &KeyState {
        self.keys
    }
}

pub trait Screen: Send {
    fn name(&self) -> &str {
        "screen"
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, ctx: &ScreenContext<'_>) -> Result<()>;

    fn on_show(&mut self, _ctx: &ScreenContext<'_>) -> Result<()> {
        Ok(())
    }

    fn on_hide(&mut self, _ctx: &ScreenContext<'_>) -> Result<()> {
        Ok(())
    }

    fn keypress(&mut self, _ctx: &ScreenContext<'_>, _key: Key) -> Result<EventFlow> {
        Ok(EventFlow::Continue)
    }

    fn keyrelease(&mut self, _ctx: &ScreenContext<'_>, _key: Key) -> Result<EventFlow> {
        Ok(EventFlow::Continue)
    }

    fn rotary(&mut self, _ctx: &ScreenContext<'_>, _event: RotaryEvent) -> Result<()> {
        Ok(())
    }
}

/// Placeholder shown before any engine has been selected.
#[derive(Debug, Default)]
pub struct EmptyScreen;

impl Screen for EmptyScreen {
    fn name(&self) -> &str {
        "empty"
    }

    fn draw(&mut self, _canvas: &mut dyn Canvas, _ctx: &ScreenContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Generic screen that prints its title, the last encoder movement and the
/// keys currently held.
#[derive(Debug)]
pub struct TitleScreen {
    title: String,
    last_rotary: Option<RotaryEvent>,
}

impl TitleScreen {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            last_rotary: None,
        }
    }

    pub fn last_rotary(&self) -> Option<RotaryEvent> {
        self.last_rotary
    }
}

impl Screen for TitleScreen {
    fn name(&self) -> &str {
        &self.title
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, ctx: &ScreenContext<'_>) -> Result<()> {
        canvas.fill_text(0, 0, &self.title);
        if let Some(event) = self.last_rotary {
            let line = format!("{:?} {:+}", event.rotary, event.clicks);
            canvas.fill_text(1, 0, &line);
        }
        let held: Vec<String> = ctx.keys().pressed().map(|key| format!("{key:?}")).collect();
        if !held.is_empty() {
            canvas.fill_text(2, 0, &format!("held: {}", held.join(" ")));
        }
        Ok(())
    }

    fn on_hide(&mut self, _ctx: &ScreenContext<'_>) -> Result<()> {
        self.last_rotary = None;
        Ok(())
    }

    fn rotary(&mut self, _ctx: &ScreenContext<'_>, event: RotaryEvent) -> Result<()> {
        self.last_rotary = Some(event);
        Ok(())
    }
}
