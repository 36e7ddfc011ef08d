use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;

use crate::error::UiError;
use crate::geometry::Size;

use crate::runtime::UiRuntime;

pub type DriverResult<T> = std::result::Result<T, CliDriverError>;

#[derive(Debug, Error)]
pub enum CliDriverError {
    #[error("runtime error: {0}")]
    Runtime(#[from] UiError),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Owns a [`UiRuntime`] and the terminal modes it needs: raw input, the
/// alternate screen and, where the terminal supports it, key-release
/// reporting. The terminal is restored even when the loop fails.
pub struct CliDriver {
    runtime: UiRuntime,
    enhanced: bool,
}

impl CliDriver {
    pub fn new(runtime: UiRuntime) -> Self {
        Self {
            runtime,
            enhanced: false,
        }
    }

    pub fn run(mut self) -> DriverResult<UiRuntime> {
        let mut stdout = io::stdout();
        self.session(&mut stdout)?;
        Ok(self.runtime)
    }

    fn session(&mut self, stdout: &mut impl Write) -> DriverResult<()> {
        if let Err(err) = self.enter(stdout) {
            self.exit(stdout);
            return Err(err);
        }
        let result = self.run_inner(stdout);
        self.exit(stdout);
        result
    }

    fn run_inner(&mut self, stdout: &mut impl Write) -> DriverResult<()> {
        let (width, height) = terminal::size()?;
        self.runtime.resize(Size::new(width, height));
        self.runtime.run(stdout)?;
        Ok(())
    }

    fn enter(&mut self, stdout: &mut impl Write) -> DriverResult<()> {
        terminal::enable_raw_mode().map_err(|err| CliDriverError::Terminal(err.to_string()))?;
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

        self.enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.enhanced {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        self.runtime.config_mut().synthesize_release = !self.enhanced;
        Ok(())
    }

    fn exit(&self, stdout: &mut impl Write) {
        if self.enhanced {
            execute!(stdout, PopKeyboardEnhancementFlags).ok();
        }
        execute!(stdout, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::engine::{EngineRegistry, TransportState};
    use crate::exit::ExitSignal;
    use crate::router::{RouterServices, UiRouter};

    /// Accepts bytes but fails every flush, so the first `execute!` errors.
    #[derive(Default)]
    struct BrokenTerminal {
        written: Vec<u8>,
    }

    impl Write for BrokenTerminal {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"))
        }
    }

    fn driver() -> CliDriver {
        let exit = Arc::new(ExitSignal::new());
        let services = RouterServices {
            engines: Arc::new(EngineRegistry::with_panel_engines()),
            transport: Arc::new(TransportState::new()),
            exit: exit.clone(),
        };
        CliDriver::new(UiRuntime::new(
            UiRouter::new(services),
            exit,
            Size::new(10, 2),
        ))
    }

    #[test]
    fn failed_setup_still_restores_the_terminal() {
        let mut driver = driver();
        let mut terminal = BrokenTerminal::default();

        assert!(driver.session(&mut terminal).is_err());

        let written = String::from_utf8_lossy(&terminal.written);
        assert!(written.ends_with("\x1b[?25h\x1b[?1049l"), "{written:?}");
    }
}
