//! Process-exit facility.

use std::sync::Mutex;

/// Reasons the process may terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    None,
    UserExit,
    UiClosed,
    AudioError,
}

impl ErrorCode {
    /// Status reported to the operating system.
    pub fn status(self) -> i32 {
        match self {
            ErrorCode::None | ErrorCode::UserExit | ErrorCode::UiClosed => 0,
            ErrorCode::AudioError => 1,
        }
    }
}

pub trait ExitHandler: Send + Sync {
    fn exit(&self, code: ErrorCode);
}

/// Terminates the process immediately. Event loops hand the router an
/// [`ExitSignal`] instead and call this once state has been saved.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl ExitHandler for ProcessExit {
    fn exit(&self, code: ErrorCode) {
        std::process::exit(code.status());
    }
}

/// Records the first exit request so an event loop can wind down on its own.
#[derive(Debug, Default)]
pub struct ExitSignal {
    requested: Mutex<Option<ErrorCode>>,
}

impl ExitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested(&self) -> Option<ErrorCode> {
        self.requested.lock().ok().and_then(|guard| *guard)
    }

    pub fn is_requested(&self) -> bool {
        self.requested().is_some()
    }
}

impl ExitHandler for ExitSignal {
    fn exit(&self, code: ErrorCode) {
        if let Ok(mut guard) = self.requested.lock() {
            guard.get_or_insert(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_keeps_first_request() {
        let signal = ExitSignal::new();
        assert!(!signal.is_requested());
        signal.exit(ErrorCode::UserExit);
        signal.exit(ErrorCode::AudioError);
        assert_eq!(signal.requested(), Some(ErrorCode::UserExit));
    }

    #[test]
    fn statuses() {
        assert_eq!(ErrorCode::UserExit.status(), 0);
        assert_eq!(ErrorCode::AudioError.status(), 1);
    }
}
