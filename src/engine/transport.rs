use std::sync::atomic::{AtomicBool, Ordering};

/// Playback transport consulted by the play shortcut.
pub trait Transport: Send + Sync {
    fn is_playing(&self) -> bool;
    fn play(&self);
    fn stop(&self);
}

/// Transport reduced to its playing flag.
#[derive(Debug, Default)]
pub struct TransportState {
    playing: AtomicBool,
}

impl TransportState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for TransportState {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn play(&self) {
        self.playing.store(true, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.playing.store(false, Ordering::SeqCst);
    }
}
