//! The visible lock indicator surface.

/// Whatever the host shows the user when protection is on: a badge glyph,
/// a tray icon, a status line. Advisory only; it reflects lock state, not
/// per-operation outcomes.
pub trait LockIndicator: Send + Sync {
    /// Show the locked glyph, or clear it.
    fn set_locked(&self, locked: bool);
}

/// Indicator for headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopIndicator;

impl LockIndicator for NoopIndicator {
    fn set_locked(&self, _locked: bool) {}
}
