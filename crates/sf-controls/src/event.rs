//! Change notifications emitted by parameter controls.

/// What caused a value change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// Slider drag (or release of a non-live drag).
    Drag,
    /// Free-text entry.
    Text,
    /// Reset button.
    Reset,
    /// Set from code.
    Programmatic,
    /// Bounds edited so the value no longer fit and was pulled inside.
    Bounds,
}

/// A committed value change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamChange {
    pub old: f64,
    pub new: f64,
    pub source: ChangeSource,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

pub(crate) type Listener = Box<dyn FnMut(&ParamChange) + Send>;
