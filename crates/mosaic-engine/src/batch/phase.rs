use std::fmt;

/// Where the batcher is in its flush / native-draw cycle.
///
/// Legal transitions:
///
/// ```text
///   Accumulating ──► Flushing ──► Accumulating          (geometry flush)
///   Accumulating ──► Flushing ──► NativePassthrough     (text: flush first,
///                                      │                 then draw natively)
///                                      ▼
///                                 Accumulating
/// ```
///
/// Every text submission walks the lower path even when nothing is pending,
/// so a native draw can never overtake geometry submitted before it.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Submissions append to the open batch.
    #[default]
    Accumulating,
    /// The open batch is being handed to the backend.
    Flushing,
    /// The backend is drawing something outside the batch (text).
    NativePassthrough,
}

impl Phase {
    #[inline]
    pub fn can_enter(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Accumulating, Phase::Flushing)
                | (Phase::Flushing, Phase::Accumulating)
                | (Phase::Flushing, Phase::NativePassthrough)
                | (Phase::NativePassthrough, Phase::Accumulating)
        )
    }

    /// Moves to `next`, or reports the illegal edge.
    #[inline]
    pub fn enter(self, next: Phase) -> Result<Phase, PhaseError> {
        if self.can_enter(next) {
            Ok(next)
        } else {
            Err(PhaseError { from: self, to: next })
        }
    }
}

/// An illegal [`Phase`] transition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PhaseError {
    pub from: Phase,
    pub to: Phase,
}

impl fmt::Display for PhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal batch phase transition {:?} -> {:?}", self.from, self.to)
    }
}

impl std::error::Error for PhaseError {}
