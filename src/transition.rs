/*!
 * Change detection between consecutive cue lookups.
 *
 * The detector remembers the text of the last cue it reported and only
 * emits an event when a lookup yields a cue with different text. Repeated
 * lookups inside the same cue (one per clock tick) are no-ops.
 */

use crate::cue_track::Cue;

/// Outcome of comparing a lookup with the previous one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A cue with new text became active
    Entered(String),
    /// No cue is active anymore; displayed text must be cleared
    Cleared,
    /// Nothing to do
    Unchanged,
}

#[derive(Debug, Default)]
pub struct TransitionDetector {
    /// Text of the last cue reported through `Entered`
    last_text: Option<String>,
    /// Whether a cue is active as of the latest lookup
    displaying: bool,
}

impl TransitionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare a lookup result with the previous state.
    ///
    /// The new text is committed before `Entered` is returned, so a caller
    /// that re-enters `observe` while handling the event sees it as
    /// unchanged. Leaving a cue keeps the last text: re-entering a cue with
    /// the same text after a gap is not a transition.
    pub fn observe(&mut self, cue: Option<&Cue>) -> Transition {
        match cue {
            None => {
                if std::mem::replace(&mut self.displaying, false) {
                    Transition::Cleared
                } else {
                    Transition::Unchanged
                }
            }
            Some(cue) => {
                self.displaying = true;
                if self.last_text.as_deref() == Some(cue.text()) {
                    return Transition::Unchanged;
                }
                self.last_text = Some(cue.text().to_string());
                Transition::Entered(cue.text().to_string())
            }
        }
    }

    /// Text of the cue active as of the latest lookup
    pub fn active_text(&self) -> Option<&str> {
        if self.displaying {
            self.last_text.as_deref()
        } else {
            None
        }
    }

    /// Text of the last cue that triggered a transition
    pub fn last_text(&self) -> Option<&str> {
        self.last_text.as_deref()
    }

    /// Forget everything, e.g. when a new track is loaded
    pub fn reset(&mut self) {
        self.last_text = None;
        self.displaying = false;
    }
}
