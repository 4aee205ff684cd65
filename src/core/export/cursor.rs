//! Sequential batch cursor
//!
//! The cursor owns the export-unit sequence and the position of the unit
//! currently being processed. It advances only after the caller reports
//! that the current unit was merged and uploaded, so at most one unit is
//! ever in flight.

use crate::domain::{ExportUnit, GeodocError, Result};
use std::fmt;

/// Why a batch stopped before exhausting its sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Index of the unit that failed
    pub position: usize,
    pub reason: String,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {} failed: {}", self.position, self.reason)
    }
}

/// Cursor state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorState {
    /// Created but not started
    Idle,

    /// Unit at `position` is being merged and uploaded
    Processing { position: usize },

    /// Every unit succeeded
    Done,

    /// A unit failed; later units were never touched
    Aborted(BatchFailure),
}

impl CursorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CursorState::Done | CursorState::Aborted(_))
    }
}

/// Cursor over an ordered export-unit sequence
#[derive(Debug)]
pub struct BatchCursor {
    sequence: Vec<ExportUnit>,
    state: CursorState,
}

impl BatchCursor {
    pub fn new(sequence: Vec<ExportUnit>) -> Self {
        Self {
            sequence,
            state: CursorState::Idle,
        }
    }

    /// Start the batch
    ///
    /// An empty sequence goes straight to `Done`.
    pub fn start(&mut self) -> Result<&CursorState> {
        if self.state != CursorState::Idle {
            return Err(self.illegal("start"));
        }
        self.state = if self.sequence.is_empty() {
            CursorState::Done
        } else {
            CursorState::Processing { position: 0 }
        };
        Ok(&self.state)
    }

    /// The unit in flight, if any
    pub fn current(&self) -> Option<(usize, &ExportUnit)> {
        match self.state {
            CursorState::Processing { position } => {
                self.sequence.get(position).map(|unit| (position, unit))
            }
            _ => None,
        }
    }

    /// Record that the unit in flight completed and move to the next one
    ///
    /// Completing the last unit moves the cursor to `Done`.
    pub fn advance(&mut self) -> Result<&CursorState> {
        let CursorState::Processing { position } = self.state else {
            return Err(self.illegal("advance"));
        };

        let next = position + 1;
        self.state = if next >= self.sequence.len() {
            CursorState::Done
        } else {
            CursorState::Processing { position: next }
        };
        Ok(&self.state)
    }

    /// Abort the batch at the unit in flight
    pub fn abort(&mut self, reason: impl Into<String>) -> Result<&CursorState> {
        let CursorState::Processing { position } = self.state else {
            return Err(self.illegal("abort"));
        };

        self.state = CursorState::Aborted(BatchFailure {
            position,
            reason: reason.into(),
        });
        Ok(&self.state)
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    /// Number of units completed so far (`0 <= position <= len`)
    pub fn position(&self) -> usize {
        match &self.state {
            CursorState::Idle => 0,
            CursorState::Processing { position } => *position,
            CursorState::Done => self.sequence.len(),
            CursorState::Aborted(failure) => failure.position,
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn units(&self) -> &[ExportUnit] {
        &self.sequence
    }

    fn illegal(&self, operation: &str) -> GeodocError {
        GeodocError::State(format!(
            "cannot {operation} batch cursor in state {:?}",
            self.state
        ))
    }
}
