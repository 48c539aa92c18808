#![forbid(unsafe_code)]

//! Reveal progress as shown to the learner.

use std::fmt;

/// Current step and total, as emitted by the controller after every
/// state-affecting operation and printed by the renderer's readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Progress {
    /// Index of the last revealed step, `None` before the first reveal.
    pub step: Option<usize>,
    /// Number of steps in the triangle.
    pub total: usize,
}

impl Progress {
    #[inline]
    pub const fn new(step: Option<usize>, total: usize) -> Self {
        Self { step, total }
    }

    /// Number of revealed cells, i.e. `stepIndex + 1`.
    #[inline]
    pub const fn display_step(self) -> usize {
        match self.step {
            Some(step) => step + 1,
            None => 0,
        }
    }

    /// Signed step index with -1 meaning nothing revealed.
    #[inline]
    pub fn step_index(self) -> i64 {
        self.step
            .and_then(|s| i64::try_from(s).ok())
            .unwrap_or(-1)
    }

    /// Rounded percentage of revealed cells.
    pub const fn percent(self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.display_step() * 100 + self.total / 2) / self.total
    }

    /// Whether the last step has been revealed.
    #[inline]
    pub const fn is_complete(self) -> bool {
        self.total > 0 && self.display_step() == self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}%)",
            self.display_step(),
            self.total,
            self.percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_progress() {
        let p = Progress::new(None, 10);
        assert_eq!(p.display_step(), 0);
        assert_eq!(p.step_index(), -1);
        assert_eq!(p.percent(), 0);
        assert!(!p.is_complete());
        assert_eq!(p.to_string(), "0/10 (0%)");
    }

    #[test]
    fn rounding_and_completion() {
        assert_eq!(Progress::new(Some(0), 6).percent(), 17);
        assert_eq!(Progress::new(Some(4), 6).to_string(), "5/6 (83%)");
        let done = Progress::new(Some(5), 6);
        assert!(done.is_complete());
        assert_eq!(done.percent(), 100);
    }
}
