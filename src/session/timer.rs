//! Per-subject stopwatch for a timed exam session.
//!
//! One clock drives both counters. Every transition first folds the wall
//! time elapsed since the previous sync into the counters, so the result
//! does not depend on how often [`SessionTimer::tick`] is called.
//!
//! A subject's seconds are only moved into `by_subject` when the subject
//! is switched away from, deselected, or the session is finalized.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::error::{AppError, Result};
use crate::session::clock::Clock;

/// Coarse state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No subject picked yet
    Idle,
    Running,
    Paused,
    /// Finalized; only saving remains
    Finished,
}

/// Outcome of clicking a subject button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectChange {
    /// The subject is now the one being timed
    Activated(String),
    /// The active subject was clicked again and stopped
    Deselected(String),
}

/// Comparable view of the timer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub total_seconds: u64,
    pub subject_seconds: u64,
    pub current_subject: Option<String>,
    pub by_subject: BTreeMap<String, u64>,
}

/// Session stopwatch state machine.
#[derive(Debug)]
pub struct SessionTimer<C: Clock> {
    clock: C,
    last_sync: Option<Instant>,
    carry: Duration,
    total_seconds: u64,
    subject_seconds: u64,
    current: Option<String>,
    paused: bool,
    started: bool,
    finished: bool,
    by_subject: BTreeMap<String, u64>,
}

impl<C: Clock> SessionTimer<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last_sync: None,
            carry: Duration::ZERO,
            total_seconds: 0,
            subject_seconds: 0,
            current: None,
            paused: false,
            started: false,
            finished: false,
            by_subject: BTreeMap::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else if self.paused {
            Phase::Paused
        } else if !self.started {
            Phase::Idle
        } else {
            Phase::Running
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn current_subject(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Bring the counters up to date with the clock.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        let Some(last) = self.last_sync.replace(now) else {
            return;
        };
        if !self.started || self.paused || self.finished {
            return;
        }

        self.carry += now.saturating_duration_since(last);
        let whole = self.carry.as_secs();
        self.carry -= Duration::from_secs(whole);
        self.total_seconds += whole;
        if self.current.is_some() {
            self.subject_seconds += whole;
        }
    }

    /// Handle a click on a subject button.
    pub fn select_subject(&mut self, subject: &str) -> Result<SubjectChange> {
        self.tick();
        if self.finished {
            return Err(AppError::session("session already finalized"));
        }
        if self.paused {
            return Err(AppError::session("cannot switch subject while paused"));
        }

        self.commit_current();
        self.started = true;

        let change = if self.current.as_deref() == Some(subject) {
            self.current = None;
            SubjectChange::Deselected(subject.to_string())
        } else {
            self.current = Some(subject.to_string());
            SubjectChange::Activated(subject.to_string())
        };
        Ok(change)
    }

    /// Flip the pause flag. Returns whether the session is now paused.
    pub fn toggle_pause(&mut self) -> Result<bool> {
        self.tick();
        if self.finished {
            return Err(AppError::session("session already finalized"));
        }
        self.paused = !self.paused;
        Ok(self.paused)
    }

    /// Stop everything and commit the active subject. Irreversible.
    pub fn finalize(&mut self) -> Result<u64> {
        self.tick();
        if self.finished {
            return Err(AppError::session("session already finalized"));
        }
        self.paused = true;
        self.commit_current();
        self.current = None;
        self.finished = true;
        Ok(self.total_seconds)
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn subject_seconds(&self) -> u64 {
        self.subject_seconds
    }

    /// Committed seconds per subject.
    pub fn by_subject(&self) -> &BTreeMap<String, u64> {
        &self.by_subject
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            total_seconds: self.total_seconds,
            subject_seconds: self.subject_seconds,
            current_subject: self.current.clone(),
            by_subject: self.by_subject.clone(),
        }
    }

    fn commit_current(&mut self) {
        if let Some(subject) = &self.current {
            *self.by_subject.entry(subject.clone()).or_insert(0) += self.subject_seconds;
        }
        self.subject_seconds = 0;
    }
}
