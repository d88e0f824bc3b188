// solecart/src/reconciler/pending.rs

//! The per-line arena of cancellable debounce timers.

use crate::model::LineId;
use std::collections::HashMap;
use tokio::task::JoinHandle;

/// A scheduled persistence for one line: the sleeping debounce task and the
/// generation it will persist if nothing supersedes it.
#[derive(Debug)]
pub(crate) struct PendingUpdate {
  task: JoinHandle<()>,
  pub(crate) generation: u64,
}

impl PendingUpdate {
  pub(crate) fn new(task: JoinHandle<()>, generation: u64) -> Self {
    Self { task, generation }
  }

  /// Aborts the timer. Has no effect once the task has moved past its sleep
  /// and removed itself from the arena.
  pub(crate) fn cancel(self) {
    self.task.abort();
  }
}

#[derive(Debug, Default)]
pub(crate) struct TimerArena {
  pending: HashMap<LineId, PendingUpdate>,
}

impl TimerArena {
  /// Installs `next` for `line_id`, cancelling whatever was scheduled before.
  /// Returns `true` if an earlier timer was replaced.
  pub(crate) fn replace(&mut self, line_id: LineId, next: PendingUpdate) -> bool {
    match self.pending.insert(line_id, next) {
      Some(previous) => {
        previous.cancel();
        true
      }
      None => false,
    }
  }

  /// Called by a timer that has fired. Removes the entry if it still belongs
  /// to that timer and reports whether it did; `false` means the timer was
  /// replaced or cancelled while it was waking up.
  pub(crate) fn claim(&mut self, line_id: LineId, generation: u64) -> bool {
    if self.pending.get(&line_id).map(|p| p.generation) == Some(generation) {
      self.pending.remove(&line_id);
      true
    } else {
      false
    }
  }

  pub(crate) fn cancel(&mut self, line_id: LineId) -> bool {
    match self.pending.remove(&line_id) {
      Some(pending) => {
        pending.cancel();
        true
      }
      None => false,
    }
  }

  /// Cancels every timer and returns how many were pending.
  pub(crate) fn cancel_all(&mut self) -> usize {
    let count = self.pending.len();
    for (_, pending) in self.pending.drain() {
      pending.cancel();
    }
    count
  }

  pub(crate) fn len(&self) -> usize {
    self.pending.len()
  }
}
