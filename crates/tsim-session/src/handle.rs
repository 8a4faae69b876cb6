//! A shareable handle to a run.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use rand::rngs::StdRng;

use tsim_core::{ContentCatalog, Ending, EndingProgress, StatProfile};
use tsim_mechanics::{CombatAction, Roller};

use crate::config::RunConfig;
use crate::error::{InvalidAction, SessionError, SessionResult};
use crate::journal::Journal;
use crate::progression::ProgressSummary;
use crate::run::{Run, RunId};
use crate::view::{ChoiceReport, CombatReport, ItemReport, View};

/// A cloneable handle to one run.
///
/// Actions are applied one at a time. An action submitted while another is
/// still being applied is rejected with [`InvalidAction::AlreadyResolving`]
/// instead of waiting.
#[derive(Debug)]
pub struct RunHandle<R: Roller = StdRng> {
    inner: Arc<Mutex<Run<R>>>,
}

impl<R: Roller> Clone for RunHandle<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Start a seeded run and wrap it in a handle.
pub fn start_run(
    catalog: ContentCatalog,
    class_id: &str,
    config: RunConfig,
) -> SessionResult<RunHandle> {
    Run::start(catalog, class_id, config).map(RunHandle::from_run)
}

impl<R: Roller> RunHandle<R> {
    /// Wrap an existing run.
    pub fn from_run(run: Run<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(run)),
        }
    }

    fn lock(&self) -> SessionResult<MutexGuard<'_, Run<R>>> {
        match self.inner.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => Err(InvalidAction::AlreadyResolving.into()),
            Err(TryLockError::Poisoned(_)) => Err(SessionError::StateBoundsViolation(
                "run state poisoned by a panicked action".to_string(),
            )),
        }
    }

    /// Run id.
    pub fn id(&self) -> SessionResult<RunId> {
        Ok(self.lock()?.id())
    }

    /// See [`Run::submit_choice`].
    pub fn submit_choice(&self, index: usize) -> SessionResult<ChoiceReport> {
        self.lock()?.submit_choice(index)
    }

    /// See [`Run::combat_action`].
    pub fn combat_action(&self, action: CombatAction) -> SessionResult<CombatReport> {
        self.lock()?.combat_action(action)
    }

    /// See [`Run::use_item`].
    pub fn use_item(&self, item_id: &str) -> SessionResult<ItemReport> {
        self.lock()?.use_item(item_id)
    }

    /// See [`Run::request_ending_now`].
    pub fn request_ending_now(&self) -> SessionResult<Ending> {
        Ok(self.lock()?.request_ending_now())
    }

    /// See [`Run::current_view`].
    pub fn current_view(&self) -> SessionResult<View> {
        Ok(self.lock()?.current_view())
    }

    /// See [`Run::progress_summary`].
    pub fn progress_summary(&self) -> SessionResult<ProgressSummary> {
        self.lock()?.progress_summary()
    }

    /// See [`Run::ending_progress`].
    pub fn ending_progress(&self) -> SessionResult<Vec<EndingProgress>> {
        Ok(self.lock()?.ending_progress())
    }

    /// A snapshot of the therapist.
    pub fn profile(&self) -> SessionResult<StatProfile> {
        Ok(self.lock()?.profile().clone())
    }

    /// A snapshot of the journal.
    pub fn journal(&self) -> SessionResult<Journal> {
        Ok(self.lock()?.journal().clone())
    }

    /// The ending, once resolved.
    pub fn ending(&self) -> SessionResult<Option<Ending>> {
        Ok(self.lock()?.ending().cloned())
    }
}
