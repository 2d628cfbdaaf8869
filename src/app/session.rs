use std::time::{Duration, Instant};

use crate::app::{Message, Model, ToastLevel, update};
use crate::autosave::Autosave;
use crate::error::Result;
use crate::reconcile::Reconciled;
use crate::selection::SelectionStore;
use crate::store::{FileId, FileStore, Query, StoreEvent, Subscription};
use crate::workspace::Workspace;

/// The storage half of the application.
///
/// Owns the workspace, the autosave timer and the live subscriptions that
/// keep the model's file list in sync with the store. All message handling
/// goes through [`Session::dispatch`] so edits, effects and the autosave
/// timer stay in step.
pub struct Session<S, P> {
    pub(super) workspace: Workspace<S, P>,
    pub(super) autosave: Autosave,
    files_sub: Subscription,
    active_sub: Option<Subscription>,
}

impl<S: FileStore, P: SelectionStore> Session<S, P> {
    pub fn new(mut workspace: Workspace<S, P>, autosave_delay: Duration) -> Self {
        let files_sub = workspace.subscribe(Query::All);
        Self {
            workspace,
            autosave: Autosave::new(autosave_delay),
            files_sub,
            active_sub: None,
        }
    }

    /// Resolve the selection and load the active document into `model`.
    ///
    /// # Errors
    /// Storage failures are fatal here; the caller aborts startup.
    pub fn start(&mut self, model: &mut Model) -> Result<Reconciled> {
        let (outcome, doc) = self.workspace.bootstrap()?;
        model.load(&doc);
        self.watch_active(doc.id);
        self.refresh_files(model)?;
        self.files_sub.drain();
        Ok(outcome)
    }

    /// Apply `msg` to the model, run its side effects and arm the autosave
    /// timer if the draft was edited.
    pub fn dispatch(&mut self, model: &mut Model, msg: Message, now_ms: u64) {
        let before = model.draft_revision();
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        self.handle_message_side_effects(model, &side_msg);

        if model.draft_revision() != before
            && before.map(|(id, _)| id) == model.active_id()
            && let Some(draft) = &model.draft
        {
            self.autosave.note_edit(draft, now_ms);
        }
        self.sync(model);
        model.autosave_pending = self.autosave.is_pending();
    }

    /// Advance timers: run a due autosave, apply store events and expire the
    /// status notice. Returns whether the model changed.
    pub fn tick(&mut self, model: &mut Model, now_ms: u64) -> bool {
        let mut changed = false;
        match self
            .autosave
            .poll(now_ms, model.draft.as_mut(), &mut self.workspace)
        {
            Ok(wrote) => changed |= wrote,
            Err(err) => {
                tracing::error!(error = %err, "autosave failed");
                model.show_toast(ToastLevel::Error, "Save failed");
                changed = true;
            }
        }
        changed |= self.sync(model);
        changed |= model.expire_toast(Instant::now());

        let pending = self.autosave.is_pending();
        changed |= pending != model.autosave_pending;
        model.autosave_pending = pending;
        changed
    }

    /// Whether the autosave timer is armed.
    pub const fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    /// Drop any pending write before the session ends.
    pub fn teardown(&mut self) {
        self.autosave.cancel();
    }

    pub const fn workspace(&self) -> &Workspace<S, P> {
        &self.workspace
    }

    pub(super) fn watch_active(&mut self, id: FileId) {
        if self.active_sub.as_ref().map(Subscription::query) != Some(Query::File(id)) {
            self.active_sub = Some(self.workspace.subscribe(Query::File(id)));
        }
    }

    /// Apply pending store events to the model.
    fn sync(&mut self, model: &mut Model) -> bool {
        let mut changed = false;

        if let Some(sub) = &self.active_sub {
            for event in sub.drain() {
                match event {
                    StoreEvent::Updated(id) => {
                        if let Ok(Some(doc)) = self.workspace.get_file(id) {
                            model.active_name = doc.name;
                            changed = true;
                        }
                    }
                    StoreEvent::Deleted(id) => {
                        tracing::debug!(%id, "watched file deleted");
                    }
                    StoreEvent::Created(_) => {}
                }
            }
        }

        if !self.files_sub.drain().is_empty() {
            if let Err(err) = self.refresh_files(model) {
                tracing::error!(error = %err, "failed to list files");
            }
            changed = true;
        }
        changed
    }

    pub(super) fn refresh_files(&self, model: &mut Model) -> Result<()> {
        model.files = self
            .workspace
            .list_files()?
            .iter()
            .map(Into::into)
            .collect();
        model.clamp_menu_selection();
        Ok(())
    }
}
