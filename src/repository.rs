//! The task repository: a cached view of a remote [`TaskStore`]
//!
//! The repository never merges optimistically: after every successful mutation it throws its
//! cache away and re-lists, so the displayed set always reflects a confirmed server state, at
//! the cost of one extra round trip per mutation.

use crate::error::Error;
use crate::notify::{Notices, NoticeSender};
use crate::task::{Task, TaskDraft, TaskId, TaskPatch, UserId};
use crate::traits::TaskStore;

/// A ticket identifying one issued fetch. See [`TaskRepository::begin_fetch`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// The Task Repository Adapter: wraps a [`TaskStore`] and owns the in-memory cache of the
/// session owner's tasks.
///
/// Every operation emits a user-visible outcome [`Notice`](crate::notify::Notice). Failures are
/// reported and leave the cache untouched; nothing is retried automatically.
pub struct TaskRepository<S: TaskStore> {
    store: S,
    owner: UserId,
    tasks: Vec<Task>,
    /// The sequence number of the most recently issued fetch. Only the fetch holding this
    /// number may update the cache; slower, superseded responses are discarded on arrival
    last_issued_fetch: u64,
    notices: Notices,
}

impl<S: TaskStore> TaskRepository<S> {
    /// Create a repository for the given owner's tasks. The cache starts empty
    pub fn new(store: S, owner: UserId) -> Self {
        Self {
            store,
            owner,
            tasks: Vec::new(),
            last_issued_fetch: 0,
            notices: Notices::new(),
        }
    }

    /// Create a repository that also forwards its outcome notices to a channel
    /// (see [`notice_channel`](crate::notify::notice_channel))
    pub fn new_with_notices(store: S, owner: UserId, channel: NoticeSender) -> Self {
        Self {
            notices: Notices::new_with_channel(channel),
            ..Self::new(store, owner)
        }
    }

    /// The cached task set, as confirmed by the last applied fetch. Newest first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Access the underlying store. Mostly useful in tests
    pub fn store(&self) -> &S { &self.store }
    /// Access the underlying store. Mostly useful in tests
    pub fn store_mut(&mut self) -> &mut S { &mut self.store }

    /// Issue a fetch ticket.
    ///
    /// Issuing a new ticket supersedes every ticket issued before: their results will be
    /// discarded by [`Self::apply_fetch`]. This is what guarantees that the displayed set
    /// reflects only the most recent fetch's outcome, even when a slow response arrives after
    /// a faster, later one.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.last_issued_fetch += 1;
        FetchTicket(self.last_issued_fetch)
    }

    /// Apply a completed fetch to the cache, unless its ticket has been superseded.
    ///
    /// Returns whether the result was applied.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, tasks: Vec<Task>) -> bool {
        if ticket.0 != self.last_issued_fetch {
            log::debug!("Discarding the result of fetch #{}: fetch #{} has been issued since",
                        ticket.0, self.last_issued_fetch);
            return false;
        }
        self.tasks = tasks;
        true
    }

    /// Re-list the owner's tasks from the store and replace the cache.
    ///
    /// On failure the cache is left unchanged and a failure notice is emitted; a caller doing
    /// its initial load should simply keep going with the (empty) cache rather than block.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        let ticket = self.begin_fetch();
        match self.store.list(&self.owner).await {
            Ok(tasks) => {
                self.apply_fetch(ticket, tasks);
                Ok(())
            },
            Err(err) => {
                log::warn!("Unable to list tasks for {}: {}", self.owner, err);
                self.notices.failure("Failed to load tasks");
                Err(err)
            },
        }
    }

    /// Create a task from the submitted fields.
    ///
    /// An empty (after trimming) title is rejected with [`Error::Validation`] before any remote
    /// call is made.
    pub async fn create(&mut self, draft: &TaskDraft) -> Result<(), Error> {
        if let Err(err) = draft.validate() {
            self.notices.failure("Failed to create task");
            return Err(err);
        }

        match self.store.create(&self.owner, draft).await {
            Ok(()) => {
                self.notices.success("Task created");
                self.refresh_after_mutation().await;
                Ok(())
            },
            Err(err) => {
                log::warn!("Unable to create the task: {}", err);
                self.notices.failure("Failed to create task");
                Err(err)
            },
        }
    }

    /// Write the fields present in `patch` to an existing task
    pub async fn update(&mut self, id: &TaskId, patch: &TaskPatch) -> Result<(), Error> {
        if let Err(err) = patch.validate() {
            self.notices.failure("Failed to update task");
            return Err(err);
        }

        match self.store.update(id, patch).await {
            Ok(()) => {
                self.notices.success("Task updated");
                self.refresh_after_mutation().await;
                Ok(())
            },
            Err(err) => {
                log::warn!("Unable to update task {}: {}", id, err);
                self.notices.failure("Failed to update task");
                Err(err)
            },
        }
    }

    /// Write the desired completion state of a task (a toggle-target write: the caller supplies
    /// the resulting state, not a flip request)
    pub async fn set_completion(&mut self, id: &TaskId, completed: bool) -> Result<(), Error> {
        match self.store.set_completion(id, completed).await {
            Ok(()) => {
                self.notices.success(if completed { "Task completed" } else { "Task uncompleted" });
                self.refresh_after_mutation().await;
                Ok(())
            },
            Err(err) => {
                log::warn!("Unable to set completion of task {}: {}", id, err);
                self.notices.failure("Failed to update task");
                Err(err)
            },
        }
    }

    /// Delete a task. A failed deletion leaves the task in the cache, still visible
    pub async fn remove(&mut self, id: &TaskId) -> Result<(), Error> {
        match self.store.remove(id).await {
            Ok(()) => {
                self.notices.success("Task deleted");
                self.refresh_after_mutation().await;
                Ok(())
            },
            Err(err) => {
                log::warn!("Unable to delete task {}: {}", id, err);
                self.notices.failure("Failed to delete task");
                Err(err)
            },
        }
    }

    /// The post-mutation re-list. The mutation itself has already succeeded and been notified;
    /// a failure here only means the cache keeps showing the previous confirmed state, and
    /// `refresh` has emitted its own notice about it
    async fn refresh_after_mutation(&mut self) {
        let _ = self.refresh().await;
    }
}
