use async_trait::async_trait;

use crate::error::Error;
use crate::task::{Task, TaskDraft, TaskId, TaskPatch, UserId};

/// The remote row store that holds a user's tasks.
///
/// The backend is a collaborator: it owns persistence, authentication and multi-user isolation;
/// this trait only exposes row-level CRUD with ownership enforced server-side.
/// [`RemoteStore`](crate::store::RemoteStore) implements it over HTTP,
/// [`MemoryStore`](crate::store::MemoryStore) implements it in memory for tests.
#[async_trait]
pub trait TaskStore {
    /// Return every task belonging to `owner`, newest `created_at` first
    async fn list(&self, owner: &UserId) -> Result<Vec<Task>, Error>;

    /// Insert a new task. The server assigns its id and timestamps
    async fn create(&mut self, owner: &UserId, draft: &TaskDraft) -> Result<(), Error>;

    /// Write the fields present in `patch`. An unknown `id` fails with [`Error::NotFound`]
    async fn update(&mut self, id: &TaskId, patch: &TaskPatch) -> Result<(), Error>;

    /// Write the desired completion state.
    ///
    /// This is a pure toggle-target write, not a read-then-flip: the caller supplies the
    /// resulting state, so two rapid toggles cannot cancel each other out.
    async fn set_completion(&mut self, id: &TaskId, completed: bool) -> Result<(), Error>;

    /// Delete a task
    async fn remove(&mut self, id: &TaskId) -> Result<(), Error>;
}
