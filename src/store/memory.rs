//! An in-memory [`TaskStore`], mimicking the server's side of the contract
//!
//! It assigns ids and timestamps on insertion and orders listings newest-first, exactly like the
//! remote store. A [`MockBehaviour`] can make chosen operations fail, so tests can exercise the
//! failure paths without a network.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::Error;
use crate::task::{Task, TaskDraft, TaskId, TaskPatch, UserId};
use crate::traits::TaskStore;

/// Behaviour tweaks for a [`MemoryStore`], describing which operations should fail during a test.
///
/// So that an operation fails _n_ times after _m_ initial successes, set `(m, n)` for the suited
/// parameter.
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every operation will be allowed
    pub is_suspended: bool,

    pub list_behaviour: (u32, u32),
    pub create_behaviour: (u32, u32),
    pub update_behaviour: (u32, u32),
    pub set_completion_behaviour: (u32, u32),
    pub remove_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            list_behaviour: (0, n_fails),
            create_behaviour: (0, n_fails),
            update_behaviour: (0, n_fails),
            set_completion_behaviour: (0, n_fails),
            remove_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_list(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_behaviour, "list")
    }
    pub fn can_create(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_behaviour, "create")
    }
    pub fn can_update(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.update_behaviour, "update")
    }
    pub fn can_set_completion(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.set_completion_behaviour, "set_completion")
    }
    pub fn can_remove(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.remove_behaviour, "remove")
    }
}

/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Error> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 = value.1 - 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(Error::Transport(format!("mocked behaviour requires this {} to fail this time ({:?})", descr, value)))
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}

/// A [`TaskStore`] that keeps its rows in memory
pub struct MemoryStore {
    rows: Vec<Task>,
    // `list` takes `&self`, yet failing a mocked call consumes a counter
    behaviour: Mutex<MockBehaviour>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            behaviour: Mutex::new(MockBehaviour::new()),
        }
    }

    /// Replace the current [`MockBehaviour`]
    pub fn set_behaviour(&mut self, behaviour: MockBehaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    /// How many rows this store currently holds, all owners combined
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.rows.iter().position(|task| task.id() == id)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list(&self, owner: &UserId) -> Result<Vec<Task>, Error> {
        self.behaviour.lock().unwrap().can_list()?;

        let mut rows: Vec<Task> = self.rows.iter()
            .filter(|task| task.owner() == owner)
            .cloned()
            .collect();
        // Newest first. The sort is stable, so reversing puts later insertions before earlier
        // ones when timestamps are equal
        rows.sort_by_key(|task| *task.created_at());
        rows.reverse();
        Ok(rows)
    }

    async fn create(&mut self, owner: &UserId, draft: &TaskDraft) -> Result<(), Error> {
        self.behaviour.lock().unwrap().can_create()?;
        draft.validate()?;

        let now = Utc::now();
        self.rows.push(Task::new_with_fields(
            TaskId::random(),
            *owner,
            draft.title.clone(),
            draft.description.clone(),
            false,
            draft.priority,
            draft.due_date,
            now,
            now,
        ));
        Ok(())
    }

    async fn update(&mut self, id: &TaskId, patch: &TaskPatch) -> Result<(), Error> {
        self.behaviour.lock().unwrap().can_update()?;

        match self.position(id) {
            None => Err(Error::NotFound(*id)),
            Some(index) => {
                patch.apply_to(&mut self.rows[index]);
                Ok(())
            },
        }
    }

    async fn set_completion(&mut self, id: &TaskId, completed: bool) -> Result<(), Error> {
        self.behaviour.lock().unwrap().can_set_completion()?;

        // A vanished row is not an error here: this is a toggle-target write, and the
        // following re-list will show the row is gone anyway
        if let Some(index) = self.position(id) {
            self.rows[index].set_completed(completed);
        }
        Ok(())
    }

    async fn remove(&mut self, id: &TaskId) -> Result<(), Error> {
        self.behaviour.lock().unwrap().can_remove()?;

        if let Some(index) = self.position(id) {
            self.rows.remove(index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::task::Priority;

    #[test]
    fn mock_behaviour_counts_down() {
        let mut ok = MockBehaviour::new();
        assert!(ok.can_list().is_ok());
        assert!(ok.can_list().is_ok());
        assert!(ok.can_list().is_ok());

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_list().is_err());
        assert!(now.can_create().is_err());
        assert!(now.can_create().is_err());
        assert!(now.can_list().is_err());
        assert!(now.can_list().is_ok());
        assert!(now.can_create().is_ok());

        let mut custom = MockBehaviour {
            update_behaviour: (1, 2),
            ..MockBehaviour::default()
        };
        assert!(custom.can_update().is_ok());
        assert!(custom.can_update().is_err());
        assert!(custom.can_update().is_err());
        assert!(custom.can_update().is_ok());

        let mut suspended = MockBehaviour::fail_now(5);
        suspended.suspend();
        assert!(suspended.can_remove().is_ok());
        suspended.resume();
        assert!(suspended.can_remove().is_err());
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_per_owner() {
        let mut store = MemoryStore::new();
        let me = UserId::random();
        let someone_else = UserId::random();

        store.create(&me, &TaskDraft::new("first")).await.unwrap();
        store.create(&me, &TaskDraft::new("second")).await.unwrap();
        store.create(&someone_else, &TaskDraft::new("not mine")).await.unwrap();

        let mine = store.list(&me).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].title(), "second");
        assert_eq!(mine[1].title(), "first");

        let theirs = store.list(&someone_else).await.unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].title(), "not mine");
    }

    #[tokio::test]
    async fn updating_an_unknown_id_is_not_found() {
        let mut store = MemoryStore::new();
        let err = store.update(&TaskId::random(), &TaskPatch::default()).await.unwrap_err();
        assert!(err.is_not_found());

        // set_completion and remove are tolerant of vanished rows
        assert!(store.set_completion(&TaskId::random(), true).await.is_ok());
        assert!(store.remove(&TaskId::random()).await.is_ok());
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let mut store = MemoryStore::new();
        let me = UserId::random();

        let mut draft = TaskDraft::new("shopping");
        draft.priority = Priority::High;
        draft.due_date = NaiveDate::from_ymd_opt(2024, 6, 20);
        store.create(&me, &draft).await.unwrap();

        let id = *store.list(&me).await.unwrap()[0].id();
        store.set_completion(&id, true).await.unwrap();
        assert!(store.list(&me).await.unwrap()[0].completed());

        store.update(&id, &TaskPatch { title: Some("groceries".to_string()), ..TaskPatch::default() }).await.unwrap();
        let task = store.list(&me).await.unwrap().remove(0);
        assert_eq!(task.title(), "groceries");
        assert_eq!(task.priority(), Priority::High);
        assert!(task.completed(), "updating fields must not touch completion");

        store.remove(&id).await.unwrap();
        assert!(store.list(&me).await.unwrap().is_empty());
    }
}
