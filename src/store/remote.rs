//! A [`TaskStore`] that talks to the hosted backend
//!
//! The backend exposes its `todos` table through a PostgREST-style REST endpoint: filters are
//! query parameters (`user_id=eq.<uuid>`), mutations are plain POST/PATCH/DELETE requests, and
//! `Prefer: return=representation` makes a mutation echo the affected rows back, which is how a
//! vanished update target is detected.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::error::Error;
use crate::session::Session;
use crate::task::{Task, TaskDraft, TaskId, TaskPatch, UserId};
use crate::traits::TaskStore;

/// The path of the tasks table under the backend base URL
static TABLE_PATH: &str = "rest/v1/todos";

/// The body of an insertion: the draft fields plus the owning user
#[derive(Serialize)]
struct InsertRow<'d> {
    user_id: UserId,
    #[serde(flatten)]
    fields: &'d TaskDraft,
}

/// A [`TaskStore`] that fetches and mutates rows on the remote backend.
///
/// Authentication is a per-project api key plus the session's bearer token; the backend checks
/// row ownership on every request, this client merely scopes its queries to the session owner.
pub struct RemoteStore {
    http: reqwest::Client,
    table_url: Url,
    api_key: String,
    session: Session,
}

impl RemoteStore {
    /// Create a store for the given backend and session. This does not start a connection
    pub fn new<S: AsRef<str>, T: ToString>(base_url: S, api_key: T, session: Session) -> Result<Self, Error> {
        let base = Url::parse(base_url.as_ref())
            .map_err(|err| Error::Transport(format!("invalid base URL: {}", err)))?;
        let table_url = base.join(TABLE_PATH)
            .map_err(|err| Error::Transport(format!("invalid base URL: {}", err)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            table_url,
            api_key: api_key.to_string(),
            session,
        })
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.http.request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(self.session.access_token())
            .header(CONTENT_TYPE, "application/json")
    }

    /// The table URL with a `id=eq.<id>` row selector
    fn row_url(&self, id: &TaskId) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id));
        url
    }
}

fn unexpected_status(response: &reqwest::Response) -> Error {
    Error::Transport(format!("unexpected HTTP status code {}", response.status()))
}

#[async_trait]
impl TaskStore for RemoteStore {
    async fn list(&self, owner: &UserId) -> Result<Vec<Task>, Error> {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{}", owner))
            .append_pair("order", "created_at.desc");

        let response = self.request(Method::GET, url).send().await?;
        if response.status().is_success() == false {
            return Err(unexpected_status(&response));
        }

        let tasks: Vec<Task> = response.json().await?;
        log::debug!("Fetched {} task(s) for {}", tasks.len(), owner);
        Ok(tasks)
    }

    async fn create(&mut self, owner: &UserId, draft: &TaskDraft) -> Result<(), Error> {
        draft.validate()?;

        let response = self.request(Method::POST, self.table_url.clone())
            .json(&InsertRow { user_id: *owner, fields: draft })
            .send()
            .await?;
        if response.status().is_success() == false {
            return Err(unexpected_status(&response));
        }
        Ok(())
    }

    async fn update(&mut self, id: &TaskId, patch: &TaskPatch) -> Result<(), Error> {
        patch.validate()?;
        if patch.is_empty() {
            // PostgREST rejects a PATCH with no columns; there is nothing to do anyway
            return Ok(());
        }

        let response = self.request(Method::PATCH, self.row_url(id))
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        if response.status().is_success() == false {
            return Err(unexpected_status(&response));
        }

        // With `return=representation`, a PATCH that matched no row answers 200 with an
        // empty array: the target no longer exists
        let affected: Vec<Task> = response.json().await?;
        if affected.is_empty() {
            return Err(Error::NotFound(*id));
        }
        Ok(())
    }

    async fn set_completion(&mut self, id: &TaskId, completed: bool) -> Result<(), Error> {
        let response = self.request(Method::PATCH, self.row_url(id))
            .json(&serde_json::json!({ "is_completed": completed }))
            .send()
            .await?;
        if response.status().is_success() == false {
            return Err(unexpected_status(&response));
        }
        Ok(())
    }

    async fn remove(&mut self, id: &TaskId) -> Result<(), Error> {
        let response = self.request(Method::DELETE, self.row_url(id))
            .send()
            .await?;
        if response.status().is_success() == false {
            return Err(unexpected_status(&response));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::NaiveDate;

    #[test]
    fn insert_body_carries_the_owner_and_the_draft_fields() {
        let owner = UserId::random();
        let draft = TaskDraft {
            title: "buy milk".to_string(),
            description: None,
            priority: Priority::Low,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 20),
        };
        let body = serde_json::to_value(&InsertRow { user_id: owner, fields: &draft }).unwrap();

        assert_eq!(body["user_id"], serde_json::to_value(&owner).unwrap());
        assert_eq!(body["title"], "buy milk");
        assert_eq!(body["priority"], "low");
        assert_eq!(body["due_date"], "2024-06-20");
    }

    #[test]
    fn row_urls_select_a_single_row() {
        let session = Session::new(UserId::random(), "token");
        let store = RemoteStore::new("https://example.supabase.co/", "anon-key", session).unwrap();
        let id: TaskId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();

        let url = store.row_url(&id);
        assert_eq!(url.path(), "/rest/v1/todos");
        assert_eq!(url.query(), Some("id=eq.550e8400-e29b-41d4-a716-446655440000"));
    }

    #[test]
    fn invalid_base_urls_are_rejected() {
        let session = Session::new(UserId::random(), "token");
        assert!(RemoteStore::new("not a url", "key", session).is_err());
    }
}
