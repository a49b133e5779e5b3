//! This crate provides the core of a personal task-tracking client.
//!
//! Tasks live in a remote row store (a hosted backend exposing row-level CRUD, with ownership
//! enforced server-side); this crate wraps it behind the [`traits::TaskStore`] trait and keeps a
//! cached, always-confirmed view of the user's tasks in a [`TaskRepository`].
//!
//! On top of that cache, two pure engines compute everything the user sees: the
//! [`filter`] module derives the visible subset of the list view from the active filters, and
//! the [`calendar`] module derives the month grid and its per-day markers. Both are plain
//! synchronous functions of their inputs, cheap to recompute on every state change.
//!
//! A [`Coordinator`] ties the three together: it holds the transient view state (current view,
//! selected date, filters, edit form) and turns user actions into repository calls followed by
//! a re-fetch.

pub mod traits;

mod error;
pub use error::Error;
mod task;
pub use task::{Priority, Task, TaskDraft, TaskId, TaskPatch, UserId};
mod session;
pub use session::Session;

pub mod notify;
pub mod store;
mod repository;
pub use repository::{FetchTicket, TaskRepository};

pub mod filter;
pub mod calendar;

mod coordinator;
pub use coordinator::{Coordinator, FormState, LoadState, View};
