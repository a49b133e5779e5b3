//! The filter engine: pure functions computing the visible subset of a task list
//!
//! Nothing here awaits or mutates anything. Every function is a plain function of its inputs,
//! so presentation can recompute the visible set from scratch on each state change.

use chrono::NaiveDate;

use crate::task::{Priority, Task};

/// Predicate over a task's completion state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Completed,
    Incomplete,
}

/// Predicate over a task's due date, relative to a reference calendar day.
///
/// Anything other than `All` excludes tasks that have no due date at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateFilter {
    All,
    /// Due exactly on the reference day
    Today,
    /// Due strictly after the reference day
    Upcoming,
    /// Due strictly before the reference day. A task due today is never overdue,
    /// regardless of its completion state
    Overdue,
}

/// Predicate over a task's priority
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriorityFilter {
    All,
    Only(Priority),
}

/// The three independent filter axes, combined with logical AND
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterState {
    pub status: StatusFilter,
    pub date: DateFilter,
    pub priority: PriorityFilter,
}

impl Default for FilterState {
    /// Everything visible
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            date: DateFilter::All,
            priority: PriorityFilter::All,
        }
    }
}

impl FilterState {
    /// Whether a single task passes every axis.
    ///
    /// Predicates are evaluated in order (status, priority, date) and short-circuit on the first
    /// failing one.
    pub fn matches(&self, task: &Task, reference: NaiveDate) -> bool {
        match self.status {
            StatusFilter::All => {},
            StatusFilter::Completed => if task.completed() == false { return false; },
            StatusFilter::Incomplete => if task.completed() { return false; },
        }

        match self.priority {
            PriorityFilter::All => {},
            PriorityFilter::Only(p) => if task.priority() != p { return false; },
        }

        match self.date {
            DateFilter::All => {},
            other => {
                let due = match task.due_date() {
                    // A task with no due date can only be seen with DateFilter::All
                    None => return false,
                    Some(due) => due,
                };
                let keep = match other {
                    DateFilter::All => true,
                    DateFilter::Today => due == reference,
                    DateFilter::Upcoming => due > reference,
                    DateFilter::Overdue => due < reference,
                };
                if keep == false { return false; }
            },
        }

        true
    }
}

/// Compute the visible subset of `tasks` under the given filters.
///
/// The result is a subsequence of the input: relative order is preserved, nothing is re-sorted.
/// `reference` is the calendar day the date axis compares against (usually "today" in the user's
/// time zone).
pub fn visible_tasks<'t>(tasks: &'t [Task], filters: &FilterState, reference: NaiveDate) -> Vec<&'t Task> {
    tasks.iter()
        .filter(|task| filters.matches(task, reference))
        .collect()
}

/// The number of incomplete tasks due on the reference day.
///
/// Only used for the header annotation ("n tasks for today"); it ignores the active filters.
pub fn today_count(tasks: &[Task], reference: NaiveDate) -> usize {
    tasks.iter()
        .filter(|task| task.is_due_on(reference) && task.completed() == false)
        .count()
}
