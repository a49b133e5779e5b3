//! The view coordinator: wires user actions to the repository and the two engines
//!
//! The coordinator holds all transient view state (current view, selected date, active filters,
//! form state) and exposes the derived view data presentation renders from. It is purely
//! event-driven: every method runs in reaction to a user action, and the async ones only await
//! the repository.

use chrono::{NaiveDate, Weekday};

use crate::calendar::{self, DayMarker, GridCell, YearMonth};
use crate::filter::{self, DateFilter, FilterState, PriorityFilter, StatusFilter};
use crate::repository::TaskRepository;
use crate::task::{Task, TaskDraft, TaskId, TaskPatch};
use crate::traits::TaskStore;

/// Whether the first task list has been resolved yet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// The initial fetch is still in flight; presentation shows a spinner
    Loading,
    /// The initial fetch has resolved (or failed, degrading to an empty set)
    Ready,
}

/// Which of the two main views is displayed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Todos,
    Calendar,
}

/// The state of the task edit form
#[derive(Clone, Debug, PartialEq)]
pub enum FormState {
    Closed,
    /// The form is open; `edit_target` is the task being edited, or `None` when creating
    Open { edit_target: Option<Task> },
}

/// The View Coordinator.
///
/// Data flows one way: repository → raw task set → engines → derived view data → presentation.
/// Mutations flow back through the methods below, each of which ends in a repository call and a
/// re-fetch; the engines themselves never mutate anything.
pub struct Coordinator<S: TaskStore> {
    repository: TaskRepository<S>,

    load_state: LoadState,
    view: View,
    form: FormState,
    filters: FilterState,

    visible_month: YearMonth,
    selected_date: Option<NaiveDate>,
    week_starts_on: Weekday,
}

impl<S: TaskStore> Coordinator<S> {
    /// Create a coordinator showing the todos view, with `today` selected on the calendar and
    /// its month displayed
    pub fn new(repository: TaskRepository<S>, today: NaiveDate) -> Self {
        Self {
            repository,
            load_state: LoadState::Loading,
            view: View::Todos,
            form: FormState::Closed,
            filters: FilterState::default(),
            visible_month: YearMonth::containing(today),
            selected_date: Some(today),
            week_starts_on: Weekday::Sun,
        }
    }

    /// Resolve the initial load: fetch the task list once, then become `Ready`.
    ///
    /// A fetch failure degrades to an empty task set rather than blocking the interface; the
    /// failure has already been surfaced as a notice.
    pub async fn start(&mut self) {
        let _ = self.repository.refresh().await;
        self.load_state = LoadState::Ready;
    }

    pub fn load_state(&self) -> LoadState { self.load_state }
    pub fn view(&self) -> View { self.view }
    pub fn form(&self) -> &FormState { &self.form }
    pub fn filters(&self) -> &FilterState { &self.filters }
    pub fn visible_month(&self) -> YearMonth { self.visible_month }
    pub fn selected_date(&self) -> Option<NaiveDate> { self.selected_date }

    /// The full cached task set, newest first
    pub fn tasks(&self) -> &[Task] {
        self.repository.tasks()
    }

    pub fn repository(&self) -> &TaskRepository<S> { &self.repository }
    pub fn repository_mut(&mut self) -> &mut TaskRepository<S> { &mut self.repository }

    //
    // Derived view data (pure recomputation, safe to call on every render)
    //

    /// The tasks the list view displays under the active filters
    pub fn visible_tasks(&self, today: NaiveDate) -> Vec<&Task> {
        filter::visible_tasks(self.repository.tasks(), &self.filters, today)
    }

    /// The header annotation: how many incomplete tasks are due today
    pub fn today_count(&self, today: NaiveDate) -> usize {
        filter::today_count(self.repository.tasks(), today)
    }

    /// The cells of the displayed month
    pub fn grid(&self) -> Vec<GridCell> {
        calendar::build_grid(self.visible_month, self.week_starts_on)
    }

    /// The single urgency marker for a day of the grid
    pub fn marker_for(&self, date: NaiveDate) -> DayMarker {
        calendar::day_marker(self.repository.tasks(), date)
    }

    /// The tasks due on the selected date (empty when no date is selected)
    pub fn selected_tasks(&self) -> Vec<&Task> {
        match self.selected_date {
            None => Vec::new(),
            Some(date) => calendar::tasks_on_date(self.repository.tasks(), date),
        }
    }

    //
    // View and filter controls
    //

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filters.status = status;
    }
    pub fn set_date_filter(&mut self, date: DateFilter) {
        self.filters.date = date;
    }
    pub fn set_priority_filter(&mut self, priority: PriorityFilter) {
        self.filters.priority = priority;
    }

    /// Which day weeks start on in the month grid
    pub fn set_week_start(&mut self, weekday: Weekday) {
        self.week_starts_on = weekday;
    }

    //
    // Calendar controls
    //

    /// Select a date on the calendar.
    ///
    /// Selection and month navigation are independent controls: this never changes the
    /// displayed month, even for the dimmed adjacent-month cells of the grid.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
    }

    pub fn next_month(&mut self) {
        self.visible_month = self.visible_month.next();
    }

    pub fn previous_month(&mut self) {
        self.visible_month = self.visible_month.previous();
    }

    //
    // Form lifecycle
    //

    /// The "add" action: open the form with no edit target
    pub fn open_add_form(&mut self) {
        self.form = FormState::Open { edit_target: None };
    }

    /// The "edit" action: open the form on an existing task
    pub fn open_edit_form(&mut self, task: Task) {
        self.form = FormState::Open { edit_target: Some(task) };
    }

    /// The draft the open form should be pre-filled with.
    ///
    /// Editing pre-fills from the target's fields. Adding starts from an empty draft, except
    /// that the selected calendar date becomes the due date when the calendar view is active.
    pub fn form_initial(&self) -> TaskDraft {
        match &self.form {
            FormState::Open { edit_target: Some(task) } => TaskDraft::from_task(task),
            _ => {
                let mut draft = TaskDraft::default();
                if self.view == View::Calendar {
                    draft.due_date = self.selected_date;
                }
                draft
            },
        }
    }

    /// Submit the form: update the edit target if there is one, create a task otherwise.
    ///
    /// A draft with a blank title is rejected before any repository call and the form stays
    /// open so the user can fix it. Otherwise the form closes and the edit target is cleared,
    /// whether the repository call succeeded or not (a failure has been notified and the
    /// displayed set is unchanged).
    pub async fn submit_form(&mut self, draft: TaskDraft) {
        if let Err(err) = draft.validate() {
            log::debug!("Rejecting the form submission: {}", err);
            return;
        }

        let result = match &self.form {
            FormState::Open { edit_target: Some(task) } => {
                let id = *task.id();
                self.repository.update(&id, &TaskPatch::from_draft(&draft)).await
            },
            _ => self.repository.create(&draft).await,
        };
        if let Err(err) = result {
            log::debug!("The form submission did not go through: {}", err);
        }

        self.form = FormState::Closed;
    }

    /// Close the form without any repository call
    pub fn cancel_form(&mut self) {
        self.form = FormState::Closed;
    }

    //
    // Direct task actions
    //

    /// Set a task's completion state (e.g. from its checkbox). The caller passes the desired
    /// resulting state, not a flip request
    pub async fn set_completion(&mut self, id: &TaskId, completed: bool) {
        if let Err(err) = self.repository.set_completion(id, completed).await {
            log::debug!("Completion change of {} failed: {}", id, err);
        }
    }

    /// Delete a task. On failure the task stays visible and the user may retry
    pub async fn delete(&mut self, id: &TaskId) {
        if let Err(err) = self.repository.remove(id).await {
            log::debug!("Deletion of {} failed: {}", id, err);
        }
    }
}
