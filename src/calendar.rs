//! The calendar grid engine: pure date arithmetic for the month view
//!
//! Like the [`filter`](crate::filter) engine, everything here is a plain synchronous function of
//! its inputs. Month navigation never consults the task set.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::task::Task;

/// A year and month, identifying the month the calendar view displays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a YearMonth. Returns `None` when `month` is not in `1..=12`
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if month < 1 || month > 12 {
            return None;
        }
        Some(Self { year, month })
    }

    /// The month containing the given day
    pub fn containing(day: NaiveDate) -> Self {
        Self { year: day.year(), month: day.month() }
    }

    pub fn year(&self) -> i32 { self.year }
    pub fn month(&self) -> u32 { self.month }

    /// The first day of this month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap(/* month is validated at construction */)
    }

    /// The last day of this month
    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day() - Duration::days(1)
    }

    /// The month after this one
    pub fn next(&self) -> Self {
        match self.month {
            12 => Self { year: self.year + 1, month: 1 },
            m => Self { year: self.year, month: m + 1 },
        }
    }

    /// The month before this one
    pub fn previous(&self) -> Self {
        match self.month {
            1 => Self { year: self.year - 1, month: 12 },
            m => Self { year: self.year, month: m - 1 },
        }
    }

    /// Whether the given day falls within this month
    pub fn contains(&self, day: NaiveDate) -> bool {
        day.year() == self.year && day.month() == self.month
    }
}

/// One day slot of the month view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    /// The calendar day this cell stands for
    pub date: NaiveDate,
    /// Whether that day belongs to the displayed month (adjacent-month days pad the first and
    /// last weeks and are rendered dimmed)
    pub in_current_month: bool,
}

/// How many days `day`'s weekday is after the start of its week
fn days_into_week(day: NaiveDate, week_starts_on: Weekday) -> i64 {
    let day_index = day.weekday().num_days_from_monday() as i64;
    let start_index = week_starts_on.num_days_from_monday() as i64;
    (day_index - start_index).rem_euclid(7)
}

/// Compute the cells of the month view for `month`.
///
/// The first cell is the start of the week (per `week_starts_on`) containing the 1st of the
/// month; the last cell is the end of the week containing the month's last day; the cells are
/// the consecutive calendar days spanning that inclusive range. The grid therefore always covers
/// whole weeks (28 to 42 cells depending on the month) and is never padded to a fixed 6 rows.
pub fn build_grid(month: YearMonth, week_starts_on: Weekday) -> Vec<GridCell> {
    let grid_start = month.first_day() - Duration::days(days_into_week(month.first_day(), week_starts_on));
    let grid_end = month.last_day() + Duration::days(6 - days_into_week(month.last_day(), week_starts_on));

    let mut cells = Vec::with_capacity(42);
    let mut day = grid_start;
    while day <= grid_end {
        cells.push(GridCell {
            date: day,
            in_current_month: month.contains(day),
        });
        day = day + Duration::days(1);
    }
    cells
}

/// The tasks due on the given calendar day, in their input order
pub fn tasks_on_date<'t>(tasks: &'t [Task], date: NaiveDate) -> Vec<&'t Task> {
    tasks.iter()
        .filter(|task| task.is_due_on(date))
        .collect()
}

/// The single per-day urgency indicator.
///
/// A day gets at most one marker, regardless of how many tasks are due on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayMarker {
    /// No task is due on this day
    None,
    /// At least one task due on this day is not completed
    HasIncomplete,
    /// At least one task is due on this day and all of them are completed
    AllComplete,
}

/// Compute the [`DayMarker`] for a day
pub fn day_marker(tasks: &[Task], date: NaiveDate) -> DayMarker {
    let mut any = false;
    for task in tasks {
        if task.is_due_on(date) {
            if task.completed() == false {
                return DayMarker::HasIncomplete;
            }
            any = true;
        }
    }
    if any { DayMarker::AllComplete } else { DayMarker::None }
}

/// Move a date forward or back by whole months, with standard calendar clamping: the day of
/// month is preserved where valid, and clamped to the target month's last day otherwise
/// (e.g. Jan 31 + 1 month = Feb 29 in a leap year, Feb 28 otherwise).
pub fn shift_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let mut month = YearMonth::containing(date);
    if delta >= 0 {
        for _ in 0..delta { month = month.next(); }
    } else {
        for _ in 0..-delta { month = month.previous(); }
    }

    match NaiveDate::from_ymd_opt(month.year(), month.month(), date.day()) {
        Some(same_day) => same_day,
        None => month.last_day(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::task::{Priority, TaskId, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task_due(completed: bool, due: NaiveDate) -> Task {
        Task::new_with_fields(
            TaskId::random(),
            UserId::random(),
            "a task".to_string(),
            None,
            completed,
            Priority::Medium,
            Some(due),
            Utc::now(),
            Utc::now(),
        )
    }

    fn assert_grid_is_sound(month: YearMonth, week_starts_on: Weekday) {
        let grid = build_grid(month, week_starts_on);

        assert_eq!(grid.len() % 7, 0, "whole weeks only");
        assert!(grid.len() >= 28 && grid.len() <= 42);
        assert_eq!(grid[0].date.weekday(), week_starts_on);

        // Contiguous, ascending run of days, no gaps or repeats
        for pair in grid.windows(2) {
            assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
        }

        // Every day of the month appears exactly once, flagged as in-month
        let in_month: Vec<_> = grid.iter().filter(|cell| cell.in_current_month).collect();
        assert_eq!(in_month[0].date, month.first_day());
        assert_eq!(in_month.last().unwrap().date, month.last_day());
        assert_eq!(in_month.len() as i64, (month.last_day() - month.first_day()).num_days() + 1);
        for cell in &grid {
            assert_eq!(cell.in_current_month, month.contains(cell.date));
        }
    }

    #[test]
    fn grids_cover_whole_weeks_with_no_gaps() {
        for &(year, month) in &[(2024, 6), (2024, 2), (2023, 2), (2024, 12), (2025, 1), (2026, 3)] {
            let month = YearMonth::new(year, month).unwrap();
            assert_grid_is_sound(month, Weekday::Sun);
            assert_grid_is_sound(month, Weekday::Mon);
        }
    }

    #[test]
    fn june_2024_with_sunday_weeks_spans_six_weeks() {
        // June 1st 2024 is a Saturday, June 30th a Sunday: the Sunday-start grid runs
        // from May 26th to July 6th.
        let grid = build_grid(YearMonth::new(2024, 6).unwrap(), Weekday::Sun);
        assert_eq!(grid.len(), 42);
        assert_eq!(grid[0].date, date(2024, 5, 26));
        assert_eq!(grid.last().unwrap().date, date(2024, 7, 6));
        assert!(grid[0].in_current_month == false);
    }

    #[test]
    fn february_2021_with_monday_weeks_is_exactly_four_weeks() {
        // Feb 2021 starts on a Monday and has 28 days: no padding cells at all.
        let grid = build_grid(YearMonth::new(2021, 2).unwrap(), Weekday::Mon);
        assert_eq!(grid.len(), 28);
        assert!(grid.iter().all(|cell| cell.in_current_month));
    }

    #[test]
    fn month_boundaries() {
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next(), YearMonth::new(2025, 1).unwrap());
        assert_eq!(YearMonth::new(2025, 1).unwrap().previous(), dec);
        assert_eq!(dec.last_day(), date(2024, 12, 31));
        assert_eq!(YearMonth::new(2024, 2).unwrap().last_day(), date(2024, 2, 29));
        assert!(YearMonth::new(2024, 13).is_none());
        assert!(YearMonth::new(2024, 0).is_none());
    }

    #[test]
    fn shifting_months_clamps_the_day() {
        assert_eq!(shift_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_months(date(2023, 1, 31), 1), date(2023, 2, 28));
        assert_eq!(shift_months(date(2024, 3, 31), -1), date(2024, 2, 29));
        assert_eq!(shift_months(date(2024, 6, 15), 1), date(2024, 7, 15));
        assert_eq!(shift_months(date(2024, 6, 15), -7), date(2023, 11, 15));
        assert_eq!(shift_months(date(2024, 12, 31), 2), date(2025, 2, 28));
    }

    #[test]
    fn day_markers() {
        let day = date(2024, 6, 12);
        let other_day = date(2024, 6, 13);

        assert_eq!(day_marker(&[], day), DayMarker::None);
        assert_eq!(day_marker(&[task_due(true, other_day)], day), DayMarker::None);

        // One incomplete and one completed match: a single HasIncomplete marker
        let mixed = vec![task_due(false, day), task_due(true, day)];
        assert_eq!(day_marker(&mixed, day), DayMarker::HasIncomplete);

        let all_done = vec![task_due(true, day), task_due(true, day)];
        assert_eq!(day_marker(&all_done, day), DayMarker::AllComplete);
    }

    #[test]
    fn tasks_on_date_matches_by_calendar_day() {
        let day = date(2024, 6, 12);
        let tasks = vec![
            task_due(false, day),
            task_due(true, date(2024, 6, 13)),
            task_due(true, day),
        ];
        let on_day = tasks_on_date(&tasks, day);
        assert_eq!(on_day.len(), 2);
        assert_eq!(on_day[0], &tasks[0]);
        assert_eq!(on_day[1], &tasks[2]);
    }
}
