//! A self-contained walkthrough against the in-memory store.
//!
//! Run with `RUST_LOG=debug cargo run --bin demo` to also see the repository logs.

use chrono::{Datelike, Utc, Weekday};

use daylist::calendar::DayMarker;
use daylist::filter::{DateFilter, StatusFilter};
use daylist::notify::notice_channel;
use daylist::store::MemoryStore;
use daylist::{Coordinator, Priority, TaskDraft, TaskRepository, UserId, View};

fn print_tasks<'t, I: IntoIterator<Item = &'t daylist::Task>>(tasks: I) {
    for task in tasks {
        let completion = if task.completed() { "✓" } else { " " };
        let due = task.due_date().map(|d| d.to_string()).unwrap_or_else(|| "          ".to_string());
        println!("    {} {}  [{}]\t{}", completion, due, task.priority(), task.title());
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let today = Utc::now().date_naive();
    let owner = UserId::random();
    let (sender, notices) = notice_channel();
    let repository = TaskRepository::new_with_notices(MemoryStore::new(), owner, sender);
    let mut coordinator = Coordinator::new(repository, today);

    coordinator.start().await;

    for (title, priority, due) in [
        ("water the plants", Priority::Low, Some(today)),
        ("pay rent", Priority::High, Some(today - chrono::Duration::days(2))),
        ("book the train", Priority::Medium, Some(today + chrono::Duration::days(9))),
        ("call mum", Priority::Medium, None),
    ] {
        coordinator.open_add_form();
        let mut draft = TaskDraft::new(title);
        draft.priority = priority;
        draft.due_date = due;
        coordinator.submit_form(draft).await;
        println!("{}", *notices.borrow());
    }

    println!("\nAll tasks ({} for today):", coordinator.today_count(today));
    print_tasks(coordinator.visible_tasks(today));

    coordinator.set_status_filter(StatusFilter::Incomplete);
    coordinator.set_date_filter(DateFilter::Overdue);
    println!("\nOverdue and incomplete:");
    print_tasks(coordinator.visible_tasks(today));
    coordinator.set_status_filter(StatusFilter::All);
    coordinator.set_date_filter(DateFilter::All);

    coordinator.set_view(View::Calendar);
    coordinator.set_week_start(Weekday::Mon);
    println!("\n{}-{:02}:", coordinator.visible_month().year(), coordinator.visible_month().month());
    for week in coordinator.grid().chunks(7) {
        for cell in week {
            let marker = match coordinator.marker_for(cell.date) {
                DayMarker::None => ' ',
                DayMarker::HasIncomplete => '•',
                DayMarker::AllComplete => '✓',
            };
            if cell.in_current_month {
                print!(" {:>2}{}", cell.date.day(), marker);
            } else {
                print!("   {}", marker);
            }
        }
        println!();
    }

    println!("\nTasks on the selected day:");
    print_tasks(coordinator.selected_tasks());
}
