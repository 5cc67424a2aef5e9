//! Terminal rendering
//!
//! Everything that prints tasks, workers and the live view lives here, so
//! the command handlers only decide *what* to show.

use ccm_core::domain::task::{Task, TaskStatus};
use ccm_core::domain::worker::{Worker, WorkerStatus};
use ccm_sync::{Notice, NoticeLevel, ViewState};
use chrono::{DateTime, Local, Utc};
use colored::*;

/// Width of a task title in list views
const TITLE_WIDTH: usize = 50;

/// Formats a timestamp as `Mon D, HH:MM` in local time
pub fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%b %-d, %H:%M").to_string()
}

/// Colorize task status for display
pub fn colorize_status(status: TaskStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        TaskStatus::Queued => label.yellow(),
        TaskStatus::Running => label.cyan(),
        TaskStatus::Done => label.green(),
        TaskStatus::Failed => label.red(),
    }
}

/// Colorize worker status for display
fn colorize_worker_status(status: &WorkerStatus) -> ColoredString {
    match status {
        WorkerStatus::Idle => status.as_str().green(),
        WorkerStatus::Busy => status.as_str().yellow(),
        WorkerStatus::Other(s) => s.as_str().cyan(),
    }
}

/// Cuts `text` to `width` characters, marking the cut with an ellipsis
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// One-line overview of how many tasks are in each status
fn counts_line(state: &ViewState) -> String {
    state
        .status_counts()
        .iter()
        .map(|(status, count)| format!("{} {}", count, status))
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Print a one-line task summary
pub fn print_task_summary(task: &Task) {
    println!(
        "  {} {:>6}  {:<8}  {:<width$}  {}  {}",
        "▸".cyan(),
        task.id.to_string().dimmed(),
        colorize_status(task.status),
        fit(&task.title, TITLE_WIDTH),
        task.project.dimmed(),
        format_time(task.created_at).dimmed(),
        width = TITLE_WIDTH,
    );
}

/// Print a task list with a heading
pub fn print_tasks(tasks: &[Task], heading: &str) {
    if tasks.is_empty() {
        println!("{}", "No tasks found.".yellow());
        return;
    }

    println!("{}", format!("{} ({}):", heading, tasks.len()).bold());
    for task in tasks {
        print_task_summary(task);
    }
}

/// Print detailed task information
pub fn print_task_details(task: &Task) {
    println!("{}", "Task Details:".bold());
    println!("  ID:        {}", task.id.to_string().cyan());
    println!("  Title:     {}", task.title);
    println!("  Project:   {}", task.project);
    println!("  Mode:      {}", task.mode);
    println!("  Status:    {}", colorize_status(task.status));
    println!("  Created:   {}", format_time(task.created_at));

    if let Some(finished) = task.finished_at {
        println!("  Finished:  {}", format_time(finished));

        let seconds = finished.signed_duration_since(task.created_at).num_seconds();
        println!("  Duration:  {}s", seconds);
    }

    if let Some(worker) = &task.worker_id {
        println!("  Worker:    {}", worker);
    }

    if !task.prompt.is_empty() {
        println!("\n{}", "Prompt:".bold());
        println!("{}", task.prompt);
    }

    if let Some(result) = &task.result {
        println!("\n{}", "Result:".bold());
        if task.status == TaskStatus::Failed {
            println!("{}", result.red());
        } else {
            println!("{}", result);
        }
    }
}

/// Print a one-line worker summary
pub fn print_worker_summary(worker: &Worker) {
    let task = worker
        .current_task_id
        .as_ref()
        .map(|id| format!("task {}", id))
        .unwrap_or_else(|| "-".to_string());

    print!(
        "  {} Worker {:<4} {:<10} {}",
        "▸".cyan(),
        worker.id.to_string().bold(),
        colorize_worker_status(&worker.status),
        task.dimmed()
    );
    if let Some(project) = &worker.project {
        print!("  {}", project.dimmed());
    }
    println!();
}

/// Print a worker list with a heading
pub fn print_workers(workers: &[Worker]) {
    if workers.is_empty() {
        println!("{}", "No workers registered.".yellow());
        return;
    }

    let active = workers.iter().filter(|w| w.status.is_active()).count();
    println!(
        "{}",
        format!("Workers ({} active / {}):", active, workers.len()).bold()
    );
    for worker in workers {
        print_worker_summary(worker);
    }
}

/// Print a notice in its level's colour
pub fn print_notice(notice: &Notice) {
    let text = match notice.level {
        NoticeLevel::Info => format!("✓ {}", notice.message).green(),
        NoticeLevel::Warning => format!("⚠ {}", notice.message).yellow(),
        NoticeLevel::Error => format!("✗ {}", notice.message).red(),
    };
    println!("{} {}", format_time(notice.at).dimmed(), text);
}

/// Redraws the whole live view
///
/// `tasks` is the already filtered task list.
pub fn render_view(state: &ViewState, tasks: &[Task], server_url: &str) {
    // Clear screen and move the cursor home
    print!("\x1B[2J\x1B[H");

    println!("{} {}", "CC Manager".bold(), server_url.dimmed());

    let freshness = match state.sync.last_synced_at {
        Some(at) => format!("synced {}", format_time(at)),
        None => "not synced yet".to_string(),
    };
    if state.sync.stale {
        println!(
            "{} {}",
            freshness.dimmed(),
            "(stale: last refresh failed)".yellow()
        );
    } else {
        println!("{}", freshness.dimmed());
    }
    println!("{}", counts_line(state).dimmed());
    println!("{}", "─".repeat(80).dimmed());

    print_workers(&state.workers);
    println!();
    print_tasks(tasks, &format!("Tasks [{}]", state.filter));
    println!("{}", "─".repeat(80).dimmed());

    if let Some(notice) = &state.notice {
        print_notice(notice);
    }

    let submitting = if state.submitting {
        " submitting…".cyan().to_string()
    } else {
        String::new()
    };
    println!(
        "{} {} / {}{}",
        "New task for".dimmed(),
        state.draft.project.bold(),
        state.draft.mode,
        submitting
    );
    println!(
        "{}",
        "Type a prompt and press Enter. :send  :filter S  :mode M  :project P  :quit".dimmed()
    );
}
