//! Watch command handler
//!
//! Keeps the live view on screen: polls in the background, redraws whenever
//! the view state changes and turns stdin lines into commands or prompts.

use anyhow::{Context, Result};
use ccm_core::domain::task::TaskMode;
use ccm_sync::{Notice, Session, StatusFilter, SubmitOutcome, SyncError, TaskProjection};
use colored::*;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::render::render_view;

/// A line of user input
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Empty,
    Quit,
    Send,
    Filter(StatusFilter),
    Mode(TaskMode),
    Project(String),
    Prompt(String),
    Invalid(String),
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }

    let Some(command) = trimmed.strip_prefix(':') else {
        return Input::Prompt(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "q" | "quit" => Input::Quit,
        "send" => Input::Send,
        "filter" => arg.parse().map_or_else(Input::Invalid, Input::Filter),
        "mode" => arg.parse().map_or_else(Input::Invalid, Input::Mode),
        "project" if !arg.is_empty() => Input::Project(arg.to_string()),
        "project" => Input::Invalid("usage: :project <name>".to_string()),
        _ => Input::Invalid(format!("unknown command ':{}'", name)),
    }
}

type Submission = JoinHandle<Result<SubmitOutcome, SyncError>>;

/// How a submission still running at exit ended
#[derive(Debug)]
enum Drained {
    Finished(Result<SubmitOutcome, SyncError>),
    TimedOut,
    Panicked,
}

/// Submissions spawned from the prompt line
///
/// Kept so that quitting waits for a request already on the wire instead of
/// dropping it with the runtime.
#[derive(Default)]
struct PendingSubmissions {
    handles: Vec<Submission>,
}

impl PendingSubmissions {
    fn push(&mut self, handle: Submission) {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle);
    }

    /// Waits for every unfinished submission, giving each at most `timeout`
    async fn drain(mut self, timeout: Duration) -> Vec<Drained> {
        self.handles.retain(|h| !h.is_finished());

        let mut outcomes = Vec::with_capacity(self.handles.len());
        for mut handle in self.handles {
            let drained = match tokio::time::timeout(timeout, &mut handle).await {
                Ok(Ok(result)) => Drained::Finished(result),
                Ok(Err(e)) => {
                    warn!("Submission task failed: {}", e);
                    Drained::Panicked
                }
                Err(_) => {
                    handle.abort();
                    Drained::TimedOut
                }
            };
            outcomes.push(drained);
        }
        outcomes
    }
}

fn print_drained(drained: &Drained) {
    match drained {
        Drained::Finished(Ok(SubmitOutcome::Submitted)) => {
            println!("{}", "✓ Pending task submitted".green())
        }
        Drained::Finished(Ok(SubmitOutcome::AlreadyInFlight)) => {}
        Drained::Finished(Err(e)) => {
            println!("{}", format!("✗ Pending submission failed: {}", e).red())
        }
        Drained::TimedOut => println!(
            "{}",
            "⚠ Pending submission did not finish in time; it may or may not have been created"
                .yellow()
        ),
        Drained::Panicked => println!("{}", "✗ Pending submission crashed".red()),
    }
}

/// Run the live view until the user quits
pub async fn handle_watch(config: &Config, filter: StatusFilter) -> Result<()> {
    let sync = config.sync_config()?;
    let server_url = sync.server_url.clone();
    let mut session = Session::connect(&sync)?;

    let store = session.store().clone();
    store.set_filter(filter);

    let mut changes = store.subscribe();
    let mut projection = TaskProjection::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut pending = PendingSubmissions::default();

    info!("Watching {}", server_url);
    session.start_polling();

    let state = changes.borrow_and_update().clone();
    render_view(&state, &projection.project(&state), &server_url);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                debug!("Interrupted");
                break;
            }

            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = changes.borrow_and_update().clone();
                render_view(&state, &projection.project(&state), &server_url);
            }

            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    debug!("stdin closed");
                    break;
                };

                match parse_input(&line) {
                    Input::Empty => {}
                    Input::Quit => break,
                    Input::Filter(filter) => store.set_filter(filter),
                    Input::Mode(mode) => store.set_draft_mode(mode),
                    Input::Project(project) => store.set_draft_project(project),
                    Input::Invalid(message) => store.notify(Notice::warning(message)),
                    Input::Prompt(prompt) => {
                        store.set_draft_prompt(prompt);
                        pending.push(spawn_submission(&session));
                    }
                    Input::Send => pending.push(spawn_submission(&session)),
                }
            }
        }
    }

    let outcomes = pending.drain(sync.request_timeout).await;
    session.shutdown().await;
    for drained in &outcomes {
        print_drained(drained);
    }
    Ok(())
}

/// Submits the current draft in the background
fn spawn_submission(session: &Session) -> Submission {
    let submissions = session.submissions().clone();
    tokio::spawn(async move {
        let result = submissions.submit_draft().await;
        // Failures are already shown as notices
        if let Err(e) = &result {
            debug!("Submission failed: {}", e);
        }
        result
    })
}
