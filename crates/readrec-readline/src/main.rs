use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use readrec_infrastructure::{CatalogService, SecretServiceImpl};
use readrec_interaction::{FetchOutcome, GeminiRecommender, RecommendationController};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/genres".to_string(),
                "/genre".to_string(),
                "/moods".to_string(),
                "/mood".to_string(),
                "/levels".to_string(),
                "/level".to_string(),
                "/recommend".to_string(),
                "/show".to_string(),
                "/open".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Resolves a user argument to an option label: by exact match first, then
/// by 1-based index into the displayed list.
fn resolve_option(arg: &str, options: &[String]) -> Option<String> {
    if let Some(label) = options.iter().find(|o| o.as_str() == arg) {
        return Some(label.clone());
    }
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| options.get(i).cloned())
}

fn print_options(title: &str, options: &[String], selected: &str) {
    println!("{}", title.bright_magenta());
    if options.is_empty() {
        println!("{}", "  (no options yet)".bright_black());
        return;
    }
    for (i, option) in options.iter().enumerate() {
        let line = format!("  {}. {}", i + 1, option);
        if option == selected {
            println!("{}", format!("{} *", line).green());
        } else {
            println!("{}", line);
        }
    }
}

async fn print_state(controller: &RecommendationController) {
    let snapshot = controller.snapshot().await;
    let field = |value: &str| {
        if value.is_empty() {
            "(not selected)".bright_black().to_string()
        } else {
            value.green().to_string()
        }
    };
    println!("{} {}", "Genre:".bright_magenta(), field(&snapshot.genre));
    println!("{} {}", "Mood: ".bright_magenta(), field(&snapshot.mood));
    println!("{} {}", "Level:".bright_magenta(), field(&snapshot.level));

    if snapshot.is_loading {
        println!("{}", "Loading...".yellow());
        return;
    }

    if snapshot.recommendations.is_empty() {
        println!("{}", "No recommendations yet.".bright_black());
    } else {
        for (i, _) in snapshot.recommendations.iter().enumerate() {
            println!(
                "{}",
                format!("> Recommendation {} (/open {})", i + 1, i + 1).bright_blue()
            );
        }
    }
}

async fn print_panel(controller: &RecommendationController, arg: &str) {
    let snapshot = controller.snapshot().await;
    let index = arg.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
    match index.and_then(|i| snapshot.recommendations.get(i)) {
        Some(candidate) => {
            println!(
                "{}",
                format!("=== Recommendation {} ===", arg).bright_magenta()
            );
            // Missing fragments render as an empty body, not an error.
            for line in candidate.display_text().lines() {
                println!("{}", line.bright_blue());
            }
        }
        None => println!("{}", "No such recommendation.".bright_black()),
    }
}

/// The main entry point for the readrec readline application.
///
/// This async function sets up a rustyline-based REPL that:
/// 1. Loads the catalog and the Gemini credentials at startup
/// 2. Provides command completion for the selection commands
/// 3. Runs recommendation fetches on background tasks so the prompt stays
///    responsive while a request is outstanding
/// 4. Displays colored output for selections, results, and notices
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // ===== Backend Initialization =====
    let catalog = CatalogService::new()
        .context("Failed to locate catalog configuration")?
        .load()
        .context("Failed to load catalog")?;

    let secret_service = SecretServiceImpl::new().context("Failed to locate secret storage")?;
    let recommender = GeminiRecommender::try_from_secrets(&secret_service)
        .await
        .context("Failed to configure the Gemini recommender")?;

    let session_id = uuid::Uuid::new_v4().to_string();
    let controller = Arc::new(RecommendationController::new_session(
        session_id,
        Arc::new(catalog),
        Arc::new(recommender),
    ));
    tracing::info!(session_id = controller.session_id(), "session started");

    // Channel carrying fetch outcomes back from background tasks
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<FetchOutcome>(32);

    // Outcome handler: renders results as they arrive. Failures stay on the
    // diagnostics channel only; there is no user-facing error state.
    let outcome_handler = tokio::spawn(async move {
        while let Some(outcome) = outcome_rx.recv().await {
            match outcome {
                FetchOutcome::Fetched { count } => {
                    if count == 0 {
                        println!("{}", "No recommendations returned.".bright_black());
                    } else {
                        println!(
                            "{}",
                            format!("{} recommendations ready - /show to view them.", count)
                                .bright_blue()
                        );
                    }
                }
                FetchOutcome::Failed | FetchOutcome::Stale | FetchOutcome::Incomplete => {}
                FetchOutcome::Busy => {
                    println!("{}", "Still loading...".bright_black());
                }
            }
        }
    });

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== readrec ===".bright_magenta().bold());
    println!(
        "{}",
        "Pick /genre, /mood, and /level, then /recommend. Type 'quit' to exit.".bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                let (command, arg) = match trimmed.split_once(' ') {
                    Some((cmd, rest)) => (cmd, rest.trim()),
                    None => (trimmed, ""),
                };

                match command {
                    "/genres" => {
                        let snapshot = controller.snapshot().await;
                        print_options("Genres:", &controller.genre_options(), &snapshot.genre);
                    }
                    "/moods" => {
                        let snapshot = controller.snapshot().await;
                        print_options("Moods:", &controller.mood_options().await, &snapshot.mood);
                    }
                    "/levels" => {
                        let snapshot = controller.snapshot().await;
                        print_options("Levels:", &controller.level_options(), &snapshot.level);
                    }
                    "/genre" => {
                        let options = controller.genre_options();
                        match resolve_option(arg, &options) {
                            Some(label) => match controller.select_genre(&label).await {
                                Ok(()) => println!("{}", format!("Genre: {}", label).green()),
                                Err(e) => println!("{}", format!("{}", e).red()),
                            },
                            None => {
                                println!("{}", "Unknown genre. Try /genres.".bright_black())
                            }
                        }
                    }
                    "/mood" => {
                        let options = controller.mood_options().await;
                        match resolve_option(arg, &options) {
                            Some(label) => match controller.select_mood(&label).await {
                                Ok(()) => println!("{}", format!("Mood: {}", label).green()),
                                Err(e) => println!("{}", format!("{}", e).red()),
                            },
                            None => {
                                println!(
                                    "{}",
                                    "Unknown mood for this genre. Try /moods.".bright_black()
                                )
                            }
                        }
                    }
                    "/level" => {
                        let options = controller.level_options();
                        match resolve_option(arg, &options) {
                            Some(label) => {
                                println!("{}", format!("Level: {}", label).green());
                                // Level selection arms the trigger; the fetch
                                // (if one is due) runs in the background.
                                let tx = outcome_tx.clone();
                                let controller = Arc::clone(&controller);
                                tokio::spawn(async move {
                                    match controller.select_level(&label).await {
                                        Ok(outcome) => {
                                            let _ = tx.send(outcome).await;
                                        }
                                        Err(e) => {
                                            tracing::warn!(error = %e, "level selection rejected")
                                        }
                                    }
                                });
                            }
                            None => {
                                println!("{}", "Unknown level. Try /levels.".bright_black())
                            }
                        }
                    }
                    "/recommend" => {
                        // The trigger control: disabled (label swapped) while
                        // a fetch is outstanding.
                        if controller.snapshot().await.is_loading {
                            println!("{}", "Loading...".bright_black());
                            continue;
                        }
                        println!("{}", "Get Recommendation".green());
                        let tx = outcome_tx.clone();
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            let outcome = controller.press_trigger().await;
                            let _ = tx.send(outcome).await;
                        });
                    }
                    "/show" => print_state(&controller).await,
                    "/open" => print_panel(&controller, arg).await,
                    _ => println!("{}", "Unknown command".bright_black()),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // Drop the channel to signal shutdown
    drop(outcome_tx);
    let _ = outcome_handler.await;

    Ok(())
}
