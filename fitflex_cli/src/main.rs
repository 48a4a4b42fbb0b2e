use clap::{Parser, Subcommand};
use fitflex_core::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "fitflex")]
#[command(about = "Workout library, session timer and daily progress tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's counters, goal progress and badges (default)
    Stats,

    /// List the workout library
    Library {
        /// Filter by name, category or level
        #[arg(long)]
        search: Option<String>,
    },

    /// Show details for one workout
    Info { id: String },

    /// Run a timed session for a workout
    Start {
        id: String,

        /// Record the session immediately without waiting for the timer
        #[arg(long)]
        complete: bool,

        /// Tick interval in milliseconds (defaults to the configured value)
        #[arg(long, hide = true)]
        tick_ms: Option<u64>,
    },

    /// Show today's plan, generating one if needed
    Plan {
        /// Pick three new workouts
        #[arg(long, conflicts_with = "complete_all")]
        shuffle: bool,

        /// Mark every planned workout as done
        #[arg(long)]
        complete_all: bool,
    },

    /// Show badge status
    Badges,

    /// Show recent sessions, newest first
    History,

    /// Show the rolling 7-day window
    Week,

    /// Compute and store body-mass index
    Bmi {
        /// Height in centimetres
        #[arg(long, default_value_t = 0.0)]
        height: f64,

        /// Weight in kilograms
        #[arg(long, default_value_t = 0.0)]
        weight: f64,
    },

    /// Show or change the daily goal
    Goal {
        /// stay-fit, fat-loss or muscle-gain
        #[arg(long = "type")]
        goal_type: Option<String>,

        /// Minutes per day
        #[arg(long)]
        minutes: Option<u32>,
    },

    /// Show or toggle the display theme
    Theme {
        #[arg(long)]
        toggle: bool,
    },

    /// Write progress to a file
    Export {
        /// Output file
        #[arg(long)]
        out: Option<PathBuf>,

        /// json (full record) or csv (history only)
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Delete all saved progress
    Reset {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    // Initialize logging
    fitflex_core::logging::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let seed = (config.goals.default_type, config.goals.default_minutes);
    let mut tracker = Tracker::open(&data_dir, today_utc(), seed)?;

    let command = cli.command.unwrap_or(Commands::Stats);
    tracing::debug!(
        "Running {} against {:?} for {}",
        command.name(),
        data_dir,
        tracker.today()
    );

    match command {
        Commands::Stats => cmd_stats(&tracker),
        Commands::Library { search } => cmd_library(catalog, search.as_deref()),
        Commands::Info { id } => cmd_info(catalog, &id),
        Commands::Start {
            id,
            complete,
            tick_ms,
        } => {
            let interval = tick_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.timer.tick_interval());
            cmd_start(&mut tracker, catalog, &id, complete, interval)
        }
        Commands::Plan {
            shuffle,
            complete_all,
        } => cmd_plan(&mut tracker, catalog, shuffle, complete_all),
        Commands::Badges => {
            display_badges(tracker.state());
            Ok(())
        }
        Commands::History => cmd_history(&tracker),
        Commands::Week => cmd_week(&tracker),
        Commands::Bmi { height, weight } => cmd_bmi(&mut tracker, height, weight),
        Commands::Goal { goal_type, minutes } => cmd_goal(&mut tracker, goal_type, minutes),
        Commands::Theme { toggle } => {
            if toggle {
                tracker.toggle_theme()?;
            }
            println!("Theme: {}", tracker.state().theme);
            Ok(())
        }
        Commands::Export { out, format } => cmd_export(&tracker, out, &format),
        Commands::Reset { yes } => cmd_reset(&mut tracker, yes, seed),
    }
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Stats => "stats",
            Commands::Library { .. } => "library",
            Commands::Info { .. } => "info",
            Commands::Start { .. } => "start",
            Commands::Plan { .. } => "plan",
            Commands::Badges => "badges",
            Commands::History => "history",
            Commands::Week => "week",
            Commands::Bmi { .. } => "bmi",
            Commands::Goal { .. } => "goal",
            Commands::Theme { .. } => "theme",
            Commands::Export { .. } => "export",
            Commands::Reset { .. } => "reset",
        }
    }
}

fn cmd_stats(tracker: &Tracker) -> Result<()> {
    let state = tracker.state();

    println!("\n  Today ({})", tracker.today());
    println!("  Workouts: {}", state.workouts_today);
    println!("  Calories: {} kcal", state.calories_today);
    println!("  Points:   {}", state.points);
    println!(
        "  Goal:     {}% of {} min/day",
        state.daily_progress_percent(),
        state.goal_minutes
    );
    if let Some(bmi) = state.bmi {
        println!("  BMI:      {:.1}", bmi);
    }
    println!();
    display_badges(state);
    Ok(())
}

fn cmd_library(catalog: &Catalog, search: Option<&str>) -> Result<()> {
    let workouts = catalog.search(search.unwrap_or(""));
    if workouts.is_empty() {
        println!("No workouts match.");
        return Ok(());
    }

    for w in workouts {
        println!(
            "  {:<13} {:<20} {:<12} #{:<9} {:>3}s {:>3} kcal",
            w.id, w.name, w.level, w.category, w.duration_seconds, w.calories
        );
    }
    Ok(())
}

fn cmd_info(catalog: &Catalog, id: &str) -> Result<()> {
    let workout = catalog
        .find(id)
        .ok_or_else(|| Error::UnknownWorkout(id.to_string()))?;
    display_workout(workout);
    Ok(())
}

fn cmd_start(
    tracker: &mut Tracker,
    catalog: &Catalog,
    id: &str,
    complete: bool,
    interval: Duration,
) -> Result<()> {
    let workout = catalog
        .find(id)
        .ok_or_else(|| Error::UnknownWorkout(id.to_string()))?;

    display_workout(workout);

    let mut timer = SessionTimer::new(interval);
    timer.start(workout);

    if complete {
        let event = timer.force_complete(tracker)?;
        report(&event, &timer, tracker);
        return Ok(());
    }

    println!("  'p' + Enter to pause/resume, 'd' + Enter to finish now, 'q' + Enter to quit");
    let keys = spawn_key_reader();
    let mut input_open = true;

    loop {
        let key = match timer.schedule().map(|s| s.time_until_due(Instant::now())) {
            Some(wait) if input_open => match keys.recv_timeout(wait) {
                Ok(key) => Some(key),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => {
                    input_open = false;
                    continue;
                }
            },
            Some(wait) => {
                std::thread::sleep(wait);
                None
            }
            // Paused: block until the user acts
            None => match keys.recv() {
                Ok(key) => Some(key),
                Err(_) => Some(Key::Quit),
            },
        };

        let event = match key {
            None => match timer.tick(tracker)? {
                Some(event) => event,
                None => continue,
            },
            Some(Key::PauseResume) => match timer.state() {
                TimerState::Paused => timer.resume()?,
                _ => timer.pause()?,
            },
            Some(Key::Done) => timer.force_complete(tracker)?,
            Some(Key::Quit) => timer.cancel()?,
        };

        report(&event, &timer, tracker);
        if matches!(
            event,
            TimerEvent::Completed { .. } | TimerEvent::Cancelled { .. }
        ) {
            break;
        }
    }

    Ok(())
}

fn cmd_plan(
    tracker: &mut Tracker,
    catalog: &Catalog,
    shuffle: bool,
    complete_all: bool,
) -> Result<()> {
    let mut rng = rand::thread_rng();
    if shuffle {
        tracker.shuffle_plan(catalog, &mut rng)?;
    } else {
        tracker.ensure_plan(catalog, &mut rng)?;
    }
    if complete_all {
        tracker.complete_plan()?;
    }

    println!("\n  Today's plan");
    for (item, workout) in tracker.state().plan_entries(catalog) {
        let status = if item.done { "Done ✔" } else { "Pending" };
        match workout {
            Some(w) => println!(
                "  {:<13} {:<20} #{:<9} {:>3}s  {}",
                w.id, w.name, w.category, w.duration_seconds, status
            ),
            None => println!(
                "  {:<13} {:<20} {}",
                item.id,
                catalog.name_or_unknown(&item.id),
                status
            ),
        }
    }
    println!();
    println!("  {}", tracker.state().plan_suggestion());
    Ok(())
}

fn cmd_history(tracker: &Tracker) -> Result<()> {
    let history = &tracker.state().history;
    if history.is_empty() {
        println!("No workouts yet. Start one from the library!");
        return Ok(());
    }

    for h in history {
        println!(
            "  {:<20} {:>3} kcal • {:>3}s • {}",
            h.workout, h.calories, h.seconds, h.date
        );
    }
    Ok(())
}

fn cmd_week(tracker: &Tracker) -> Result<()> {
    let state = tracker.state();
    let max = state.week.iter().map(|b| b.calories).max().unwrap_or(0).max(1);

    for bucket in &state.week {
        let bar = "█".repeat((bucket.calories * 30 / max) as usize);
        println!(
            "  {}  {:>4} kcal {:>2} workouts  {}",
            bucket.date.format("%m-%d"),
            bucket.calories,
            bucket.workouts,
            bar
        );
    }

    let (calories, workouts) = state.week_totals();
    println!("\n  Total: {} kcal, {} workouts", calories, workouts);
    Ok(())
}

fn cmd_bmi(tracker: &mut Tracker, height: f64, weight: f64) -> Result<()> {
    match tracker.record_bmi(height, weight) {
        Ok(reading) => {
            println!("BMI: {:.1}", reading.value);
            println!("{}", reading.band.advice());
            Ok(())
        }
        Err(Error::MissingMeasurement) => {
            println!("{}", Error::MissingMeasurement);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn cmd_goal(tracker: &mut Tracker, goal_type: Option<String>, minutes: Option<u32>) -> Result<()> {
    if goal_type.is_some() || minutes.is_some() {
        let goal_type = match goal_type {
            Some(t) => GoalType::parse(&t).ok_or_else(|| {
                Error::Other(format!(
                    "Unknown goal type: {}. Use stay-fit, fat-loss or muscle-gain.",
                    t
                ))
            })?,
            None => tracker.state().goal_type,
        };
        let minutes = minutes.unwrap_or(tracker.state().goal_minutes);
        tracker.set_goal(goal_type, minutes)?;
    }

    let state = tracker.state();
    println!("Goal: {} ({} min/day)", state.goal_type, state.goal_minutes);
    println!("{}", state.plan_suggestion());
    Ok(())
}

fn cmd_export(tracker: &Tracker, out: Option<PathBuf>, format: &str) -> Result<()> {
    let format = ExportFormat::parse(format)
        .ok_or_else(|| Error::Other(format!("Unknown export format: {}", format)))?;
    let path = out.unwrap_or_else(|| match format {
        ExportFormat::Json => PathBuf::from(DEFAULT_EXPORT_FILE),
        ExportFormat::Csv => PathBuf::from("fitflex-history.csv"),
    });

    let count = export(tracker.state(), &path, format)?;
    println!("✓ Exported {} history entries to {}", count, path.display());
    Ok(())
}

fn cmd_reset(tracker: &mut Tracker, yes: bool, seed: (GoalType, u32)) -> Result<()> {
    if !yes {
        print!("Reset all saved progress? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !matches!(input.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Nothing changed.");
            return Ok(());
        }
    }

    tracing::debug!("Resetting progress in {:?}", tracker.paths().progress);
    tracker.reset(seed)?;
    println!("✓ Progress reset");
    Ok(())
}

fn display_workout(w: &WorkoutDefinition) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", w.name);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  #{} • {} • {}s • {} kcal", w.category, w.level, w.duration_seconds, w.calories);
    println!("  {}", w.description);
    if let Some(ref media) = w.media_ref {
        println!("  ℹ Demo: {}", media);
    }
    println!();
}

fn display_badges(state: &ProgressState) {
    println!("  Badges");
    for status in state.evaluate_badges() {
        let mark = if status.unlocked { "unlocked" } else { "locked" };
        println!("  {} {:<14} {}", status.badge.icon, status.badge.name, mark);
    }
}

fn report(event: &TimerEvent, timer: &SessionTimer, tracker: &Tracker) {
    match event {
        TimerEvent::Ticked { remaining } => {
            let filled = (timer.progress() * 20.0).round() as usize;
            print!(
                "\r  {}  [{}{}]",
                format_clock(*remaining),
                "#".repeat(filled),
                ".".repeat(20 - filled.min(20))
            );
            let _ = io::stdout().flush();
        }
        TimerEvent::Started { .. } => {}
        TimerEvent::Paused { remaining } => {
            println!("\n  Paused at {}", format_clock(*remaining));
        }
        TimerEvent::Resumed { .. } => println!("  Resumed"),
        TimerEvent::Cancelled { .. } => println!("\n  Session abandoned, nothing recorded."),
        TimerEvent::Completed { .. } => {
            let state = tracker.state();
            println!("\n✓ Workout complete! +{} points", POINTS_PER_WORKOUT);
            println!(
                "  Today: {} workouts, {} kcal • {} points total",
                state.workouts_today, state.calories_today, state.points
            );
        }
    }
}

enum Key {
    PauseResume,
    Done,
    Quit,
}

/// Read commands from stdin on a helper thread; the channel closes at EOF
fn spawn_key_reader() -> Receiver<Key> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let key = match line.trim().to_lowercase().as_str() {
                "p" => Key::PauseResume,
                "d" => Key::Done,
                "q" => Key::Quit,
                _ => continue,
            };
            if tx.send(key).is_err() {
                break;
            }
        }
    });
    rx
}
