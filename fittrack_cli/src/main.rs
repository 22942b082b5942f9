use clap::{Parser, Subcommand};
use fittrack_core::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "fittrack")]
#[command(about = "Personal workout tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the exercise library
    Exercises,

    /// List workout templates
    Workouts,

    /// Show the steps of a workout template
    Show {
        /// Template name
        workout: String,
    },

    /// Add an exercise to the library
    AddExercise {
        name: String,
        category: String,
        /// Calories burned per rep
        calories: String,
    },

    /// Run a workout session
    Start {
        /// Template name
        workout: String,

        /// Skip acclimation and rest countdowns (for scripting)
        #[arg(long)]
        fast: bool,
    },

    /// Show recent sessions
    History {
        /// Most recent sessions to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show all-time statistics
    Stats,

    /// Show this week's statistics
    Week,
}

fn main() -> Result<()> {
    // Initialize logging
    fittrack_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let data_path = data_dir.join("fitness_data.json");

    let mut store = Store::open(data_path)?;

    match cli.command {
        Commands::Exercises => cmd_exercises(&store),
        Commands::Workouts => cmd_workouts(&store),
        Commands::Show { workout } => cmd_show(&store, &workout),
        Commands::AddExercise {
            name,
            category,
            calories,
        } => cmd_add_exercise(&mut store, &name, &category, &calories),
        Commands::Start { workout, fast } => cmd_start(&mut store, &workout, fast, &config),
        Commands::History { limit } => cmd_history(&store, limit),
        Commands::Stats => cmd_stats(&store),
        Commands::Week => cmd_week(&store),
    }
}

fn cmd_exercises(store: &Store) -> Result<()> {
    println!("Exercise library:");
    for exercise in store.list_exercises() {
        println!(
            "  {} {:<16} {:<10} {:.1} kcal/rep",
            exercise.icon, exercise.name, exercise.category, exercise.calories_per_rep
        );
    }
    Ok(())
}

fn cmd_workouts(store: &Store) -> Result<()> {
    println!("Workout templates:");
    for workout in store.list_workouts() {
        let sets: u32 = workout.exercises.iter().map(|s| s.sets).sum();
        println!(
            "  {:<16} {} exercises, {} sets",
            workout.name,
            workout.exercises.len(),
            sets
        );
        if !workout.description.is_empty() {
            println!("      {}", workout.description);
        }
    }
    Ok(())
}

fn cmd_show(store: &Store, name: &str) -> Result<()> {
    let workout = store
        .get_workout(name)
        .ok_or_else(|| Error::NotFound(format!("workout template {:?}", name)))?;

    println!("{}", workout.name);
    if !workout.description.is_empty() {
        println!("{}", workout.description);
    }
    for step in &workout.exercises {
        let icon = store
            .get_exercise(&step.name)
            .map(|e| e.icon.clone())
            .unwrap_or_else(|| DEFAULT_ICON.to_string());
        println!(
            "  {} {}: {} x {} reps, {}s rest",
            icon, step.name, step.sets, step.reps, step.rest
        );
    }
    Ok(())
}

fn cmd_add_exercise(store: &mut Store, name: &str, category: &str, calories: &str) -> Result<()> {
    store.add_exercise(name, category, calories)?;
    println!("Added exercise: {}", name.trim());
    Ok(())
}

fn cmd_start(store: &mut Store, workout: &str, fast: bool, config: &Config) -> Result<()> {
    let acclimation = if fast {
        Duration::ZERO
    } else {
        Duration::from_secs(config.session.acclimation_seconds)
    };

    let mut engine = SessionEngine::new(acclimation);
    engine.start(store, workout)?;

    loop {
        let mut events = engine.pump(store)?;
        if fast && matches!(engine.state(), SessionState::Resting { .. }) {
            events.extend(engine.skip(store)?);
        }

        for event in events {
            match event {
                EngineEvent::Status(line) => println!("{}", line),
                EngineEvent::Tick { remaining } => {
                    if remaining > 0 && remaining % 10 == 0 {
                        println!("  {}s remaining", remaining);
                    }
                }
                EngineEvent::Finished(summary) => {
                    println!();
                    println!("Workout complete: {}", summary.workout_name);
                    println!("  Duration: {} min", summary.duration_minutes);
                    println!("  Calories: {:.1} kcal", summary.calories_burned);
                    return Ok(());
                }
            }
        }

        std::thread::sleep(Duration::from_millis(100));
    }
}

fn cmd_history(store: &Store, limit: usize) -> Result<()> {
    let history = store.history();
    if history.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    println!("Recent sessions:");
    for record in history.iter().rev().take(limit) {
        println!(
            "  {}  {:<16} {:>3} min  {:>7.1} kcal",
            record.date, record.workout_name, record.duration_minutes, record.calories_burned
        );
    }
    Ok(())
}

fn cmd_stats(store: &Store) -> Result<()> {
    let stats = store.stats();
    println!("All-time statistics:");
    println!("  Workouts:     {}", stats.total_workouts);
    println!("  Calories:     {:.1} kcal", stats.total_calories);
    println!("  Time:         {} min", stats.total_time_minutes);
    println!("  Streak:       {} days", stats.streak);
    println!("  Best streak:  {} days", stats.best_streak);
    match stats.last_workout_date {
        Some(date) => println!("  Last workout: {}", date),
        None => println!("  Last workout: never"),
    }
    Ok(())
}

fn cmd_week(store: &Store) -> Result<()> {
    let week = store.weekly_stats(chrono::Local::now().date_naive());
    println!("This week:");
    println!("  Workouts: {}", week.workouts);
    println!("  Calories: {:.1} kcal", week.calories);
    println!("  Time:     {} min", week.minutes);
    println!(
        "  Goal:     {:.0}% of {} workouts",
        week.goal_progress,
        store.goals().weekly_workouts
    );

    const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    for (day, count) in DAYS.iter().zip(week.daily_breakdown.iter()) {
        println!("  {}  {}", day, "#".repeat(*count as usize));
    }
    Ok(())
}
