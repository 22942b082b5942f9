//! Built-in default catalog seeded on first run.
//!
//! When no data document exists (or the existing one is unreadable) the
//! store starts from this fixed set of exercises and workout templates
//! with zeroed statistics.

use crate::types::*;
use once_cell::sync::Lazy;

/// Cached seed document - built once and cloned per store
static SEED_DOCUMENT: Lazy<Document> = Lazy::new(build_seed_document);

/// A fresh copy of the default data document
pub fn seed_document() -> Document {
    SEED_DOCUMENT.clone()
}

fn exercise(name: &str, category: &str, calories_per_rep: f64, icon: &str) -> Exercise {
    Exercise {
        name: name.into(),
        category: category.into(),
        calories_per_rep,
        icon: icon.into(),
    }
}

fn step(name: &str, sets: u32, reps: u32, rest: u32) -> ExerciseStep {
    ExerciseStep {
        name: name.into(),
        sets,
        reps,
        rest,
    }
}

fn build_seed_document() -> Document {
    let exercises = vec![
        exercise("Push-ups", "Chest", 0.5, "💪"),
        exercise("Squats", "Legs", 0.6, "🦵"),
        exercise("Pull-ups", "Back", 1.0, "🏋️"),
        exercise("Crunches", "Core", 0.3, "🔥"),
        exercise("Lunges", "Legs", 0.5, "🦵"),
        exercise("Plank", "Core", 0.1, "🧘"),
        exercise("Burpees", "Cardio", 1.5, "⚡"),
        exercise("Jumping Jacks", "Cardio", 0.2, "🏃"),
        exercise("Dips", "Arms", 0.7, "💪"),
        exercise("Lateral Raises", "Shoulders", 0.4, "🎯"),
    ];

    let workouts = vec![
        WorkoutTemplate {
            name: "Quick Morning".into(),
            exercises: vec![
                step("Jumping Jacks", 3, 20, 30),
                step("Push-ups", 3, 10, 60),
                step("Squats", 3, 15, 45),
                step("Crunches", 3, 20, 30),
            ],
            description: "Short, intense start to the morning".into(),
        },
        WorkoutTemplate {
            name: "Chest & Arms".into(),
            exercises: vec![
                step("Push-ups", 4, 12, 60),
                step("Dips", 3, 10, 60),
                step("Push-ups", 3, 8, 90),
            ],
            description: "Focused upper-body session".into(),
        },
        WorkoutTemplate {
            name: "Leg Day".into(),
            exercises: vec![
                step("Squats", 4, 15, 60),
                step("Lunges", 3, 12, 45),
                step("Squats", 3, 20, 60),
            ],
            description: "Comprehensive leg workout".into(),
        },
        WorkoutTemplate {
            name: "HIIT Cardio".into(),
            exercises: vec![
                step("Burpees", 4, 10, 30),
                step("Jumping Jacks", 4, 30, 20),
                step("Squats", 4, 20, 30),
                step("Burpees", 3, 8, 45),
            ],
            description: "Intense interval training".into(),
        },
    ];

    Document {
        exercises,
        workouts,
        history: Vec::new(),
        goals: Goals::default(),
        user_stats: AggregateStats::default(),
    }
}
