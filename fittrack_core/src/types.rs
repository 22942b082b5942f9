//! Core domain types for the Fittrack system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and workout templates (the catalog)
//! - Session records and aggregate statistics (the ledger)
//! - Weekly goals
//! - The persisted document that holds all of the above

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calories credited per repetition when a template step names an exercise
/// that is missing from the catalog.
pub const DEFAULT_CALORIES_PER_REP: f64 = 0.5;

/// Icon assigned to exercises added without one.
pub const DEFAULT_ICON: &str = "💪";

// ============================================================================
// Catalog Types
// ============================================================================

/// An exercise definition (e.g., "Push-ups")
#[derive(Clone, Debug, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub category: String,
    pub calories_per_rep: f64,
    pub icon: String,
}

/// One exercise entry within a workout template, with its own
/// set/rep/rest parameters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseStep {
    /// Exercise name; not required to exist in the catalog
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// Rest duration in seconds after each set
    pub rest: u32,
}

/// A named, ordered sequence of exercise steps
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutTemplate {
    pub name: String,
    pub exercises: Vec<ExerciseStep>,
    pub description: String,
}

// ============================================================================
// Ledger Types
// ============================================================================

/// One completed (or user-terminated) workout session. Append-only:
/// records are never mutated or deleted once written.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Calendar date at day granularity (system local date)
    pub date: NaiveDate,
    pub timestamp: DateTime<Local>,
    pub workout_name: String,
    /// The exercise-step sequence actually used
    pub exercises: Vec<ExerciseStep>,
    /// Whole minutes, clamped to >= 1 by the caller
    pub duration_minutes: u32,
    /// Rounded to one decimal at write time
    pub calories_burned: f64,
}

/// Derived aggregate statistics over the session history.
///
/// Always re-derivable by replaying the history from empty state;
/// updated incrementally on each new record.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct AggregateStats {
    pub total_workouts: u32,
    pub total_calories: f64,
    pub total_time_minutes: u64,
    /// Consecutive calendar days with at least one recorded session
    pub streak: u32,
    pub best_streak: u32,
    pub last_workout_date: Option<NaiveDate>,
}

/// Weekly goal configuration. Read-only to the core; used to compute
/// progress ratios.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goals {
    pub weekly_workouts: u32,
    pub daily_calories: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            weekly_workouts: 3,
            daily_calories: 300,
        }
    }
}

// ============================================================================
// Persisted Document
// ============================================================================

/// The single structured document persisted to disk.
///
/// `exercises` and `workouts` serialize as name-keyed maps (the on-disk
/// schema) but are Vec-backed in memory so listing preserves insertion
/// order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(with = "named_table")]
    pub exercises: Vec<Exercise>,
    #[serde(with = "named_table")]
    pub workouts: Vec<WorkoutTemplate>,
    pub history: Vec<SessionRecord>,
    #[serde(default)]
    pub goals: Goals,
    #[serde(default)]
    pub user_stats: AggregateStats,
}

/// Attribute payload for an exercise entry in the name-keyed map
#[derive(Serialize, Deserialize)]
pub struct ExerciseAttrs {
    pub category: String,
    pub calories_per_rep: f64,
    #[serde(default = "default_icon")]
    pub icon: String,
}

/// Attribute payload for a workout entry in the name-keyed map
#[derive(Serialize, Deserialize)]
pub struct WorkoutAttrs {
    pub exercises: Vec<ExerciseStep>,
    #[serde(default)]
    pub description: String,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

/// A row of a name-keyed table: splits into (name, attributes) for
/// serialization and joins back on deserialization.
pub trait NamedRow: Sized {
    type Attrs: Serialize + serde::de::DeserializeOwned;

    fn name(&self) -> &str;
    fn to_attrs(&self) -> Self::Attrs;
    fn from_attrs(name: String, attrs: Self::Attrs) -> Self;
}

impl NamedRow for Exercise {
    type Attrs = ExerciseAttrs;

    fn name(&self) -> &str {
        &self.name
    }

    fn to_attrs(&self) -> ExerciseAttrs {
        ExerciseAttrs {
            category: self.category.clone(),
            calories_per_rep: self.calories_per_rep,
            icon: self.icon.clone(),
        }
    }

    fn from_attrs(name: String, attrs: ExerciseAttrs) -> Self {
        Exercise {
            name,
            category: attrs.category,
            calories_per_rep: attrs.calories_per_rep,
            icon: attrs.icon,
        }
    }
}

impl NamedRow for WorkoutTemplate {
    type Attrs = WorkoutAttrs;

    fn name(&self) -> &str {
        &self.name
    }

    fn to_attrs(&self) -> WorkoutAttrs {
        WorkoutAttrs {
            exercises: self.exercises.clone(),
            description: self.description.clone(),
        }
    }

    fn from_attrs(name: String, attrs: WorkoutAttrs) -> Self {
        WorkoutTemplate {
            name,
            exercises: attrs.exercises,
            description: attrs.description,
        }
    }
}

/// Serde adapter between `Vec<T: NamedRow>` and a JSON map keyed by name.
///
/// Deserialization preserves the order entries appear in the document, so
/// a save/load cycle keeps insertion order.
pub mod named_table {
    use super::NamedRow;
    use serde::de::{MapAccess, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    pub fn serialize<T, S>(rows: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        T: NamedRow,
        S: Serializer,
    {
        serializer.collect_map(rows.iter().map(|row| (row.name().to_owned(), row.to_attrs())))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: NamedRow,
        D: Deserializer<'de>,
    {
        struct TableVisitor<T>(PhantomData<T>);

        impl<'de, T: NamedRow> Visitor<'de> for TableVisitor<T> {
            type Value = Vec<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of names to attributes")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rows = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, attrs)) = map.next_entry::<String, T::Attrs>()? {
                    rows.push(T::from_attrs(name, attrs));
                }
                Ok(rows)
            }
        }

        deserializer.deserialize_map(TableVisitor(PhantomData))
    }
}
