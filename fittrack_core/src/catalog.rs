//! Catalog operations: the exercise library and workout templates.
//!
//! The catalog is the exercises/workouts portion of the data document.
//! Listing preserves insertion order; there is no delete operation for
//! either table.

use crate::{Error, Exercise, Result, Store, WorkoutTemplate, DEFAULT_ICON};

impl Store {
    /// All exercises in insertion order
    pub fn list_exercises(&self) -> &[Exercise] {
        &self.document().exercises
    }

    /// All workout templates in insertion order
    pub fn list_workouts(&self) -> &[WorkoutTemplate] {
        &self.document().workouts
    }

    pub fn get_exercise(&self, name: &str) -> Option<&Exercise> {
        self.document().exercises.iter().find(|e| e.name == name)
    }

    pub fn get_workout(&self, name: &str) -> Option<&WorkoutTemplate> {
        self.document().workouts.iter().find(|w| w.name == name)
    }

    /// Add an exercise to the library and persist the document.
    ///
    /// `calories_per_rep` is user input and is parsed here; empty name or
    /// category, or a calorie value that does not parse as a non-negative
    /// number, is rejected with no state change. An existing exercise with
    /// the same name is overwritten silently.
    pub fn add_exercise(&mut self, name: &str, category: &str, calories_per_rep: &str) -> Result<()> {
        let name = name.trim();
        let category = category.trim();

        if name.is_empty() {
            return Err(Error::Validation("exercise name must not be empty".into()));
        }
        if category.is_empty() {
            return Err(Error::Validation("category must not be empty".into()));
        }

        let calories: f64 = calories_per_rep.trim().parse().map_err(|_| {
            Error::Validation(format!("invalid calories value: {:?}", calories_per_rep))
        })?;
        if !calories.is_finite() || calories < 0.0 {
            return Err(Error::Validation(format!(
                "calories per rep must be non-negative, got {}",
                calories
            )));
        }

        let exercise = Exercise {
            name: name.to_string(),
            category: category.to_string(),
            calories_per_rep: calories,
            icon: DEFAULT_ICON.to_string(),
        };

        self.commit(|doc| {
            match doc.exercises.iter_mut().find(|e| e.name == exercise.name) {
                Some(existing) => *existing = exercise,
                None => doc.exercises.push(exercise),
            }
        })?;

        tracing::info!("Added exercise {:?}", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store(dir: &tempfile::TempDir) -> Store {
        Store::open(dir.path().join("fitness_data.json")).unwrap()
    }

    #[test]
    fn test_list_exercises_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        store.add_exercise("Rowing", "Back", "0.9").unwrap();
        store.add_exercise("Box Jumps", "Legs", "1.2").unwrap();

        let names: Vec<_> = store.list_exercises().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names[names.len() - 2..].to_vec(), vec!["Rowing", "Box Jumps"]);

        // Order survives a reload
        let reloaded = open_store(&dir);
        let reloaded_names: Vec<_> =
            reloaded.list_exercises().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, reloaded_names);
    }

    #[test]
    fn test_get_workout_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        let workout = store.get_workout("Leg Day").unwrap();
        assert_eq!(workout.exercises.len(), 3);
        assert!(store.get_workout("No Such Workout").is_none());
    }

    #[test]
    fn test_add_exercise_rejects_bad_calories() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);
        let before = store.list_exercises().len();

        let result = store.add_exercise("Rowing", "Back", "abc");
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(store.list_exercises().len(), before);

        let result = store.add_exercise("Rowing", "Back", "-1.5");
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(store.list_exercises().len(), before);
    }

    #[test]
    fn test_add_exercise_rejects_empty_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        assert!(matches!(
            store.add_exercise("", "Back", "0.9"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            store.add_exercise("Rowing", "  ", "0.9"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_add_exercise_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);
        let before = store.list_exercises().len();

        store.add_exercise("Push-ups", "Full Body", "0.8").unwrap();

        assert_eq!(store.list_exercises().len(), before);
        let updated = store.get_exercise("Push-ups").unwrap();
        assert_eq!(updated.category, "Full Body");
        assert_eq!(updated.calories_per_rep, 0.8);
    }
}
