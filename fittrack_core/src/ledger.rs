//! History ledger: the append-only session log and derived statistics.
//!
//! `record_session` appends one record and updates the aggregate stats
//! incrementally (streak transition rule included), then persists the
//! document durably. `weekly_stats` is a pure read-side fold over the
//! full history; at this scale a per-call O(n) pass is acceptable and
//! nothing is cached.

use crate::{ExerciseStep, Result, SessionRecord, Store};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

/// Statistics for one calendar week (Monday through Sunday)
#[derive(Clone, Debug, PartialEq)]
pub struct WeeklyStats {
    pub workouts: u32,
    /// Rounded to one decimal
    pub calories: f64,
    pub minutes: u64,
    /// Sessions per weekday, Monday = 0 .. Sunday = 6
    pub daily_breakdown: [u32; 7],
    /// Percentage of the weekly workout goal, 0-based
    pub goal_progress: f64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl Store {
    /// Record a completed or user-terminated session.
    ///
    /// Builds the record with today's local date, appends it to the
    /// history (never reordered, never truncated) and updates the
    /// aggregate stats before persisting. Callers clamp
    /// `duration_minutes` to >= 1.
    pub fn record_session(
        &mut self,
        workout_name: &str,
        steps: Vec<ExerciseStep>,
        duration_minutes: u32,
        calories_burned: f64,
    ) -> Result<()> {
        self.record_session_at(Local::now(), workout_name, steps, duration_minutes, calories_burned)
    }

    /// `record_session` with an injected clock, for deterministic tests.
    pub(crate) fn record_session_at(
        &mut self,
        now: DateTime<Local>,
        workout_name: &str,
        steps: Vec<ExerciseStep>,
        duration_minutes: u32,
        calories_burned: f64,
    ) -> Result<()> {
        let today = now.date_naive();
        let calories = round1(calories_burned);

        let record = SessionRecord {
            date: today,
            timestamp: now,
            workout_name: workout_name.to_string(),
            exercises: steps,
            duration_minutes,
            calories_burned: calories,
        };

        self.commit(|doc| {
            doc.history.push(record);

            let stats = &mut doc.user_stats;
            stats.total_workouts += 1;
            stats.total_calories += calories;
            stats.total_time_minutes += u64::from(duration_minutes);

            match stats.last_workout_date {
                None => stats.streak = 1,
                Some(last) => {
                    let gap_days = (today - last).num_days();
                    if gap_days == 1 {
                        stats.streak += 1;
                    } else if gap_days > 1 {
                        stats.streak = 1;
                    }
                    // gap_days == 0: same-day repeat, streak counts
                    // distinct days and stays unchanged
                }
            }
            stats.best_streak = stats.best_streak.max(stats.streak);
            stats.last_workout_date = Some(today);
        })?;

        tracing::info!(
            "Recorded session {:?}: {} min, {} kcal",
            workout_name,
            duration_minutes,
            calories
        );
        Ok(())
    }

    /// Statistics over the calendar week containing `today`
    /// (Monday 00:00 through the instant before next Monday).
    pub fn weekly_stats(&self, today: NaiveDate) -> WeeklyStats {
        let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let week_end = week_start + Duration::days(7);

        let mut workouts = 0u32;
        let mut calories = 0.0f64;
        let mut minutes = 0u64;
        let mut daily_breakdown = [0u32; 7];

        for record in self.history() {
            if record.date >= week_start && record.date < week_end {
                workouts += 1;
                calories += record.calories_burned;
                minutes += u64::from(record.duration_minutes);
                daily_breakdown[record.date.weekday().num_days_from_monday() as usize] += 1;
            }
        }

        let goal = self.goals().weekly_workouts.max(1);
        WeeklyStats {
            workouts,
            calories: round1(calories),
            minutes,
            daily_breakdown,
            goal_progress: f64::from(workouts) / f64::from(goal) * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn open_store(dir: &tempfile::TempDir) -> Store {
        Store::open(dir.path().join("fitness_data.json")).unwrap()
    }

    fn local(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, m, d, 8, 0, 0)
            .single()
            .expect("unambiguous local time")
    }

    fn record_on(store: &mut Store, at: DateTime<Local>) {
        store
            .record_session_at(at, "Leg Day", vec![], 20, 100.0)
            .unwrap();
    }

    #[test]
    fn test_streak_grows_on_consecutive_days() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        // 2024-07-01 is a Monday
        for day in 1..=4 {
            record_on(&mut store, local(2024, 7, day));
        }

        let stats = store.stats();
        assert_eq!(stats.streak, 4);
        assert_eq!(stats.best_streak, 4);
        assert_eq!(stats.total_workouts, 4);
        assert_eq!(stats.total_time_minutes, 80);
    }

    #[test]
    fn test_gap_resets_streak_but_not_best() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        record_on(&mut store, local(2024, 7, 1));
        record_on(&mut store, local(2024, 7, 2));
        record_on(&mut store, local(2024, 7, 5));

        let stats = store.stats();
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.best_streak, 2);
    }

    #[test]
    fn test_same_day_repeat_leaves_streak_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        record_on(&mut store, local(2024, 7, 1));
        record_on(&mut store, local(2024, 7, 2));
        record_on(&mut store, local(2024, 7, 2));

        let stats = store.stats();
        assert_eq!(stats.streak, 2);
        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.total_workouts, 3);
    }

    #[test]
    fn test_calories_rounded_at_write_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        store
            .record_session_at(local(2024, 7, 1), "Quick Morning", vec![], 5, 33.333)
            .unwrap();

        let record = &store.history()[0];
        assert_eq!(record.calories_burned, 33.3);
        assert_eq!(store.stats().total_calories, 33.3);
    }

    #[test]
    fn test_weekly_stats_empty_week() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        let week = store.weekly_stats(NaiveDate::from_ymd_opt(2024, 7, 3).unwrap());
        assert_eq!(week.workouts, 0);
        assert_eq!(week.goal_progress, 0.0);
        assert_eq!(week.daily_breakdown, [0; 7]);
        assert_eq!(week.minutes, 0);
    }

    #[test]
    fn test_weekly_stats_window_and_buckets() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        record_on(&mut store, local(2024, 6, 30)); // Sunday of previous week
        record_on(&mut store, local(2024, 7, 1)); // Monday
        record_on(&mut store, local(2024, 7, 1)); // Monday again
        record_on(&mut store, local(2024, 7, 7)); // Sunday
        record_on(&mut store, local(2024, 7, 8)); // Monday of next week

        let week = store.weekly_stats(NaiveDate::from_ymd_opt(2024, 7, 3).unwrap());
        assert_eq!(week.workouts, 3);
        assert_eq!(week.daily_breakdown[0], 2); // Monday
        assert_eq!(week.daily_breakdown[6], 1); // Sunday
        assert_eq!(week.minutes, 60);
        assert_eq!(week.calories, 300.0);
        // Default goal is 3 workouts per week
        assert_eq!(week.goal_progress, 100.0);
    }

    #[test]
    fn test_stats_rederivable_from_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        record_on(&mut store, local(2024, 7, 1));
        record_on(&mut store, local(2024, 7, 2));
        record_on(&mut store, local(2024, 7, 4));
        let derived = store.stats().clone();

        // Replay the same history into a fresh ledger
        let replay_dir = tempfile::tempdir().unwrap();
        let mut replay = open_store(&replay_dir);
        for record in store.history().to_vec() {
            replay
                .record_session_at(
                    record.timestamp,
                    &record.workout_name,
                    record.exercises.clone(),
                    record.duration_minutes,
                    record.calories_burned,
                )
                .unwrap();
        }

        assert_eq!(replay.stats(), &derived);
    }

    #[test]
    fn test_history_roundtrips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        let steps = vec![ExerciseStep {
            name: "Squats".into(),
            sets: 4,
            reps: 15,
            rest: 60,
        }];
        store
            .record_session_at(local(2024, 7, 1), "Leg Day", steps.clone(), 22, 87.65)
            .unwrap();

        let reloaded = open_store(&dir);
        assert_eq!(reloaded.history().len(), 1);
        let record = &reloaded.history()[0];
        assert_eq!(record.workout_name, "Leg Day");
        assert_eq!(record.exercises, steps);
        assert_eq!(record.duration_minutes, 22);
        assert_eq!(record.calories_burned, 87.7);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(reloaded.stats(), store.stats());
    }
}
