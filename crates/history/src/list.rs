use std::collections::HashSet;

use model::RunSummary;
use utility::id::Id;

/// Number of runs kept.
pub const CAPACITY: usize = 7;

/// Newest-first list of at most [`CAPACITY`] runs with unique ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunHistory {
    runs: Vec<RunSummary>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes runs in newest-first order, as stored in the document. Duplicate
    /// ids keep their newest entry and everything past [`CAPACITY`] is dropped.
    pub fn from_runs(runs: Vec<RunSummary>) -> Self {
        let total = runs.len();
        let mut seen = HashSet::new();
        let mut runs = runs
            .into_iter()
            .filter(|run| seen.insert(run.id))
            .collect::<Vec<_>>();
        runs.truncate(CAPACITY);
        if runs.len() < total {
            log::warn!(
                "history document held {} runs, keeping the newest {}",
                total,
                runs.len()
            );
        }
        Self { runs }
    }

    /// Puts `run` on top and returns whatever fell off the end.
    ///
    /// A run with the same id as an existing entry replaces that entry.
    pub fn insert(&mut self, run: RunSummary) -> Vec<RunSummary> {
        self.remove(&run.id);
        self.runs.insert(0, run);
        if self.runs.len() > CAPACITY {
            self.runs.split_off(CAPACITY)
        } else {
            Vec::new()
        }
    }

    pub fn remove(&mut self, id: &Id<RunSummary>) -> Option<RunSummary> {
        let index = self.runs.iter().position(|run| run.id == *id)?;
        Some(self.runs.remove(index))
    }

    pub fn get(&self, id: &Id<RunSummary>) -> Option<&RunSummary> {
        self.runs.iter().find(|run| run.id == *id)
    }

    pub fn runs(&self) -> &[RunSummary] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;

    fn run(name: &str) -> RunSummary {
        RunSummary {
            id: Id::new(Uuid::new_v4()),
            imported_at: Utc.with_ymd_and_hms(2025, 10, 30, 11, 6, 0).unwrap(),
            title: Some(name.to_owned()),
            location: None,
            distance_meters: 5000.0,
            duration_seconds: 1500.0,
            avg_pace_sec_per_mile: 482.8,
            preview_points: Vec::new(),
        }
    }

    fn titles(history: &RunHistory) -> Vec<String> {
        history
            .runs()
            .iter()
            .filter_map(|run| run.title.clone())
            .collect()
    }

    #[test]
    fn evicts_the_oldest_beyond_capacity() {
        let mut history = RunHistory::new();
        let mut evicted = Vec::new();
        for name in ["A", "B", "C", "D", "E", "F", "G", "H"] {
            evicted.extend(history.insert(run(name)));
        }

        assert_eq!(history.len(), CAPACITY);
        assert_eq!(titles(&history), ["H", "G", "F", "E", "D", "C", "B"]);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].title.as_deref(), Some("A"));
    }

    #[test]
    fn reinserting_an_id_moves_it_to_the_top() {
        let mut history = RunHistory::new();
        let a = run("A");
        history.insert(a.clone());
        history.insert(run("B"));
        let evicted = history.insert(a);

        assert!(evicted.is_empty());
        assert_eq!(titles(&history), ["A", "B"]);
    }

    #[test]
    fn remove_is_a_no_op_for_unknown_ids() {
        let mut history = RunHistory::new();
        let a = run("A");
        history.insert(a.clone());

        assert!(history.remove(&Id::new(Uuid::new_v4())).is_none());
        assert_eq!(history.len(), 1);
        assert_eq!(history.remove(&a.id), Some(a));
        assert!(history.is_empty());
    }

    #[test]
    fn loading_caps_and_deduplicates() {
        let mut runs = ["A", "B", "C", "D", "E", "F", "G", "H", "I"]
            .into_iter()
            .map(run)
            .collect::<Vec<_>>();
        let duplicate = runs[0].clone();
        runs.insert(1, duplicate);

        let history = RunHistory::from_runs(runs);
        assert_eq!(titles(&history), ["A", "B", "C", "D", "E", "F", "G"]);
    }
}
