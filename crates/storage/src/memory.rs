use std::collections::BTreeMap;

use cadence_domain as domain;
use log::debug;

use crate::json::{Document, JsonError};

/// Read-only history store held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemory {
    histories: BTreeMap<domain::AthleteID, domain::History>,
}

impl InMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add logged entries of `athlete` to the existing ones.
    pub fn insert(&mut self, athlete: domain::AthleteID, history: domain::History) {
        let entry = self.histories.entry(athlete).or_default();
        entry.runs.extend(history.runs);
        entry.strength.extend(history.strength);
    }

    pub fn athletes(&self) -> impl Iterator<Item = &domain::AthleteID> {
        self.histories.keys()
    }
}

impl TryFrom<&Document> for InMemory {
    type Error = JsonError;

    fn try_from(value: &Document) -> Result<Self, Self::Error> {
        let mut memory = InMemory::new();
        for (athlete, history) in value.histories()? {
            memory.insert(athlete, history);
        }
        Ok(memory)
    }
}

impl domain::HistoryRepository for InMemory {
    async fn read_history(
        &self,
        athlete: domain::AthleteID,
        interval: domain::Interval,
    ) -> Result<domain::History, domain::ReadError> {
        let history = self
            .histories
            .get(&athlete)
            .map(|h| h.within(&interval))
            .unwrap_or_default();
        debug!(
            "found {} runs and {} strength exercises of athlete {athlete}",
            history.runs.len(),
            history.strength.len()
        );
        Ok(history)
    }
}
