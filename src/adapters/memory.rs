use std::collections::HashMap;

use crate::domain::model::{Reservation, ReservationId, ReservationStatus};
use crate::domain::ports::ReservationStore;
use crate::utils::error::Result;

/// Insertion-ordered store held in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Vec<Reservation>,
    index: HashMap<ReservationId, usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_records(records: Vec<Reservation>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.upsert(record);
        }
        store
    }

    pub(crate) fn records(&self) -> &[Reservation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn upsert(&mut self, reservation: Reservation) {
        match self.index.get(&reservation.id()) {
            Some(&position) => self.records[position] = reservation,
            None => {
                self.index.insert(reservation.id(), self.records.len());
                self.records.push(reservation);
            }
        }
    }

    pub(crate) fn remove(&mut self, id: &ReservationId) {
        if let Some(position) = self.index.remove(id) {
            self.records.remove(position);
            for slot in self.index.values_mut() {
                if *slot > position {
                    *slot -= 1;
                }
            }
        }
    }

    pub(crate) fn filtered(
        &self,
        status: Option<ReservationStatus>,
        offset: usize,
        limit: usize,
    ) -> Vec<Reservation> {
        self.records
            .iter()
            .filter(|r| status.map_or(true, |s| r.status() == s))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }
}

impl ReservationStore for InMemoryStore {
    fn save(&mut self, reservation: Reservation) -> Result<Reservation> {
        self.upsert(reservation.clone());
        Ok(reservation)
    }

    fn get(&self, id: &ReservationId) -> Result<Option<Reservation>> {
        Ok(self.index.get(id).map(|&position| self.records[position].clone()))
    }

    fn list(
        &self,
        status: Option<ReservationStatus>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Reservation>> {
        Ok(self.filtered(status, offset, limit))
    }

    fn all(&self) -> Result<Vec<Reservation>> {
        Ok(self.records.clone())
    }
}
