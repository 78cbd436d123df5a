//! Instructor time slots keyed by calendar date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::common::{new_id, parse_iso_date, Identifiable, TimeOfDay};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub instructor_id: String,
    pub reservation_id: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(default)]
    pub description: String,
}

impl ScheduleEntry {
    pub fn new(
        instructor_id: impl Into<String>,
        reservation_id: impl Into<String>,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            instructor_id: instructor_id.into(),
            reservation_id: reservation_id.into(),
            start_time,
            end_time,
            description: description.into(),
        }
    }

    /// Applies the editable fields; the linked reservation never changes.
    pub fn apply(&mut self, patch: &EntryPatch) {
        if let Some(instructor_id) = &patch.instructor_id {
            self.instructor_id = instructor_id.clone();
        }
        if let Some(start) = patch.start_time {
            self.start_time = start;
        }
        if let Some(end) = patch.end_time {
            self.end_time = end;
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
    }
}

impl Identifiable for ScheduleEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial update for an existing [`ScheduleEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub instructor_id: Option<String>,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub description: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.instructor_id.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.description.is_none()
    }
}

/// Sparse date → ordered entries map. A date key exists only while it holds entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScheduleTable(BTreeMap<NaiveDate, Vec<ScheduleEntry>>);

impl ScheduleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, date: NaiveDate, entry: ScheduleEntry) {
        self.0.entry(date).or_default().push(entry);
    }

    /// Returns the updated entry, or `None` when the date holds no such entry.
    pub fn update_entry(
        &mut self,
        date: NaiveDate,
        entry_id: &str,
        patch: &EntryPatch,
    ) -> Option<&ScheduleEntry> {
        let entry = self
            .0
            .get_mut(&date)?
            .iter_mut()
            .find(|entry| entry.id == entry_id)?;
        entry.apply(patch);
        Some(entry)
    }

    /// Removes an entry and drops the date key once it is empty.
    pub fn remove_entry(&mut self, date: NaiveDate, entry_id: &str) -> Option<ScheduleEntry> {
        let entries = self.0.get_mut(&date)?;
        let position = entries.iter().position(|entry| entry.id == entry_id)?;
        let removed = entries.remove(position);
        if entries.is_empty() {
            self.0.remove(&date);
        }
        Some(removed)
    }

    /// Drops every entry linked to a reservation. Returns how many were removed.
    pub fn remove_reservation(&mut self, reservation_id: &str) -> usize {
        let mut removed = 0;
        self.0.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|entry| entry.reservation_id != reservation_id);
            removed += before - entries.len();
            !entries.is_empty()
        });
        removed
    }

    pub fn entries_on(&self, date: NaiveDate) -> &[ScheduleEntry] {
        self.0.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn find(&self, entry_id: &str) -> Option<(NaiveDate, &ScheduleEntry)> {
        self.iter().find(|(_, entry)| entry.id == entry_id)
    }

    pub fn has_entry_for(&self, date: NaiveDate, reservation_id: &str) -> bool {
        self.entries_on(date)
            .iter()
            .any(|entry| entry.reservation_id == reservation_id)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.keys().copied()
    }

    /// Flattened `(date, entry)` pairs in date order, insertion order within a date.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &ScheduleEntry)> + '_ {
        self.0
            .iter()
            .flat_map(|(date, entries)| entries.iter().map(move |entry| (*date, entry)))
    }

    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn date_count(&self) -> usize {
        self.0.len()
    }
}

impl<'de> Deserialize<'de> for ScheduleTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<ScheduleEntry>>::deserialize(deserializer)?;
        let mut table = BTreeMap::new();
        for (key, entries) in raw {
            if entries.is_empty() {
                continue;
            }
            let date = parse_iso_date(&key).map_err(de::Error::custom)?;
            table
                .entry(date)
                .or_insert_with(Vec::new)
                .extend(entries);
        }
        Ok(Self(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn entry(reservation: &str, start: &str) -> ScheduleEntry {
        ScheduleEntry::new(
            "inst1",
            reservation,
            start.parse().unwrap(),
            "10:00".parse().unwrap(),
            "Jazda",
        )
    }

    #[test]
    fn removing_last_entry_drops_date_key() {
        let mut table = ScheduleTable::new();
        let first = entry("r1", "08:00");
        let id = first.id.clone();
        table.add_entry(date(1), first);
        assert_eq!(table.date_count(), 1);

        let removed = table.remove_entry(date(1), &id).expect("entry removed");
        assert_eq!(removed.reservation_id, "r1");
        assert!(table.is_empty());
        assert!(table.remove_entry(date(1), &id).is_none());
    }

    #[test]
    fn update_keeps_reservation_link() {
        let mut table = ScheduleTable::new();
        let first = entry("r1", "08:00");
        let id = first.id.clone();
        table.add_entry(date(1), first);
        let patch = EntryPatch {
            instructor_id: Some("inst2".into()),
            description: Some("Egzamin".into()),
            ..EntryPatch::default()
        };
        let updated = table.update_entry(date(1), &id, &patch).unwrap();
        assert_eq!(updated.instructor_id, "inst2");
        assert_eq!(updated.reservation_id, "r1");
        assert!(table.update_entry(date(2), &id, &patch).is_none());
    }

    #[test]
    fn remove_reservation_cleans_every_bucket() {
        let mut table = ScheduleTable::new();
        table.add_entry(date(1), entry("r1", "08:00"));
        table.add_entry(date(2), entry("r1", "08:00"));
        table.add_entry(date(2), entry("r2", "12:00"));
        assert_eq!(table.remove_reservation("r1"), 2);
        assert_eq!(table.date_count(), 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn deserialize_skips_empty_buckets() {
        let table: ScheduleTable = serde_json::from_str(r#"{"2024-03-01": []}"#).unwrap();
        assert!(table.is_empty());
    }
}
