//! Last-write-wins merge keyed by a record's natural key.
//!
//! Imported files are reconciled with the local roster by nickname (users)
//! and name (channels) rather than by id, so hand-edited or independently
//! generated files line up with what is already there.

use std::collections::HashMap;
use std::hash::Hash;

use station_types::{Channel, User};

/// A record that can be matched across import/export boundaries.
pub trait NaturalKey {
    type Key: Eq + Hash;

    fn natural_key(&self) -> Self::Key;

    fn record_id(&self) -> &str;
}

impl NaturalKey for User {
    type Key = String;

    fn natural_key(&self) -> String {
        self.nickname.clone()
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl NaturalKey for Channel {
    type Key = String;

    fn natural_key(&self) -> String {
        self.name.clone()
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Merges with the record type's own natural key.
pub fn merge<T: NaturalKey>(existing: Vec<T>, incoming: impl IntoIterator<Item = T>) -> Vec<T> {
    merge_by(existing, incoming, T::natural_key, |r| r.record_id().to_string())
}

/// Merges `incoming` into `existing`, in input order.
///
/// An incoming record replaces, whole, the record holding the same key, in its
/// position; a new key is appended. Within `incoming` the later of two equal
/// keys wins. Ids stay unique: a record whose id is taken over by an incoming
/// record with a different key is dropped.
pub fn merge_by<T, K, FK, FI>(
    existing: Vec<T>,
    incoming: impl IntoIterator<Item = T>,
    key: FK,
    id: FI,
) -> Vec<T>
where
    K: Eq + Hash,
    FK: Fn(&T) -> K,
    FI: Fn(&T) -> String,
{
    let mut slots: Vec<Option<T>> = Vec::with_capacity(existing.len());
    let mut by_key: HashMap<K, usize> = HashMap::new();

    for record in existing {
        let k = key(&record);
        match by_key.get(&k) {
            Some(&pos) => slots[pos] = Some(record),
            None => {
                by_key.insert(k, slots.len());
                slots.push(Some(record));
            }
        }
    }

    let mut by_id: HashMap<String, usize> = slots
        .iter()
        .enumerate()
        .filter_map(|(pos, slot)| slot.as_ref().map(|r| (id(r), pos)))
        .collect();

    for record in incoming {
        let k = key(&record);
        let rid = id(&record);

        let pos = match by_key.get(&k) {
            Some(&pos) => pos,
            None => {
                by_key.insert(k, slots.len());
                slots.push(None);
                slots.len() - 1
            }
        };

        if let Some(&other) = by_id.get(&rid) {
            if other != pos {
                if let Some(evicted) = slots[other].take() {
                    by_key.remove(&key(&evicted));
                }
            }
        }

        if let Some(replaced) = slots[pos].as_ref() {
            let replaced_id = id(replaced);
            if by_id.get(&replaced_id) == Some(&pos) {
                by_id.remove(&replaced_id);
            }
        }

        by_id.insert(rid, pos);
        slots[pos] = Some(record);
    }

    slots.into_iter().flatten().collect()
}
