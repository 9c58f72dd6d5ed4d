use std::collections::HashSet;

use serde::de::DeserializeOwned;
use station_db::KvStore;
use station_types::validation::{validate_channel_name, validate_nickname};
use station_types::{Channel, User, UserDraft, World};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::import::ImportPayload;
use crate::merge::{NaturalKey, merge};

/// Store key holding the user array.
pub const USERS_KEY: &str = "station_v_users";
/// Store key holding the channel array.
pub const CHANNELS_KEY: &str = "station_v_channels";

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// How many records an import wrote, after duplicates within the file collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub users: usize,
    pub channels: usize,
}

/// The roster: every user and channel, kept in insertion order.
///
/// Every mutation builds the next state, writes it to the store, and only then
/// replaces the in-memory state. A failed write leaves both untouched.
pub struct Repository<S> {
    store: S,
    users: Vec<User>,
    channels: Vec<Channel>,
}

impl<S: KvStore> Repository<S> {
    /// Loads both collections. A missing or unreadable key starts empty.
    pub fn load(store: S) -> Self {
        let users: Vec<User> = load_collection(&store, USERS_KEY);
        let channels: Vec<Channel> = load_collection(&store, CHANNELS_KEY);
        info!("Loaded {} users and {} channels", users.len(), channels.len());
        Self {
            store,
            users,
            channels,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn nicknames(&self) -> Vec<String> {
        self.users.iter().map(|u| u.nickname.clone()).collect()
    }

    pub fn world(&self) -> World {
        World {
            users: self.users.clone(),
            channels: self.channels.clone(),
        }
    }

    // -- Users --

    /// Replaces the user with the same id in place, or appends it.
    pub fn upsert_user(&mut self, user: User) -> Result<()> {
        let mut users = self.users.clone();
        upsert_by_id(&mut users, user, |u| &u.id);
        self.commit(Some(users), None)
    }

    /// Saves a new user from the form, after validating its nickname.
    pub fn create_user(&mut self, draft: UserDraft) -> Result<User> {
        validate_nickname(
            &draft.nickname,
            self.users.iter().map(|u| u.nickname.as_str()),
            None,
        )?;
        let user = draft.into_user(new_id());
        self.upsert_user(user.clone())?;
        debug!("Created user {} ({})", user.nickname, user.id);
        Ok(user)
    }

    /// Saves an edited user. It may keep its own nickname.
    pub fn update_user(&mut self, user: User) -> Result<()> {
        let current = self
            .user(&user.id)
            .ok_or_else(|| RepositoryError::UnknownUser(user.id.clone()))?;
        validate_nickname(
            &user.nickname,
            self.users.iter().map(|u| u.nickname.as_str()),
            Some(&current.nickname),
        )?;
        self.upsert_user(user)
    }

    /// Adds a batch of generated candidates under fresh ids. No validation.
    pub fn add_users(&mut self, drafts: Vec<UserDraft>) -> Result<Vec<User>> {
        let added: Vec<User> = drafts.into_iter().map(|d| d.into_user(new_id())).collect();
        let mut users = self.users.clone();
        users.extend(added.iter().cloned());
        self.commit(Some(users), None)?;
        info!("Added {} users", added.len());
        Ok(added)
    }

    /// Removes the user and its membership in every channel, as one write.
    /// Returns whether the user existed.
    pub fn remove_user(&mut self, id: &str) -> Result<bool> {
        let existed = self.users.iter().any(|u| u.id == id);
        let member_anywhere = self.channels.iter().any(|c| c.has_member(id));
        if !existed && !member_anywhere {
            return Ok(false);
        }

        let users: Vec<User> = self.users.iter().filter(|u| u.id != id).cloned().collect();
        let channels: Vec<Channel> = self
            .channels
            .iter()
            .map(|c| Channel {
                users: c.users.iter().filter(|uid| *uid != id).cloned().collect(),
                ..c.clone()
            })
            .collect();

        self.commit(Some(users), member_anywhere.then_some(channels))?;
        debug!("Removed user {}", id);
        Ok(existed)
    }

    // -- Channels --

    pub fn upsert_channel(&mut self, channel: Channel) -> Result<()> {
        let mut channels = self.channels.clone();
        upsert_by_id(&mut channels, channel, |c| &c.id);
        self.commit(None, Some(channels))
    }

    /// Saves a new channel from the form. Duplicate member ids are dropped.
    pub fn create_channel(
        &mut self,
        name: &str,
        topic: &str,
        members: Vec<String>,
    ) -> Result<Channel> {
        validate_channel_name(name)?;
        let channel = Channel {
            id: new_id(),
            name: name.to_string(),
            topic: topic.to_string(),
            users: dedup(members),
        };
        self.upsert_channel(channel.clone())?;
        Ok(channel)
    }

    pub fn update_channel(&mut self, mut channel: Channel) -> Result<()> {
        if self.channel(&channel.id).is_none() {
            return Err(RepositoryError::UnknownChannel(channel.id));
        }
        validate_channel_name(&channel.name)?;
        channel.users = dedup(channel.users);
        self.upsert_channel(channel)
    }

    /// Removes the channel only; users are untouched.
    pub fn remove_channel(&mut self, id: &str) -> Result<bool> {
        if self.channel(id).is_none() {
            return Ok(false);
        }
        let channels = self.channels.iter().filter(|c| c.id != id).cloned().collect();
        self.commit(None, Some(channels))?;
        Ok(true)
    }

    pub fn clear_channels(&mut self) -> Result<()> {
        self.commit(None, Some(Vec::new()))
    }

    /// Drops channel members that no longer name an existing user.
    /// Returns how many memberships were removed.
    pub fn prune_dangling_members(&mut self) -> Result<usize> {
        let known: HashSet<&str> = self.users.iter().map(|u| u.id.as_str()).collect();
        let mut removed = 0;
        let channels: Vec<Channel> = self
            .channels
            .iter()
            .map(|c| {
                let users: Vec<String> = c
                    .users
                    .iter()
                    .filter(|uid| known.contains(uid.as_str()))
                    .cloned()
                    .collect();
                removed += c.users.len() - users.len();
                Channel { users, ..c.clone() }
            })
            .collect();

        if removed > 0 {
            self.commit(None, Some(channels))?;
            info!("Pruned {} dangling channel memberships", removed);
        }
        Ok(removed)
    }

    // -- Import --

    /// Merges users by nickname, last write wins.
    /// Returns how many distinct records were written.
    pub fn merge_users(&mut self, incoming: Vec<User>) -> Result<usize> {
        let applied = distinct_records(&incoming);
        let users = merge(self.users.clone(), incoming);
        self.commit(Some(users), None)?;
        Ok(applied)
    }

    /// Merges users by nickname and channels by name, in one write.
    pub fn merge_world(&mut self, world: World) -> Result<ImportSummary> {
        let summary = ImportSummary {
            users: distinct_records(&world.users),
            channels: distinct_records(&world.channels),
        };
        let users = merge(self.users.clone(), world.users);
        let channels = merge(self.channels.clone(), world.channels);
        self.commit(Some(users), Some(channels))?;
        Ok(summary)
    }

    pub fn apply_import(&mut self, payload: ImportPayload) -> Result<ImportSummary> {
        let summary = match payload {
            ImportPayload::World(world) => self.merge_world(world)?,
            ImportPayload::Users(users) => ImportSummary {
                users: self.merge_users(users)?,
                channels: 0,
            },
        };
        info!(
            "Imported {} users and {} channels",
            summary.users, summary.channels
        );
        Ok(summary)
    }

    fn commit(&mut self, users: Option<Vec<User>>, channels: Option<Vec<Channel>>) -> Result<()> {
        let mut entries: Vec<(&str, String)> = Vec::with_capacity(2);
        if let Some(users) = &users {
            entries.push((USERS_KEY, serde_json::to_string(users)?));
        }
        if let Some(channels) = &channels {
            entries.push((CHANNELS_KEY, serde_json::to_string(channels)?));
        }
        if entries.is_empty() {
            return Ok(());
        }

        self.store.set_many(&entries).map_err(|e| {
            warn!("Failed to save roster: {}", e);
            RepositoryError::Persist(e)
        })?;

        if let Some(users) = users {
            self.users = users;
        }
        if let Some(channels) = channels {
            self.channels = channels;
        }
        Ok(())
    }
}

fn load_collection<S: KvStore, T: DeserializeOwned>(store: &S, key: &str) -> Vec<T> {
    match store.get(key) {
        Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Ignoring corrupt {} entry: {}", key, e);
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Error loading {}: {}", key, e);
            Vec::new()
        }
    }
}

fn upsert_by_id<T>(records: &mut Vec<T>, record: T, id: impl Fn(&T) -> &String) {
    match records.iter().position(|r| id(r) == id(&record)) {
        Some(pos) => records[pos] = record,
        None => records.push(record),
    }
}

fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Records left once `incoming` is merged with itself.
fn distinct_records<T: NaturalKey + Clone>(incoming: &[T]) -> usize {
    merge(Vec::new(), incoming.iter().cloned()).len()
}
