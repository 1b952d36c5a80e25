//! In-memory record store.
//!
//! Images and users live in two independent maps guarded by a single lock.
//! Every public method is one critical section, so callers never observe a
//! half-applied change. Records handed out are clones; the store stays the
//! only owner of the stored values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use uuid::Uuid;

/// A generated cat image as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub thumbnail_url: Option<String>,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for [`Store::create_image`].
#[derive(Debug, Clone, Default)]
pub struct NewImage {
    pub title: String,
    pub image_url: String,
    /// Falls back to `image_url` when absent.
    pub thumbnail_url: Option<String>,
    /// Falls back to `false` when absent.
    pub liked: Option<bool>,
}

impl NewImage {
    pub fn new(title: &str, image_url: &str) -> Self {
        NewImage {
            title: title.to_string(),
            image_url: image_url.to_string(),
            thumbnail_url: None,
            liked: None,
        }
    }

    pub fn with_thumbnail_url(mut self, url: &str) -> Self {
        self.thumbnail_url = Some(url.to_string());
        self
    }

    pub fn with_liked(mut self, liked: bool) -> Self {
        self.liked = Some(liked);
        self
    }
}

/// Partial update applied by [`Store::update_image`].
///
/// Decoding rejects any field other than `liked` and `title`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageUpdate {
    #[serde(default)]
    pub liked: Option<bool>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ImageUpdate {
    fn apply(self, record: &mut ImageRecord) {
        if let Some(liked) = self.liked {
            record.liked = liked;
        }
        if let Some(title) = self.title {
            record.title = title;
        }
    }
}

/// A stored user. The password is kept exactly as supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

/// Input for [`Store::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
struct Entry<T> {
    /// Insertion sequence number, used to order equal timestamps.
    seq: u64,
    record: T,
}

#[derive(Debug, Default)]
struct Collections {
    next_seq: u64,
    images: HashMap<Uuid, Entry<ImageRecord>>,
    users: HashMap<Uuid, Entry<UserRecord>>,
}

impl Collections {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// Shared handle to the in-memory collections.
///
/// Cloning is cheap and every clone sees the same records.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Collections>>,
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    // Every critical section leaves both maps consistent, so a panic while
    // holding the lock cannot corrupt them and poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts a new image record and returns it.
    ///
    /// A fresh id is generated and `created_at` is stamped with the current time.
    pub fn create_image(&self, input: NewImage) -> ImageRecord {
        let record = ImageRecord {
            id: Uuid::new_v4(),
            thumbnail_url: Some(
                input
                    .thumbnail_url
                    .unwrap_or_else(|| input.image_url.clone()),
            ),
            title: input.title,
            image_url: input.image_url,
            liked: input.liked.unwrap_or(false),
            created_at: Utc::now(),
        };

        let mut collections = self.write();
        let seq = collections.next_seq();
        collections.images.insert(
            record.id,
            Entry {
                seq,
                record: record.clone(),
            },
        );

        record
    }

    /// Returns every image, newest first.
    ///
    /// Records sharing a timestamp are ordered by insertion, latest first.
    pub fn list_images(&self) -> Vec<ImageRecord> {
        let collections = self.read();
        let mut entries: Vec<&Entry<ImageRecord>> = collections.images.values().collect();
        entries.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        entries.into_iter().map(|e| e.record.clone()).collect()
    }

    pub fn get_image(&self, id: &Uuid) -> Option<ImageRecord> {
        self.read().images.get(id).map(|e| e.record.clone())
    }

    /// Merges `update` onto the stored record, leaving absent fields untouched.
    ///
    /// Returns `None` if no image has this id.
    pub fn update_image(&self, id: &Uuid, update: ImageUpdate) -> Option<ImageRecord> {
        let mut collections = self.write();
        let entry = collections.images.get_mut(id)?;
        update.apply(&mut entry.record);

        Some(entry.record.clone())
    }

    /// Removes the image if present and reports whether anything was removed.
    pub fn delete_image(&self, id: &Uuid) -> bool {
        self.write().images.remove(id).is_some()
    }

    pub fn image_count(&self) -> usize {
        self.read().images.len()
    }

    /// Inserts a user. Duplicate usernames are accepted.
    pub fn create_user(&self, input: NewUser) -> UserRecord {
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: input.username,
            password: input.password,
        };

        let mut collections = self.write();
        let seq = collections.next_seq();
        collections.users.insert(
            record.id,
            Entry {
                seq,
                record: record.clone(),
            },
        );

        record
    }

    pub fn get_user(&self, id: &Uuid) -> Option<UserRecord> {
        self.read().users.get(id).map(|e| e.record.clone())
    }

    /// Finds a user by exact username match.
    ///
    /// When several users share the name, the earliest inserted one wins.
    pub fn get_user_by_username(&self, username: &str) -> Option<UserRecord> {
        self.read()
            .users
            .values()
            .filter(|e| e.record.username == username)
            .min_by_key(|e| e.seq)
            .map(|e| e.record.clone())
    }
}
