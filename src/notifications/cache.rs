//! Per-session notification cache with unread accounting
//!
//! The cache is an ordered sequence (newest first) with unique ids. The
//! unread counter is never tracked incrementally: every mutation recomputes
//! it from the entries, so concurrent push and read events cannot drift it.

use chrono::Utc;
use uuid::Uuid;

use super::model::Notification;

/// Ordered notification mirror, owned exclusively by the channel
#[derive(Debug, Default)]
pub struct NotificationCache {
    entries: Vec<Notification>,
    unread_count: usize,
}

impl NotificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries, newest first
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.entries.iter().any(|n| n.id == id)
    }

    /// Prepend a pushed notification. Duplicate delivery of the same id is a
    /// no-op so redelivered events never double-count; returns whether the
    /// entry was inserted.
    pub fn push(&mut self, notification: Notification) -> bool {
        if self.contains(notification.id) {
            return false;
        }
        self.entries.insert(0, notification);
        self.recount();
        true
    }

    /// Mark one entry read. Idempotent; returns whether anything changed.
    pub fn mark_read(&mut self, id: Uuid) -> bool {
        let changed = match self.entries.iter_mut().find(|n| n.id == id) {
            Some(entry) if !entry.is_read => {
                entry.is_read = true;
                entry.read_at = Some(Utc::now());
                true
            }
            _ => false,
        };
        self.recount();
        changed
    }

    /// Mark every entry read; returns how many entries flipped
    pub fn mark_all_read(&mut self) -> usize {
        let mut flipped = 0;
        let now = Utc::now();
        for entry in &mut self.entries {
            if !entry.is_read {
                entry.is_read = true;
                entry.read_at = Some(now);
                flipped += 1;
            }
        }
        self.recount();
        flipped
    }

    /// Remove an entry by id
    pub fn remove(&mut self, id: Uuid) -> Option<Notification> {
        let index = self.entries.iter().position(|n| n.id == id)?;
        let removed = self.entries.remove(index);
        self.recount();
        Some(removed)
    }

    /// Wholesale replacement from the backlog endpoint. The server's unread
    /// count is authoritative here: unread notifications can predate the
    /// fetched window.
    pub fn replace_all(&mut self, entries: Vec<Notification>, server_unread: usize) {
        self.entries = entries;
        self.unread_count = server_unread;
    }

    fn recount(&mut self) {
        self.unread_count = self.entries.iter().filter(|n| !n.is_read).count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::model::{NotificationType, Priority};

    fn notification(id: Uuid, is_read: bool) -> Notification {
        Notification {
            id,
            kind: NotificationType::Generic,
            priority: Priority::Normal,
            title: "Test".to_string(),
            message: "Test message".to_string(),
            data: None,
            is_read,
            created_at: Utc::now(),
            read_at: None,
        }
    }

    #[test]
    fn test_push_prepends_and_counts() {
        let mut cache = NotificationCache::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        assert!(cache.push(notification(first, false)));
        assert!(cache.push(notification(second, false)));

        assert_eq!(cache.entries()[0].id, second);
        assert_eq!(cache.entries()[1].id, first);
        assert_eq!(cache.unread_count(), 2);
    }

    #[test]
    fn test_duplicate_push_is_noop() {
        let mut cache = NotificationCache::new();
        let id = Uuid::new_v4();

        assert!(cache.push(notification(id, false)));
        assert!(!cache.push(notification(id, false)));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.unread_count(), 1);
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let mut cache = NotificationCache::new();
        let id = Uuid::new_v4();
        cache.push(notification(id, false));

        assert!(cache.mark_read(id));
        assert!(!cache.mark_read(id));
        assert!(!cache.mark_read(Uuid::new_v4()));

        assert_eq!(cache.unread_count(), 0);
        assert!(cache.entries()[0].read_at.is_some());
    }

    #[test]
    fn test_mark_all_read() {
        let mut cache = NotificationCache::new();
        cache.push(notification(Uuid::new_v4(), false));
        cache.push(notification(Uuid::new_v4(), true));
        cache.push(notification(Uuid::new_v4(), false));

        assert_eq!(cache.mark_all_read(), 2);
        assert_eq!(cache.unread_count(), 0);
        assert!(cache.entries().iter().all(|n| n.is_read));
    }

    #[test]
    fn test_remove_recounts() {
        let mut cache = NotificationCache::new();
        let unread = Uuid::new_v4();
        let read = Uuid::new_v4();
        cache.push(notification(unread, false));
        cache.push(notification(read, true));

        assert!(cache.remove(unread).is_some());
        assert_eq!(cache.unread_count(), 0);
        assert!(cache.remove(unread).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_replace_all_adopts_server_count() {
        let mut cache = NotificationCache::new();
        cache.push(notification(Uuid::new_v4(), false));

        // Server reports more unread than the window holds
        cache.replace_all(vec![notification(Uuid::new_v4(), false)], 7);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.unread_count(), 7);
    }

    #[test]
    fn test_invariant_holds_after_mutation_sequences() {
        let mut cache = NotificationCache::new();
        let ids: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();

        for id in &ids {
            cache.push(notification(*id, false));
        }
        cache.mark_read(ids[0]);
        cache.remove(ids[1]);
        cache.push(notification(ids[1], false)); // re-delivery after delete
        cache.mark_all_read();
        cache.push(notification(Uuid::new_v4(), false));
        cache.remove(ids[2]);

        let recount = cache.entries().iter().filter(|n| !n.is_read).count();
        assert_eq!(cache.unread_count(), recount);
    }
}
