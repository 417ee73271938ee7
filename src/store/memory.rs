use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::errors::{AppError, Result};
use crate::models::{AdoptionRequest, FoodRequest, Listing, Notification, Pickup};

/// Row plus the sequence number it was inserted with
type Table<T> = DashMap<String, (u64, T)>;

#[derive(Default)]
struct Tables {
    seq: AtomicU64,
    listings: Table<Listing>,
    requests: Table<AdoptionRequest>,
    pickups: Table<Pickup>,
    food_requests: Table<FoodRequest>,
    notifications: Table<Notification>,
}

/// Process-local store, selected with `DATABASE_URL=memory`
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.tables.seq.fetch_add(1, Ordering::Relaxed)
    }

    fn insert<T: Clone>(&self, table: &Table<T>, entity: &str, id: &str, row: &T) -> Result<()> {
        match table.entry(id.to_string()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "A {} with id '{}' already exists",
                entity, id
            ))),
            Entry::Vacant(slot) => {
                slot.insert((self.next_seq(), row.clone()));
                Ok(())
            }
        }
    }

    pub fn list_listings(&self) -> Vec<Listing> {
        in_insertion_order(&self.tables.listings)
    }

    pub fn insert_listing(&self, listing: &Listing) -> Result<()> {
        self.insert(&self.tables.listings, "listing", &listing.id, listing)
    }

    pub fn list_requests(&self) -> Vec<AdoptionRequest> {
        in_insertion_order(&self.tables.requests)
    }

    pub fn insert_request(&self, request: &AdoptionRequest) -> Result<Option<Notification>> {
        self.insert(&self.tables.requests, "request", &request.id, request)?;

        let notification = self
            .tables
            .listings
            .get(&request.listing_id)
            .map(|row| Notification::adoption_request(&row.value().1, request));

        if let Some(notification) = &notification {
            self.insert(
                &self.tables.notifications,
                "notification",
                &notification.id,
                notification,
            )?;
        }
        Ok(notification)
    }

    pub fn list_pickups(&self) -> Vec<Pickup> {
        in_insertion_order(&self.tables.pickups)
    }

    pub fn insert_pickup(&self, pickup: &Pickup) -> Result<()> {
        self.insert(&self.tables.pickups, "pickup", &pickup.id, pickup)
    }

    pub fn list_food_requests(&self) -> Vec<FoodRequest> {
        in_insertion_order(&self.tables.food_requests)
    }

    pub fn insert_food_request(&self, food_request: &FoodRequest) -> Result<()> {
        self.insert(
            &self.tables.food_requests,
            "food request",
            &food_request.id,
            food_request,
        )
    }

    pub fn list_notifications(&self, contact: Option<&str>) -> Vec<Notification> {
        let mut rows: Vec<(u64, Notification)> = self
            .tables
            .notifications
            .iter()
            .filter(|row| contact.map_or(true, |c| row.value().1.user_contact == c))
            .map(|row| row.value().clone())
            .collect();

        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });
        rows.into_iter().map(|(_, n)| n).collect()
    }

    pub fn mark_notifications_read(&self, ids: &[String]) {
        for id in ids {
            if let Some(mut row) = self.tables.notifications.get_mut(id) {
                row.value_mut().1.read = 1;
            }
        }
    }
}

fn in_insertion_order<T: Clone>(table: &Table<T>) -> Vec<T> {
    let mut rows: Vec<(u64, T)> = table.iter().map(|row| row.value().clone()).collect();
    rows.sort_by_key(|(seq, _)| *seq);
    rows.into_iter().map(|(_, row)| row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn listing(id: &str, contact: &str) -> Listing {
        Listing {
            id: id.to_string(),
            animal_type: "Dog".to_string(),
            name: "Bantay".to_string(),
            desc: String::new(),
            img: String::new(),
            contact: contact.to_string(),
            lat: 10.31,
            lng: 123.89,
            created_at: Utc::now(),
        }
    }

    fn request(id: &str, listing_id: &str, contact: &str) -> AdoptionRequest {
        AdoptionRequest {
            id: id.to_string(),
            listing_id: listing_id.to_string(),
            message: "I have a big yard".to_string(),
            contact: contact.to_string(),
            lat: 10.32,
            lng: 123.9,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn lists_in_insertion_order() {
        let store = MemoryStore::new();
        for id in ["c", "a", "b"] {
            store.insert_listing(&listing(id, "owner")).unwrap();
        }
        let ids: Vec<_> = store.list_listings().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn duplicate_ids_conflict() {
        let store = MemoryStore::new();
        store.insert_listing(&listing("x", "owner")).unwrap();
        let err = store.insert_listing(&listing("x", "other")).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.list_listings().len(), 1);
    }

    #[test]
    fn request_for_known_listing_notifies_owner() {
        let store = MemoryStore::new();
        store.insert_listing(&listing("l1", "owner@example.com")).unwrap();

        let notification = store
            .insert_request(&request("r1", "l1", "adopter@example.com"))
            .unwrap()
            .expect("owner should be notified");

        assert_eq!(notification.user_contact, "owner@example.com");
        assert_eq!(
            notification.message,
            "New adoption request for Dog • Bantay from adopter@example.com"
        );
        assert_eq!(store.list_notifications(Some("owner@example.com")).len(), 1);
    }

    #[test]
    fn request_for_unknown_listing_is_stored_without_notification() {
        let store = MemoryStore::new();
        let notification = store.insert_request(&request("r1", "missing", "a")).unwrap();
        assert!(notification.is_none());
        assert_eq!(store.list_requests().len(), 1);
        assert!(store.list_notifications(None).is_empty());
    }

    #[test]
    fn notifications_are_newest_first_and_filterable() {
        let store = MemoryStore::new();
        let now = Utc::now();
        for (id, contact, age) in [("n1", "ana", 3), ("n2", "ben", 2), ("n3", "ana", 1)] {
            let n = Notification {
                id: id.to_string(),
                user_contact: contact.to_string(),
                message: format!("message {id}"),
                created_at: now - Duration::minutes(age),
                read: 0,
            };
            store
                .insert(&store.tables.notifications, "notification", id, &n)
                .unwrap();
        }

        let all: Vec<_> = store.list_notifications(None).into_iter().map(|n| n.id).collect();
        assert_eq!(all, vec!["n3", "n2", "n1"]);

        let ana: Vec<_> = store
            .list_notifications(Some("ana"))
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ana, vec!["n3", "n1"]);
    }

    #[test]
    fn mark_read_ignores_unknown_ids() {
        let store = MemoryStore::new();
        store.insert_listing(&listing("l1", "owner")).unwrap();
        let n = store.insert_request(&request("r1", "l1", "a")).unwrap().unwrap();

        store.mark_notifications_read(&[n.id.clone(), "nope".to_string()]);

        let stored = store.list_notifications(Some("owner"));
        assert_eq!(stored[0].read, 1);
    }
}
