use chrono::Utc;

use crate::models::notifications::{NewNotification, Notification};

/// Notification feed, most recent first.
#[derive(Default)]
pub struct NotificationRepository {
    records: Vec<Notification>,
    last_id: u64,
}

impl NotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, notification: NewNotification) -> &Notification {
        self.last_id += 1;
        self.records.insert(
            0,
            Notification {
                id: self.last_id,
                category: notification.category,
                title: notification.title,
                message: notification.message,
                created_at: Utc::now(),
                read: false,
                origin: notification.origin,
            },
        );

        &self.records[0]
    }

    /// Returns `true` when an unread record was flipped. Unknown ids are
    /// ignored.
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.records.iter_mut().find(|n| n.id == id) {
            Some(record) if !record.read => {
                record.read = true;
                true
            }
            _ => false,
        }
    }

    pub fn clear_all(&mut self) {
        self.records.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|n| !n.read).count()
    }

    pub fn display_order(&self) -> Vec<&Notification> {
        unread_first(&self.records)
    }
}

/// Stable partition: unread records ahead of read ones, each group keeping
/// its relative order.
pub fn unread_first(records: &[Notification]) -> Vec<&Notification> {
    let (unread, read): (Vec<&Notification>, Vec<&Notification>) =
        records.iter().partition(|n| !n.read);

    unread.into_iter().chain(read).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notifications::{Category, Origin};
    use proptest::prelude::*;

    fn info(title: &str) -> NewNotification {
        NewNotification::new(Category::Info, title, "message")
    }

    fn record(id: u64, read: bool) -> Notification {
        Notification {
            id,
            category: Category::Info,
            title: format!("n{}", id),
            message: String::new(),
            created_at: Utc::now(),
            read,
            origin: Origin::User,
        }
    }

    #[test]
    fn append_prepends_unread_records() {
        let mut feed = NotificationRepository::new();
        feed.append(info("first"));
        let second = feed.append(NewNotification::system(Category::Security, "second", "m"));
        assert_eq!(second.origin, Origin::System);
        assert!(!second.read);

        let titles: Vec<&str> = feed.display_order().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["second", "first"]);
    }

    #[test]
    fn mark_read_is_idempotent() {
        let mut feed = NotificationRepository::new();
        let id = feed.append(info("a")).id;
        feed.append(info("b"));
        assert_eq!(feed.unread_count(), 2);

        assert!(feed.mark_read(id));
        assert_eq!(feed.unread_count(), 1);
        assert!(!feed.mark_read(id));
        assert_eq!(feed.unread_count(), 1);
        assert!(!feed.mark_read(999));
        assert_eq!(feed.unread_count(), 1);
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut feed = NotificationRepository::new();
        feed.append(info("a"));
        let before = feed.append(info("b")).id;
        feed.clear_all();
        assert!(feed.display_order().is_empty());
        assert_eq!(feed.unread_count(), 0);

        assert!(feed.append(info("c")).id > before);
    }

    #[test]
    fn feed_shows_unread_newest_first_then_read() {
        let mut feed = NotificationRepository::new();
        feed.append(info("A"));
        let b = feed.append(info("B")).id;
        feed.mark_read(b);
        feed.append(info("C"));

        let titles: Vec<&str> = feed.display_order().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["C", "A", "B"]);
    }

    #[test]
    fn unread_records_come_first_without_reordering() {
        let records = [record(1, false), record(2, true), record(3, false)];
        let ids: Vec<u64> = unread_first(&records).iter().map(|n| n.id).collect();

        assert_eq!(ids, [1, 3, 2]);
    }

    #[test]
    fn display_order_reads_from_the_feed() {
        let mut feed = NotificationRepository::new();
        let old = feed.append(info("old")).id;
        feed.append(info("new"));
        feed.mark_read(old);
        feed.append(info("newest"));

        let titles: Vec<&str> = feed.display_order().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["newest", "new", "old"]);
    }

    proptest! {
        #[test]
        fn ids_strictly_increase(count in 1usize..64) {
            let mut feed = NotificationRepository::new();
            let ids: Vec<u64> = (0..count).map(|i| feed.append(info(&i.to_string())).id).collect();

            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(feed.unread_count(), count);
        }

        #[test]
        fn partition_is_stable(flags in proptest::collection::vec(any::<bool>(), 0..32)) {
            let records: Vec<Notification> = flags
                .iter()
                .enumerate()
                .map(|(i, read)| record(i as u64, *read))
                .collect();
            let ordered = unread_first(&records);

            let split = ordered.iter().take_while(|n| !n.read).count();
            prop_assert!(ordered[split..].iter().all(|n| n.read));
            prop_assert!(ordered[..split].windows(2).all(|w| w[0].id < w[1].id));
            prop_assert!(ordered[split..].windows(2).all(|w| w[0].id < w[1].id));
            prop_assert_eq!(ordered.len(), records.len());
        }
    }
}
