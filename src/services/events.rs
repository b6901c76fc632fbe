use tokio::sync::broadcast;

/// What happened to a profile document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// Change notification for one profile document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChange {
    pub user_id: String,
    pub kind: ChangeKind,
}

impl ProfileChange {
    pub fn new(user_id: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
        }
    }
}

/// In-process fan-out of profile changes
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ProfileChange>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish a change; a feed with no subscribers drops it
    pub fn publish(&self, change: ProfileChange) {
        if self.sender.send(change).is_err() {
            tracing::trace!("Change published with no subscribers");
        }
    }

    /// Subscribe to subsequent changes
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: Some(self.sender.subscribe()),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Handle to a change subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    receiver: Option<broadcast::Receiver<ProfileChange>>,
}

impl Subscription {
    /// Wait for the next change.
    ///
    /// Returns `None` once unsubscribed or when the feed is gone. Events
    /// missed by a lagging subscriber are skipped.
    pub async fn recv(&mut self) -> Option<ProfileChange> {
        loop {
            let receiver = self.receiver.as_mut()?;
            match receiver.recv().await {
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!("Change subscriber lagged, skipped {} events", missed);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    self.receiver = None;
                    return None;
                }
            }
        }
    }

    /// Stop receiving changes
    pub fn unsubscribe(&mut self) {
        self.receiver = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_receives_in_order() {
        let feed = ChangeFeed::new(16);
        let mut sub = feed.subscribe();

        feed.publish(ProfileChange::new("a", ChangeKind::Created));
        feed.publish(ProfileChange::new("a", ChangeKind::Updated));

        assert_eq!(sub.recv().await, Some(ProfileChange::new("a", ChangeKind::Created)));
        assert_eq!(sub.recv().await, Some(ProfileChange::new("a", ChangeKind::Updated)));
    }

    #[tokio::test]
    async fn test_unsubscribe_releases_receiver() {
        let feed = ChangeFeed::new(16);
        let mut sub = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(feed.subscriber_count(), 0);
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_ahead() {
        let feed = ChangeFeed::new(2);
        let mut sub = feed.subscribe();

        for i in 0..5 {
            feed.publish(ProfileChange::new(i.to_string(), ChangeKind::Updated));
        }

        let next = sub.recv().await.unwrap();
        assert_eq!(next.user_id, "3");
    }
}
