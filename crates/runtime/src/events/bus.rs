//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::SyncEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Spawns, corrections, removals and full syncs
    Entities,
    /// Projectile hits and boss encounters
    Combat,
    /// Pickups and persisted progress
    Progress,
}

/// Topic-based event bus
///
/// Each topic has its own broadcast channel; a further channel carries every
/// event regardless of topic. Publishing never blocks and never fails: with
/// no subscribers the event is dropped.
#[derive(Clone)]
pub struct EventBus {
    entities: broadcast::Sender<SyncEvent>,
    combat: broadcast::Sender<SyncEvent>,
    progress: broadcast::Sender<SyncEvent>,
    all: broadcast::Sender<SyncEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entities: broadcast::channel(capacity).0,
            combat: broadcast::channel(capacity).0,
            progress: broadcast::channel(capacity).0,
            all: broadcast::channel(capacity).0,
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<SyncEvent> {
        match topic {
            Topic::Entities => &self.entities,
            Topic::Combat => &self.combat,
            Topic::Progress => &self.progress,
        }
    }

    /// Publish an event to its topic and to the all-topics channel
    pub fn publish(&self, event: SyncEvent) {
        let topic = event.topic();
        if self.channel(topic).send(event.clone()).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
        let _ = self.all.send(event);
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<SyncEvent> {
        self.channel(topic).subscribe()
    }

    /// Subscribe to every topic at once
    pub fn subscribe_all(&self) -> broadcast::Receiver<SyncEvent> {
        self.all.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumpjump_core::EntityId;

    #[tokio::test]
    async fn events_reach_topic_and_all_subscribers() {
        let bus = EventBus::with_capacity(8);
        let mut combat = bus.subscribe(Topic::Combat);
        let mut entities = bus.subscribe(Topic::Entities);
        let mut all = bus.subscribe_all();

        bus.publish(SyncEvent::EnemyDied {
            id: EntityId::new("e1"),
        });

        assert!(matches!(entities.recv().await, Ok(SyncEvent::EnemyDied { .. })));
        assert!(matches!(all.recv().await, Ok(SyncEvent::EnemyDied { .. })));
        assert!(combat.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        EventBus::new().publish(SyncEvent::SnapshotSent {
            enemies: 0,
            coins: 0,
        });
    }
}
