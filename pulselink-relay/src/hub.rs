use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use pulselink_core::models::{ConnectionId, RoomCode};

use crate::events::ServerEvent;

/// Sender half of a connection's event channel.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Whether both partners are present for the given member count.
#[must_use]
pub const fn partner_present(member_count: usize) -> bool {
    member_count >= 2
}

/// A connection subscribed to a room.
#[derive(Debug, Clone)]
struct Subscriber {
    connection_id: ConnectionId,
    sender: EventSender,
}

/// In-memory registry mapping room codes to the connections currently
/// joined, with event fan-out.
///
/// One instance per process, owned by the API state and passed by
/// reference; rooms are not shared across instances. A room exists only
/// while it has at least one subscriber.
#[derive(Clone)]
pub struct PresenceHub {
    /// Map of room code -> subscribers currently joined
    rooms: Arc<DashMap<RoomCode, Vec<Subscriber>>>,

    /// Map of connection id -> rooms it joined, for disconnect cleanup
    connections: Arc<DashMap<ConnectionId, Vec<RoomCode>>>,
}

impl PresenceHub {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            connections: Arc::new(DashMap::new()),
        }
    }

    /// Add a connection to a room and return the member count after the
    /// join.
    ///
    /// Idempotent: re-joining an already-joined connection neither
    /// double-counts nor registers a second sender.
    pub fn join(&self, room: RoomCode, connection_id: &ConnectionId, sender: EventSender) -> usize {
        let count = {
            let mut subscribers = self.rooms.entry(room.clone()).or_default();
            if !subscribers
                .iter()
                .any(|s| &s.connection_id == connection_id)
            {
                subscribers.push(Subscriber {
                    connection_id: connection_id.clone(),
                    sender,
                });
            }
            subscribers.len()
        };

        let mut joined = self.connections.entry(connection_id.clone()).or_default();
        if !joined.contains(&room) {
            joined.push(room.clone());
        }
        drop(joined);

        info!(
            room = %room,
            connection_id = %connection_id,
            members = count,
            "Connection joined room"
        );

        count
    }

    /// Remove a connection from every room it joined.
    ///
    /// Returns each affected room paired with its member count after the
    /// removal. The departing connection is out of the subscriber list
    /// before the count is taken, so it is never included, and it receives
    /// no further events. Rooms left empty are pruned.
    pub fn leave_all(&self, connection_id: &ConnectionId) -> Vec<(RoomCode, usize)> {
        let Some((_, joined)) = self.connections.remove(connection_id) else {
            return Vec::new();
        };

        let mut affected = Vec::with_capacity(joined.len());
        for room in joined {
            if let Some(mut subscribers) = self.rooms.get_mut(&room) {
                subscribers.retain(|s| &s.connection_id != connection_id);
                let count = subscribers.len();
                if count == 0 {
                    drop(subscribers);
                    self.rooms.remove(&room);
                    debug!(room = %room, "Room has no more members, pruned");
                }
                affected.push((room, count));
            }
        }

        info!(
            connection_id = %connection_id,
            rooms = affected.len(),
            "Connection left all rooms"
        );

        affected
    }

    /// Send an event to every member of a room. Returns the number of
    /// members reached.
    pub fn broadcast(&self, room: &RoomCode, event: &ServerEvent) -> usize {
        self.send_filtered(room, event, |_| true)
    }

    /// Send an event to every member of a room except one. Used for pulse
    /// coordinates, which are never echoed back to their sender.
    pub fn broadcast_except(
        &self,
        room: &RoomCode,
        except: &ConnectionId,
        event: &ServerEvent,
    ) -> usize {
        self.send_filtered(room, event, |id| id != except)
    }

    fn send_filtered(
        &self,
        room: &RoomCode,
        event: &ServerEvent,
        include: impl Fn(&ConnectionId) -> bool,
    ) -> usize {
        let mut sent = 0;
        let mut dead = Vec::new();

        if let Some(subscribers) = self.rooms.get(room) {
            for subscriber in subscribers.iter().filter(|s| include(&s.connection_id)) {
                if subscriber.sender.send(event.clone()).is_ok() {
                    sent += 1;
                } else {
                    warn!(
                        room = %room,
                        connection_id = %subscriber.connection_id,
                        "Subscriber channel closed, dropping from room"
                    );
                    dead.push(subscriber.connection_id.clone());
                }
            }
        }

        // Sweep closed channels outside the read guard. Only the room
        // entry is touched; the connection index stays until the
        // transport-level disconnect runs its own cleanup.
        for connection_id in dead {
            self.drop_subscriber(room, &connection_id);
        }

        sent
    }

    fn drop_subscriber(&self, room: &RoomCode, connection_id: &ConnectionId) {
        if let Some(mut subscribers) = self.rooms.get_mut(room) {
            subscribers.retain(|s| &s.connection_id != connection_id);
            if subscribers.is_empty() {
                drop(subscribers);
                self.rooms.remove(room);
                debug!(room = %room, "Room has no more members, pruned");
            }
        }
    }

    /// Number of members currently joined to a room
    #[must_use]
    pub fn member_count(&self, room: &RoomCode) -> usize {
        self.rooms.get(room).map_or(0, |subscribers| subscribers.len())
    }

    /// Number of rooms with at least one member
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of connections that have joined at least one room
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for PresenceHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (EventSender, mpsc::UnboundedReceiver<ServerEvent>) {
        mpsc::unbounded_channel()
    }

    fn room(code: &str) -> RoomCode {
        RoomCode::new(code)
    }

    #[tokio::test]
    async fn test_join_counts_members() {
        let hub = PresenceHub::new();
        let alice = ConnectionId::new();
        let bob = ConnectionId::new();
        let (tx_a, _rx_a) = channel();
        let (tx_b, _rx_b) = channel();

        assert_eq!(hub.join(room("love42"), &alice, tx_a), 1);
        assert_eq!(hub.join(room("LOVE42"), &bob, tx_b), 2);

        assert_eq!(hub.member_count(&room("love42")), 2);
        assert_eq!(hub.room_count(), 1);
        assert_eq!(hub.connection_count(), 2);
    }

    #[tokio::test]
    async fn test_join_is_idempotent() {
        let hub = PresenceHub::new();
        let alice = ConnectionId::new();
        let (tx, _rx) = channel();

        assert_eq!(hub.join(room("love42"), &alice, tx.clone()), 1);
        assert_eq!(hub.join(room("love42"), &alice, tx), 1);

        assert_eq!(hub.member_count(&room("love42")), 1);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_member() {
        let hub = PresenceHub::new();
        let alice = ConnectionId::new();
        let bob = ConnectionId::new();
        let (tx_a, mut rx_a) = channel();
        let (tx_b, mut rx_b) = channel();

        hub.join(room("love42"), &alice, tx_a);
        hub.join(room("love42"), &bob, tx_b);

        let event = ServerEvent::ReceiveGift {
            emoji: "🎉".to_string(),
        };
        assert_eq!(hub.broadcast(&room("love42"), &event), 2);

        assert_eq!(rx_a.recv().await, Some(event.clone()));
        assert_eq!(rx_b.recv().await, Some(event));
    }

    #[tokio::test]
    async fn test_broadcast_except_skips_the_sender() {
        let hub = PresenceHub::new();
        let alice = ConnectionId::new();
        let bob = ConnectionId::new();
        let (tx_a, mut rx_a) = channel();
        let (tx_b, mut rx_b) = channel();

        hub.join(room("love42"), &alice, tx_a);
        hub.join(room("love42"), &bob, tx_b);

        let event = ServerEvent::ReceivePulse { x: 0.4, y: 0.6 };
        assert_eq!(hub.broadcast_except(&room("love42"), &alice, &event), 1);

        assert_eq!(rx_b.recv().await, Some(event));
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_leave_all_reports_post_removal_counts() {
        let hub = PresenceHub::new();
        let alice = ConnectionId::new();
        let bob = ConnectionId::new();
        let (tx_a, _rx_a) = channel();
        let (tx_b, _rx_b) = channel();

        hub.join(room("love42"), &alice, tx_a);
        hub.join(room("love42"), &bob, tx_b);

        let affected = hub.leave_all(&alice);

        assert_eq!(affected, vec![(room("love42"), 1)]);
        assert_eq!(hub.member_count(&room("love42")), 1);
        assert_eq!(hub.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_leave_all_covers_every_joined_room() {
        let hub = PresenceHub::new();
        let alice = ConnectionId::new();
        let (tx, _rx) = channel();

        hub.join(room("love42"), &alice, tx.clone());
        hub.join(room("other1"), &alice, tx);

        let mut affected = hub.leave_all(&alice);
        affected.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));

        assert_eq!(affected, vec![(room("love42"), 0), (room("other1"), 0)]);
        assert_eq!(hub.room_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_room_is_pruned() {
        let hub = PresenceHub::new();
        let alice = ConnectionId::new();
        let (tx, _rx) = channel();

        hub.join(room("love42"), &alice, tx);
        assert_eq!(hub.room_count(), 1);

        hub.leave_all(&alice);

        assert_eq!(hub.room_count(), 0);
        assert_eq!(hub.member_count(&room("love42")), 0);
    }

    #[tokio::test]
    async fn test_leave_all_for_unknown_connection_is_empty() {
        let hub = PresenceHub::new();

        assert!(hub.leave_all(&ConnectionId::new()).is_empty());
    }

    #[tokio::test]
    async fn test_closed_channel_is_swept_on_broadcast() {
        let hub = PresenceHub::new();
        let alice = ConnectionId::new();
        let bob = ConnectionId::new();
        let (tx_a, mut rx_a) = channel();
        let (tx_b, rx_b) = channel();

        hub.join(room("love42"), &alice, tx_a);
        hub.join(room("love42"), &bob, tx_b);
        drop(rx_b);

        let event = ServerEvent::UpdateCount(6);
        assert_eq!(hub.broadcast(&room("love42"), &event), 1);

        assert_eq!(rx_a.recv().await, Some(event));
        assert_eq!(hub.member_count(&room("love42")), 1);
    }

    #[test]
    fn test_partner_present_threshold() {
        assert!(!partner_present(0));
        assert!(!partner_present(1));
        assert!(partner_present(2));
        assert!(partner_present(3));
    }
}
