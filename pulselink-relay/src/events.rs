use serde::{Deserialize, Serialize};

use pulselink_core::models::RoomCode;

/// Events sent by clients over the realtime channel.
///
/// Wire format is a JSON frame tagged by event name:
/// `{"event": "send-pulse", "data": {"roomId": "ABC12", "x": 0.4, "y": 0.6}}`.
/// Room codes are normalized during deserialization, so a lowercase
/// `roomId` lands in the same room as its uppercase registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Subscribe the connection to a room; every member is then told
    /// whether the partner is present.
    JoinRoom(RoomCode),

    /// A tap at (x, y): relayed to the partner immediately, counted
    /// durably afterwards.
    #[serde(rename_all = "camelCase")]
    SendPulse { room_id: RoomCode, x: f64, y: f64 },

    /// An emoji reaction: relayed to the whole room, sender included.
    #[serde(rename_all = "camelCase")]
    SendGift { room_id: RoomCode, emoji: String },
}

/// Events pushed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Presence changed: whether both partners are currently connected.
    #[serde(rename_all = "camelCase")]
    UpdateUi { is_partner_present: bool },

    /// A partner's pulse coordinates.
    ReceivePulse { x: f64, y: f64 },

    /// The durable pulse counter after an increment committed.
    UpdateCount(i64),

    /// A gift reaction, echoed to the sender too.
    ReceiveGift { emoji: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_room_wire_format() {
        let event: ClientEvent =
            serde_json::from_value(json!({"event": "join-room", "data": "love42"})).unwrap();

        assert_eq!(event, ClientEvent::JoinRoom(RoomCode::new("LOVE42")));
    }

    #[test]
    fn test_send_pulse_wire_format() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "send-pulse",
            "data": {"roomId": "love42", "x": 0.25, "y": 0.75}
        }))
        .unwrap();

        assert_eq!(
            event,
            ClientEvent::SendPulse {
                room_id: RoomCode::new("LOVE42"),
                x: 0.25,
                y: 0.75,
            }
        );
    }

    #[test]
    fn test_send_gift_wire_format() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "send-gift",
            "data": {"roomId": "Love42", "emoji": "🎉"}
        }))
        .unwrap();

        assert_eq!(
            event,
            ClientEvent::SendGift {
                room_id: RoomCode::new("love42"),
                emoji: "🎉".to_string(),
            }
        );
    }

    #[test]
    fn test_server_event_wire_format() {
        assert_eq!(
            serde_json::to_value(ServerEvent::UpdateUi {
                is_partner_present: true
            })
            .unwrap(),
            json!({"event": "update-ui", "data": {"isPartnerPresent": true}})
        );

        assert_eq!(
            serde_json::to_value(ServerEvent::ReceivePulse { x: 0.5, y: 0.5 }).unwrap(),
            json!({"event": "receive-pulse", "data": {"x": 0.5, "y": 0.5}})
        );

        assert_eq!(
            serde_json::to_value(ServerEvent::UpdateCount(6)).unwrap(),
            json!({"event": "update-count", "data": 6})
        );

        assert_eq!(
            serde_json::to_value(ServerEvent::ReceiveGift {
                emoji: "🎉".to_string()
            })
            .unwrap(),
            json!({"event": "receive-gift", "data": {"emoji": "🎉"}})
        );
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let result: Result<ClientEvent, _> =
            serde_json::from_value(json!({"event": "steal-letter", "data": {}}));

        assert!(result.is_err());
    }
}
