//! Realtime event dispatch
//!
//! One handler per client event. Each handler receives the connection,
//! the presence hub and the couple service as explicit parameters via
//! `AppState`; nothing here reaches for ambient session state.

use tracing::warn;

use pulselink_core::models::{ConnectionId, RoomCode};
use pulselink_relay::{partner_present, ClientEvent, EventSender, ServerEvent};

use crate::http::AppState;

/// Route a decoded client event to its handler.
pub async fn dispatch(
    event: ClientEvent,
    connection_id: &ConnectionId,
    sender: &EventSender,
    state: &AppState,
) {
    match event {
        ClientEvent::JoinRoom(room) => handle_join_room(room, connection_id, sender, state),
        ClientEvent::SendPulse { room_id, x, y } => {
            handle_send_pulse(room_id, x, y, connection_id, state).await;
        }
        ClientEvent::SendGift { room_id, emoji } => handle_send_gift(&room_id, emoji, state),
    }
}

/// `join-room`: subscribe the connection, then tell every member whether
/// the partner is present. The count includes the join that just happened.
fn handle_join_room(
    room: RoomCode,
    connection_id: &ConnectionId,
    sender: &EventSender,
    state: &AppState,
) {
    let members = state.hub.join(room.clone(), connection_id, sender.clone());
    state.hub.broadcast(
        &room,
        &ServerEvent::UpdateUi {
            is_partner_present: partner_present(members),
        },
    );
}

/// `send-pulse`: relay the coordinates to the partner before touching the
/// database, then broadcast the durably incremented count to the whole
/// room — including the sender.
///
/// The count comes from the database, never from memory: membership may
/// have changed while the increment was in flight. A failed increment is
/// logged and swallowed; the clients simply never see an `update-count`.
async fn handle_send_pulse(
    room: RoomCode,
    x: f64,
    y: f64,
    connection_id: &ConnectionId,
    state: &AppState,
) {
    state
        .hub
        .broadcast_except(&room, connection_id, &ServerEvent::ReceivePulse { x, y });

    match state.couple_service.increment_pulse(&room).await {
        Ok(count) => {
            state.hub.broadcast(&room, &ServerEvent::UpdateCount(count));
        }
        Err(e) => {
            warn!(room = %room, error = %e, "Pulse increment failed, no count update sent");
        }
    }
}

/// `send-gift`: broadcast to the entire room, sender included, so both
/// clients trigger the animation from the same event.
fn handle_send_gift(room: &RoomCode, emoji: String, state: &AppState) {
    state.hub.broadcast(room, &ServerEvent::ReceiveGift { emoji });
}

/// Transport disconnect: remove the connection from every room it joined
/// and recompute presence for whoever remains.
pub fn disconnect(connection_id: &ConnectionId, state: &AppState) {
    for (room, remaining) in state.hub.leave_all(connection_id) {
        if remaining > 0 {
            state.hub.broadcast(
                &room,
                &ServerEvent::UpdateUi {
                    is_partner_present: partner_present(remaining),
                },
            );
        }
    }
}
