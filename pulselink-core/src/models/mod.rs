pub mod code;
pub mod couple;

pub use code::{ConnectionId, RoomCode};
pub use couple::{Couple, LoginOutcome, RegisterCouple};
