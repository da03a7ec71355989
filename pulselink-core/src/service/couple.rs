//! Couple service: registration, login and the pulse counter.

use std::sync::Arc;

use tracing::info;

use crate::{
    models::{Couple, LoginOutcome, RegisterCouple, RoomCode},
    repository::CoupleRepository,
    Error, Result,
};

/// Service wrapping the couples table behind the operations the API needs.
#[derive(Clone)]
pub struct CoupleService {
    couple_repository: Arc<CoupleRepository>,
}

impl std::fmt::Debug for CoupleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoupleService").finish()
    }
}

impl CoupleService {
    #[must_use]
    pub fn new(couple_repository: Arc<CoupleRepository>) -> Self {
        Self { couple_repository }
    }

    /// Register a new couple under a room code.
    ///
    /// All six fields must be non-empty; the repository enforces code
    /// uniqueness.
    pub async fn register(&self, request: RegisterCouple) -> Result<Couple> {
        if request.room_code.is_empty() {
            return Err(Error::InvalidInput("Room code cannot be empty".to_string()));
        }

        for (field, value) in [
            ("userA", &request.user_a),
            ("userB", &request.user_b),
            ("letterA", &request.letter_a),
            ("letterB", &request.letter_b),
            ("song", &request.song),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidInput(format!(
                    "Field {field} cannot be empty"
                )));
            }
        }

        let created = self.couple_repository.create(&Couple::new(request)).await?;

        info!(room = %created.room_code, "Couple registered");

        Ok(created)
    }

    /// Log a participant into their room.
    ///
    /// Resolves which participant is asking by name and returns their
    /// letter plus the shared song and pulse count. Unknown codes are
    /// `NotFound`; a name matching neither participant is `Authorization`.
    pub async fn login(&self, code: &RoomCode, my_name: &str) -> Result<LoginOutcome> {
        let couple = self
            .couple_repository
            .get_by_code(code)
            .await?
            .ok_or_else(|| Error::NotFound("Room code not found".to_string()))?;

        let letter = couple
            .letter_for(my_name)
            .ok_or_else(|| Error::Authorization("Name does not match this room".to_string()))?
            .to_string();

        info!(room = %couple.room_code, "Participant logged in");

        Ok(LoginOutcome {
            letter,
            song: couple.selected_song,
            pulse_count: couple.pulse_count,
        })
    }

    /// Atomically bump the stored pulse counter, returning the new value.
    pub async fn increment_pulse(&self, code: &RoomCode) -> Result<i64> {
        self.couple_repository.increment_pulse(code).await
    }
}
