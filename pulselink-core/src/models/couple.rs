use chrono::{DateTime, Utc};

use super::code::RoomCode;

/// Persisted couple record, one row per registered room code.
///
/// `pulse_count` is mutated only through the repository's atomic increment;
/// the application never reads, adds and writes it back.
#[derive(Debug, Clone)]
pub struct Couple {
    pub room_code: RoomCode,
    pub user_a_name: String,
    pub user_b_name: String,
    pub letter_for_a: String,
    pub letter_for_b: String,
    pub selected_song: String,
    pub pulse_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Couple {
    /// Build a fresh row from a registration; the counter starts at zero.
    #[must_use]
    pub fn new(request: RegisterCouple) -> Self {
        Self {
            room_code: request.room_code,
            user_a_name: request.user_a,
            user_b_name: request.user_b,
            letter_for_a: request.letter_a,
            letter_for_b: request.letter_b,
            selected_song: request.song,
            pulse_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Match `name` against either participant, case-insensitively, and
    /// return that participant's letter.
    #[must_use]
    pub fn letter_for(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        if name == self.user_a_name.to_lowercase() {
            Some(&self.letter_for_a)
        } else if name == self.user_b_name.to_lowercase() {
            Some(&self.letter_for_b)
        } else {
            None
        }
    }
}

/// Input for registering a new couple.
#[derive(Debug, Clone)]
pub struct RegisterCouple {
    pub room_code: RoomCode,
    pub user_a: String,
    pub user_b: String,
    pub letter_a: String,
    pub letter_b: String,
    pub song: String,
}

/// What a participant gets back at login: their letter, the couple's song
/// and the current pulse count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub letter: String,
    pub song: String,
    pub pulse_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_couple() -> Couple {
        Couple::new(RegisterCouple {
            room_code: RoomCode::new("love42"),
            user_a: "Alice".to_string(),
            user_b: "Bob".to_string(),
            letter_a: "Dear Alice...".to_string(),
            letter_b: "Dear Bob...".to_string(),
            song: "our-song.mp3".to_string(),
        })
    }

    #[test]
    fn test_letter_for_matches_either_participant() {
        let couple = test_couple();

        assert_eq!(couple.letter_for("Alice"), Some("Dear Alice..."));
        assert_eq!(couple.letter_for("Bob"), Some("Dear Bob..."));
    }

    #[test]
    fn test_letter_for_is_case_insensitive() {
        let couple = test_couple();

        assert_eq!(couple.letter_for("alice"), Some("Dear Alice..."));
        assert_eq!(couple.letter_for("BOB"), Some("Dear Bob..."));
    }

    #[test]
    fn test_letter_for_rejects_unknown_name() {
        let couple = test_couple();

        assert_eq!(couple.letter_for("Mallory"), None);
    }

    #[test]
    fn test_new_couple_starts_at_zero_pulses() {
        let couple = test_couple();

        assert_eq!(couple.pulse_count, 0);
        assert_eq!(couple.room_code.as_str(), "LOVE42");
    }
}
