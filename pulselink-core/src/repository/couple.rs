use sqlx::{postgres::PgRow, PgPool, Row};

use crate::{
    models::{Couple, RoomCode},
    Error, Result,
};

/// Couple repository for database operations
#[derive(Clone)]
pub struct CoupleRepository {
    pool: PgPool,
}

impl CoupleRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new couple row.
    ///
    /// `room_code` is the table's primary key, so registering the same code
    /// twice surfaces as `Error::AlreadyExists` via the unique-violation
    /// mapping; the first registration's row is untouched.
    pub async fn create(&self, couple: &Couple) -> Result<Couple> {
        let row = sqlx::query(
            "INSERT INTO couples (room_code, user_a_name, user_b_name, letter_for_a, letter_for_b, selected_song, pulse_count, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING room_code, user_a_name, user_b_name, letter_for_a, letter_for_b, selected_song, pulse_count, created_at"
        )
        .bind(couple.room_code.as_str())
        .bind(&couple.user_a_name)
        .bind(&couple.user_b_name)
        .bind(&couple.letter_for_a)
        .bind(&couple.letter_for_b)
        .bind(&couple.selected_song)
        .bind(couple.pulse_count)
        .bind(couple.created_at)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_couple(&row)
    }

    /// Get a couple by its room code
    pub async fn get_by_code(&self, code: &RoomCode) -> Result<Option<Couple>> {
        let row = sqlx::query(
            "SELECT room_code, user_a_name, user_b_name, letter_for_a, letter_for_b, selected_song, pulse_count, created_at
             FROM couples
             WHERE room_code = $1"
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_couple(&row)?)),
            None => Ok(None),
        }
    }

    /// Atomically bump the pulse counter and return the new value.
    ///
    /// Single increment-and-return statement; a read-then-write here would
    /// lose updates under concurrent pulses from both partners.
    pub async fn increment_pulse(&self, code: &RoomCode) -> Result<i64> {
        let row = sqlx::query(
            "UPDATE couples SET pulse_count = pulse_count + 1
             WHERE room_code = $1
             RETURNING pulse_count",
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row.try_get("pulse_count")?),
            None => Err(Error::NotFound(format!(
                "Room code {} not found",
                code.as_str()
            ))),
        }
    }

    fn row_to_couple(row: &PgRow) -> Result<Couple> {
        Ok(Couple {
            room_code: RoomCode::new(&row.try_get::<String, _>("room_code")?),
            user_a_name: row.try_get("user_a_name")?,
            user_b_name: row.try_get("user_b_name")?,
            letter_for_a: row.try_get("letter_for_a")?,
            letter_for_b: row.try_get("letter_for_b")?,
            selected_song: row.try_get("selected_song")?,
            pulse_count: row.try_get("pulse_count")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
