use chrono::{Local, NaiveDateTime};
use rusqlite::{params, Connection};

use crate::db::StoreError;
use crate::models::{ConversationTurn, TIMESTAMP_FORMAT};

/// All turns for a user, oldest first. The store's text sort key is
/// zero-padded, so ascending `date_time` order is chronological order.
pub fn history_for_user(
    conn: &Connection,
    user_key: &str,
) -> Result<Vec<ConversationTurn>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT user_key, date_time, question, answer FROM conversation_turns
         WHERE user_key = ?1 ORDER BY date_time ASC",
    )?;

    let rows = stmt.query_map(params![user_key], |row| {
        Ok(TurnRow {
            user_key: row.get(0)?,
            date_time: row.get(1)?,
            question: row.get(2)?,
            answer: row.get(3)?,
        })
    })?;

    let mut turns = Vec::new();
    for row in rows {
        turns.push(turn_from_row(row?)?);
    }
    Ok(turns)
}

/// Append a turn with a freshly generated timestamp. No dedup, no conflict
/// detection: a colliding `(user_key, date_time)` pair resolves
/// last-write-wins.
pub fn insert_turn(
    conn: &Connection,
    user_key: &str,
    question: &str,
    answer: &str,
) -> Result<ConversationTurn, StoreError> {
    insert_turn_at(conn, user_key, Local::now().naive_local(), question, answer)
}

/// Append a turn at an explicit timestamp. Sub-microsecond precision is
/// truncated to the stored format.
pub fn insert_turn_at(
    conn: &Connection,
    user_key: &str,
    date_time: NaiveDateTime,
    question: &str,
    answer: &str,
) -> Result<ConversationTurn, StoreError> {
    let stamp = date_time.format(TIMESTAMP_FORMAT).to_string();
    conn.execute(
        "INSERT OR REPLACE INTO conversation_turns (user_key, date_time, question, answer)
         VALUES (?1, ?2, ?3, ?4)",
        params![user_key, stamp, question, answer],
    )?;

    Ok(ConversationTurn {
        user_key: user_key.to_string(),
        date_time: parse_stamp(&stamp)?,
        question: question.to_string(),
        answer: answer.to_string(),
    })
}

struct TurnRow {
    user_key: String,
    date_time: String,
    question: String,
    answer: String,
}

fn turn_from_row(row: TurnRow) -> Result<ConversationTurn, StoreError> {
    Ok(ConversationTurn {
        user_key: row.user_key,
        date_time: parse_stamp(&row.date_time)?,
        question: row.question,
        answer: row.answer,
    })
}

fn parse_stamp(stamp: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .map_err(|_| StoreError::InvalidTimestamp(stamp.to_string()))
}
