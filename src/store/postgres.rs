use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        calendar::CalendarScope,
        directory::{EntityKind, Learner, PartyRef, Skill, Teacher},
        session::{NewSession, Session, SessionDetail, SessionPatch, SessionStatus},
    },
    store::{Directory, SessionStore},
};

const CONFLICT_SQL: &str = r#"
    SELECT id, teacher_id, learner_id, skill_id, start_time, end_time,
           status, notes, created_at, updated_at
    FROM sessions
    WHERE (teacher_id = $1 OR learner_id = $2)
      AND status IN ('PENDING', 'CONFIRMED')
      AND start_time < $4
      AND end_time > $3
      AND ($5::uuid IS NULL OR id <> $5)
    LIMIT 1
"#;

const INSERT_SQL: &str = r#"
    INSERT INTO sessions (id, teacher_id, learner_id, skill_id, start_time, end_time, status, notes)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
"#;

const DETAIL_SQL: &str = r#"
    SELECT s.id, s.teacher_id, s.learner_id, s.skill_id, s.start_time, s.end_time,
           s.status, s.notes, s.created_at, s.updated_at,
           t.name AS teacher_name, l.name AS learner_name, k.name AS skill_name
    FROM sessions s
    JOIN teachers t ON t.id = s.teacher_id
    JOIN learners l ON l.id = s.learner_id
    JOIN skills   k ON k.id = s.skill_id
"#;

/// A helper function to map a `tokio_postgres::Row` to a `Session`.
fn row_to_session(row: &Row) -> Result<Session> {
    Ok(Session {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        teacher_id: row.try_get("teacher_id").map_err(|_| AppError::MissingData("teacher_id".to_string()))?,
        learner_id: row.try_get("learner_id").map_err(|_| AppError::MissingData("learner_id".to_string()))?,
        skill_id: row.try_get("skill_id").map_err(|_| AppError::MissingData("skill_id".to_string()))?,
        start_time: row.try_get("start_time").map_err(|_| AppError::MissingData("start_time".to_string()))?,
        end_time: row.try_get("end_time").map_err(|_| AppError::MissingData("end_time".to_string()))?,
        status: row.try_get("status").map_err(|_| AppError::MissingData("status".to_string()))?,
        notes: row.try_get("notes").map_err(|_| AppError::MissingData("notes".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
        updated_at: row.try_get("updated_at").map_err(|_| AppError::MissingData("updated_at".to_string()))?,
    })
}

/// Maps a joined row (session + party names) to a `SessionDetail`.
fn row_to_detail(row: &Row) -> Result<SessionDetail> {
    let session = row_to_session(row)?;
    let teacher_name: String = row
        .try_get("teacher_name")
        .map_err(|_| AppError::MissingData("teacher_name".to_string()))?;
    let learner_name: String = row
        .try_get("learner_name")
        .map_err(|_| AppError::MissingData("learner_name".to_string()))?;
    let skill_name: String = row
        .try_get("skill_name")
        .map_err(|_| AppError::MissingData("skill_name".to_string()))?;

    Ok(SessionDetail {
        teacher: PartyRef { id: session.teacher_id, name: teacher_name },
        learner: PartyRef { id: session.learner_id, name: learner_name },
        skill: PartyRef { id: session.skill_id, name: skill_name },
        session,
    })
}

/// Advisory-lock key for a participant: the first eight bytes of the UUID.
/// A collision between two distinct participants only over-serializes their
/// bookings; it can never let a conflict slip through.
fn advisory_key(id: Uuid) -> i64 {
    let b = id.as_bytes();
    i64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}

/// Read-only directory lookups backed by PostgreSQL.
#[derive(Clone)]
pub struct PgDirectory {
    pool: Pool,
}

impl PgDirectory {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Directory for PgDirectory {
    async fn find_teacher(&self, id: Uuid) -> Result<Option<Teacher>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT id, name FROM teachers WHERE id = $1", &[&id])
            .await?;
        Ok(row.map(|r| Teacher { id: r.get("id"), name: r.get("name") }))
    }

    async fn find_learner(&self, id: Uuid) -> Result<Option<Learner>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT id, name FROM learners WHERE id = $1", &[&id])
            .await?;
        Ok(row.map(|r| Learner { id: r.get("id"), name: r.get("name") }))
    }

    async fn find_skill(&self, id: Uuid) -> Result<Option<Skill>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt("SELECT id, name FROM skills WHERE id = $1", &[&id])
            .await?;
        Ok(row.map(|r| Skill { id: r.get("id"), name: r.get("name") }))
    }

    async fn teacher_offers_skill(&self, teacher_id: Uuid, skill_id: Uuid) -> Result<bool> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT 1 FROM offerings WHERE teacher_id = $1 AND skill_id = $2",
                &[&teacher_id, &skill_id],
            )
            .await?;
        Ok(row.is_some())
    }
}

/// Session store backed by PostgreSQL.
///
/// Atomicity: `create` runs inside one transaction holding a
/// `pg_advisory_xact_lock` per participant, acquired in sorted key order so
/// two requests sharing both participants in opposite roles cannot deadlock.
/// The conflict check and insert happen under those locks, which is the
/// mutual-exclusion scope the no-overlap invariant requires. `update` is a
/// single-row `SELECT ... FOR UPDATE` + `UPDATE` in one transaction.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: Pool,
}

impl PgSessionStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, candidate: NewSession) -> Result<SessionDetail> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let mut keys = [advisory_key(candidate.teacher_id), advisory_key(candidate.learner_id)];
        keys.sort_unstable();
        for key in keys {
            tx.execute("SELECT pg_advisory_xact_lock($1)", &[&key]).await?;
        }

        // Statements are cached per pooled connection; a prepared statement
        // is only valid on the connection that prepared it.
        let conflict_stmt = tx.prepare_cached(CONFLICT_SQL).await?;
        let conflict = tx
            .query_opt(
                &conflict_stmt,
                &[
                    &candidate.teacher_id,
                    &candidate.learner_id,
                    &candidate.start_time,
                    &candidate.end_time,
                    &None::<Uuid>,
                ],
            )
            .await?;

        if conflict.is_some() {
            return Err(AppError::SchedulingConflict);
        }

        let session_id = Uuid::new_v4();
        let insert_stmt = tx.prepare_cached(INSERT_SQL).await?;
        tx.execute(
            &insert_stmt,
            &[
                &session_id,
                &candidate.teacher_id,
                &candidate.learner_id,
                &candidate.skill_id,
                &candidate.start_time,
                &candidate.end_time,
                &SessionStatus::Pending,
                &candidate.notes,
            ],
        )
        .await?;

        let detail_sql = format!("{} WHERE s.id = $1", DETAIL_SQL);
        let row = tx.query_one(&detail_sql, &[&session_id]).await?;
        let detail = row_to_detail(&row)?;

        tx.commit().await?;

        Ok(detail)
    }

    async fn update(&self, id: Uuid, patch: SessionPatch) -> Result<SessionDetail> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let row = tx
            .query_opt("SELECT status FROM sessions WHERE id = $1 FOR UPDATE", &[&id])
            .await?
            .ok_or(AppError::NotFound(EntityKind::Session))?;
        let current: SessionStatus = row
            .try_get("status")
            .map_err(|_| AppError::MissingData("status".to_string()))?;

        if let Some(to) = patch.status {
            if !current.can_transition(to) {
                return Err(AppError::InvalidTransition(current, to));
            }
        }

        tx.execute(
            r#"
            UPDATE sessions
            SET status = COALESCE($2, status),
                notes = COALESCE($3, notes),
                updated_at = NOW()
            WHERE id = $1
            "#,
            &[&id, &patch.status, &patch.notes],
        )
        .await?;

        let detail_sql = format!("{} WHERE s.id = $1", DETAIL_SQL);
        let row = tx.query_one(&detail_sql, &[&id]).await?;
        let detail = row_to_detail(&row)?;

        tx.commit().await?;

        Ok(detail)
    }

    async fn confirmed_sessions(&self, scope: CalendarScope) -> Result<Vec<SessionDetail>> {
        let client = self.pool.get().await?;

        let rows = match scope {
            CalendarScope::Teacher(teacher_id) => {
                let sql = format!("{} WHERE s.status = 'CONFIRMED' AND s.teacher_id = $1", DETAIL_SQL);
                client.query(&sql, &[&teacher_id]).await?
            }
            CalendarScope::Learner(learner_id) => {
                let sql = format!("{} WHERE s.status = 'CONFIRMED' AND s.learner_id = $1", DETAIL_SQL);
                client.query(&sql, &[&learner_id]).await?
            }
            CalendarScope::Admin => {
                let sql = format!("{} WHERE s.status = 'CONFIRMED'", DETAIL_SQL);
                client.query(&sql, &[]).await?
            }
        };

        rows.iter().map(row_to_detail).collect()
    }

    async fn find_conflict(
        &self,
        teacher_id: Uuid,
        learner_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        exclude_session_id: Option<Uuid>,
    ) -> Result<Option<Session>> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(CONFLICT_SQL).await?;
        let row = client
            .query_opt(
                &stmt,
                &[&teacher_id, &learner_id, &start_time, &end_time, &exclude_session_id],
            )
            .await?;
        row.map(|r| row_to_session(&r)).transpose()
    }
}
