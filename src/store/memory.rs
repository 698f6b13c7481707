use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        calendar::CalendarScope,
        directory::{EntityKind, Learner, PartyRef, Skill, Teacher},
        session::{NewSession, Session, SessionDetail, SessionPatch, SessionStatus},
    },
    store::{overlaps, Directory, SessionStore},
};

/// In-memory directory: HashMaps behind an async Mutex.
///
/// Backs local development (`STORE_BACKEND=memory`) and the engine tests.
/// Entities are registered up front through the `add_*` methods.
#[derive(Clone, Default)]
pub struct MemDirectory {
    inner: Arc<Mutex<DirectoryInner>>,
}

#[derive(Default)]
struct DirectoryInner {
    teachers: HashMap<Uuid, Teacher>,
    learners: HashMap<Uuid, Learner>,
    skills: HashMap<Uuid, Skill>,
    offerings: Vec<(Uuid, Uuid)>,
}

impl MemDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a teacher, returning its generated ID.
    pub async fn add_teacher(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let mut inner = self.inner.lock().await;
        inner.teachers.insert(id, Teacher { id, name: name.to_string() });
        id
    }

    /// Registers a learner, returning its generated ID.
    pub async fn add_learner(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let mut inner = self.inner.lock().await;
        inner.learners.insert(id, Learner { id, name: name.to_string() });
        id
    }

    /// Registers a skill, returning its generated ID.
    pub async fn add_skill(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let mut inner = self.inner.lock().await;
        inner.skills.insert(id, Skill { id, name: name.to_string() });
        id
    }

    /// Records that the teacher offers the skill.
    pub async fn add_offering(&self, teacher_id: Uuid, skill_id: Uuid) {
        let mut inner = self.inner.lock().await;
        inner.offerings.push((teacher_id, skill_id));
    }
}

#[async_trait]
impl Directory for MemDirectory {
    async fn find_teacher(&self, id: Uuid) -> Result<Option<Teacher>> {
        Ok(self.inner.lock().await.teachers.get(&id).cloned())
    }

    async fn find_learner(&self, id: Uuid) -> Result<Option<Learner>> {
        Ok(self.inner.lock().await.learners.get(&id).cloned())
    }

    async fn find_skill(&self, id: Uuid) -> Result<Option<Skill>> {
        Ok(self.inner.lock().await.skills.get(&id).cloned())
    }

    async fn teacher_offers_skill(&self, teacher_id: Uuid, skill_id: Uuid) -> Result<bool> {
        let inner = self.inner.lock().await;
        Ok(inner.offerings.iter().any(|&(t, s)| t == teacher_id && s == skill_id))
    }
}

/// In-memory session store.
///
/// One async Mutex guards the whole session map, held across the conflict
/// check and the insert, which gives `create` the same atomicity contract as
/// the advisory-lock transaction in the Postgres store.
#[derive(Clone)]
pub struct MemSessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    directory: MemDirectory,
}

impl MemSessionStore {
    /// Creates an empty store resolving party names through `directory`.
    pub fn new(directory: MemDirectory) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            directory,
        }
    }

    async fn resolve_detail(&self, session: Session) -> Result<SessionDetail> {
        let teacher = self
            .directory
            .find_teacher(session.teacher_id)
            .await?
            .ok_or_else(|| AppError::MissingData("teacher name".to_string()))?;
        let learner = self
            .directory
            .find_learner(session.learner_id)
            .await?
            .ok_or_else(|| AppError::MissingData("learner name".to_string()))?;
        let skill = self
            .directory
            .find_skill(session.skill_id)
            .await?
            .ok_or_else(|| AppError::MissingData("skill name".to_string()))?;

        Ok(SessionDetail {
            teacher: PartyRef::from(teacher),
            learner: PartyRef::from(learner),
            skill: PartyRef::from(skill),
            session,
        })
    }
}

fn scan_conflict<'a>(
    sessions: impl Iterator<Item = &'a Session>,
    teacher_id: Uuid,
    learner_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    exclude_session_id: Option<Uuid>,
) -> Option<Session> {
    sessions
        .filter(|s| Some(s.id) != exclude_session_id)
        .filter(|s| s.status.is_active())
        .filter(|s| s.teacher_id == teacher_id || s.learner_id == learner_id)
        .find(|s| overlaps(s.start_time, s.end_time, start_time, end_time))
        .cloned()
}

#[async_trait]
impl SessionStore for MemSessionStore {
    async fn create(&self, candidate: NewSession) -> Result<SessionDetail> {
        // Lock held across check-and-insert.
        let mut sessions = self.sessions.lock().await;

        if scan_conflict(
            sessions.values(),
            candidate.teacher_id,
            candidate.learner_id,
            candidate.start_time,
            candidate.end_time,
            None,
        )
        .is_some()
        {
            return Err(AppError::SchedulingConflict);
        }

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            teacher_id: candidate.teacher_id,
            learner_id: candidate.learner_id,
            skill_id: candidate.skill_id,
            start_time: candidate.start_time,
            end_time: candidate.end_time,
            status: SessionStatus::Pending,
            notes: candidate.notes,
            created_at: now,
            updated_at: now,
        };
        sessions.insert(session.id, session.clone());
        drop(sessions);

        self.resolve_detail(session).await
    }

    async fn update(&self, id: Uuid, patch: SessionPatch) -> Result<SessionDetail> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(AppError::NotFound(EntityKind::Session))?;

        if let Some(to) = patch.status {
            if !session.status.can_transition(to) {
                return Err(AppError::InvalidTransition(session.status, to));
            }
            session.status = to;
        }
        if let Some(notes) = patch.notes {
            session.notes = Some(notes);
        }
        session.updated_at = Utc::now();

        let session = session.clone();
        drop(sessions);

        self.resolve_detail(session).await
    }

    async fn confirmed_sessions(&self, scope: CalendarScope) -> Result<Vec<SessionDetail>> {
        let snapshot: Vec<Session> = {
            let sessions = self.sessions.lock().await;
            sessions
                .values()
                .filter(|s| s.status == SessionStatus::Confirmed)
                .filter(|s| match scope {
                    CalendarScope::Teacher(id) => s.teacher_id == id,
                    CalendarScope::Learner(id) => s.learner_id == id,
                    CalendarScope::Admin => true,
                })
                .cloned()
                .collect()
        };

        let mut details = Vec::with_capacity(snapshot.len());
        for session in snapshot {
            details.push(self.resolve_detail(session).await?);
        }
        Ok(details)
    }

    async fn find_conflict(
        &self,
        teacher_id: Uuid,
        learner_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        exclude_session_id: Option<Uuid>,
    ) -> Result<Option<Session>> {
        let sessions = self.sessions.lock().await;
        Ok(scan_conflict(
            sessions.values(),
            teacher_id,
            learner_id,
            start_time,
            end_time,
            exclude_session_id,
        ))
    }
}
