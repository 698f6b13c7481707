use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kinds of directory entities a session references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Teacher,
    Learner,
    Skill,
    Session,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntityKind::Teacher => "Teacher",
            EntityKind::Learner => "Learner",
            EntityKind::Skill => "Skill",
            EntityKind::Session => "Session",
        };
        write!(f, "{}", s)
    }
}

/// A resolved reference to a directory entity, as nested into session
/// responses and calendar events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyRef {
    /// The unique identifier of the entity.
    pub id: Uuid,
    /// The display name of the entity.
    pub name: String,
}

/// Represents a teacher in the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: Uuid,
    pub name: String,
}

/// Represents a learner in the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learner {
    pub id: Uuid,
    pub name: String,
}

/// Represents a teachable skill in the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
}

impl From<Teacher> for PartyRef {
    fn from(t: Teacher) -> Self {
        PartyRef { id: t.id, name: t.name }
    }
}

impl From<Learner> for PartyRef {
    fn from(l: Learner) -> Self {
        PartyRef { id: l.id, name: l.name }
    }
}

impl From<Skill> for PartyRef {
    fn from(s: Skill) -> Self {
        PartyRef { id: s.id, name: s.name }
    }
}
