use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role of an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Teacher,
    Learner,
    Admin,
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEACHER" => Ok(Role::Teacher),
            "LEARNER" => Ok(Role::Learner),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// The authenticated principal attached to every request by the auth
/// middleware. Produced by the upstream identity provider; this service
/// trusts it and performs no credential verification of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// The ID of the calling user.
    pub user_id: Uuid,
    /// The role the identity provider asserted for the user.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::Role;

    #[test]
    fn role_parses_upstream_header_values() {
        assert_eq!("TEACHER".parse(), Ok(Role::Teacher));
        assert_eq!("LEARNER".parse(), Ok(Role::Learner));
        assert_eq!("ADMIN".parse(), Ok(Role::Admin));
        assert!("teacher".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }
}
