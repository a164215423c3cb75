//! # Authorization Guard
//!
//! Pure role-based policy over registry actions, decoupled from the
//! transport layer so it can be tested exhaustively. Only administrators may
//! touch registry records; every other principal is denied every action,
//! including read and list.

use serde::{Deserialize, Serialize};

/// Role claim of an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Anonymous,
}

impl Role {
    /// Map a gateway role claim to a role. Unknown claims are treated as
    /// ordinary users; a missing claim is anonymous. Both are denied
    /// everything by the policy below.
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim {
            None => Role::Anonymous,
            Some(value) if value.eq_ignore_ascii_case("admin") => Role::Admin,
            Some(_) => Role::User,
        }
    }
}

/// The authenticated actor issuing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub role: Role,
}

impl Principal {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    /// Principal for requests that carried no identity.
    pub fn anonymous() -> Self {
        Self::new("anonymous", Role::Anonymous)
    }
}

/// Actions a caller can request against registry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    List,
    Update,
    Delete,
    Probe,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Create,
        Action::Read,
        Action::List,
        Action::Update,
        Action::Delete,
        Action::Probe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::List => "list",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Probe => "probe",
        }
    }
}

/// Policy table: action × role → allow/deny. Pure decision function over the
/// role claim; no partial visibility for non-admins.
pub fn authorize(principal: &Principal, action: Action) -> bool {
    match (principal.role, action) {
        (Role::Admin, _) => true,
        (Role::User | Role::Anonymous, _) => false,
    }
}
