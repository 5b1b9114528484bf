// Viewer role and the render context it travels in.
//
// The role is configuration, not authorization: it only decides which
// panels the presentation layer draws. It is passed explicitly to the
// renderer so several sessions with different roles can coexist.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Public health officials: admin panel and per-post actions.
    #[default]
    PublicHealth,
    Researcher,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PublicHealth => "publicHealth",
            Role::Researcher => "researcher",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "publichealth" | "public_health" | "public-health" => Ok(Role::PublicHealth),
            "researcher" => Ok(Role::Researcher),
            "user" => Ok(Role::User),
            _ => Err(ValidationError::UnknownRole(s.to_string())),
        }
    }
}

/// Per-session rendering inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderContext {
    pub role: Role,
}

impl RenderContext {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    pub fn shows_admin_panel(&self) -> bool {
        self.role == Role::PublicHealth
    }

    /// The post table's "Actions" column (view details / annotate).
    pub fn shows_actions_column(&self) -> bool {
        self.role == Role::PublicHealth
    }
}
