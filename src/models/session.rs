use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{config::RoleGroups, utils::jwt::Claims};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Sagsbehandler,
    Administrator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Identity of the signed-in caseworker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    pub name: String,
    pub groups: Vec<String>,
    pub roles: Vec<Role>,
}

impl SessionUser {
    pub fn from_claims(claims: Claims, groups: &RoleGroups) -> Self {
        let mut roles = Vec::new();
        let is_admin = claims.groups.iter().any(|g| g == &groups.admin);
        if is_admin || claims.groups.iter().any(|g| g == &groups.caseworker) {
            roles.push(Role::Sagsbehandler);
        }
        if is_admin {
            roles.push(Role::Administrator);
        }
        Self {
            email: claims.email,
            name: claims.name,
            groups: claims.groups,
            roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: SessionUser, ttl_hours: i64) -> Self {
        Self {
            user,
            expires_at: Utc::now() + Duration::hours(ttl_hours),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
