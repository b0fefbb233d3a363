// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Caller identity and the role permission matrix.

use crate::error::AccessError;
use crate::models::{OwnerScope, Role, User};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Read,
    Create,
    Update,
    Delete,
    AccessAudit,
    ManageUsers,
    ManageSettings,
}

impl Permission {
    fn action(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Create => "create",
            Permission::Update => "update",
            Permission::Delete => "delete",
            Permission::AccessAudit => "access the audit log",
            Permission::ManageUsers => "manage users",
            Permission::ManageSettings => "change settings",
        }
    }
}

impl Role {
    pub fn allows(&self, permission: Permission) -> bool {
        match self {
            Role::Viewer => permission == Permission::Read,
            Role::User => !matches!(
                permission,
                Permission::AccessAudit | Permission::ManageUsers | Permission::ManageSettings
            ),
            Role::Admin => true,
        }
    }
}

impl User {
    /// Viewers read across every owner; everyone else sees their own data.
    pub fn scope(&self) -> OwnerScope {
        match self.role {
            Role::Viewer => OwnerScope::Unscoped,
            Role::User | Role::Admin => OwnerScope::Scoped(self.id),
        }
    }

    pub fn require(&self, permission: Permission) -> Result<(), AccessError> {
        if self.role.allows(permission) {
            Ok(())
        } else {
            Err(AccessError::Forbidden(permission.action()))
        }
    }
}

pub fn find_user(conn: &Connection, name: &str) -> Result<Option<User>> {
    let row: Option<(i64, String, String)> = conn
        .query_row(
            "SELECT id, name, role FROM users WHERE name=?1",
            params![name],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let Some((id, name, role)) = row else {
        return Ok(None);
    };
    let role = role
        .parse::<Role>()
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("Corrupt role for user '{}'", name))?;
    Ok(Some(User { id, name, role }))
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, role FROM users ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut users = Vec::new();
    for row in rows {
        let (id, name, role) = row?;
        let role = role.parse::<Role>().map_err(anyhow::Error::msg)?;
        users.push(User { id, name, role });
    }
    Ok(users)
}

pub fn create_user(conn: &Connection, name: &str, role: Role) -> Result<User> {
    conn.execute(
        "INSERT INTO users(name, role) VALUES (?1, ?2)",
        params![name, role.as_str()],
    )
    .with_context(|| format!("Could not add user '{}'", name))?;
    Ok(User {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        role,
    })
}

pub fn set_role(conn: &Connection, name: &str, role: Role) -> Result<()> {
    let n = conn.execute(
        "UPDATE users SET role=?1 WHERE name=?2",
        params![role.as_str(), name],
    )?;
    if n == 0 {
        return Err(AccessError::UnknownUser(name.to_string()).into());
    }
    Ok(())
}

/// Resolves the caller from `--user`, falling back to the `default_user` setting.
pub fn resolve_identity(conn: &Connection, requested: Option<&str>) -> Result<User> {
    let name = match requested {
        Some(n) => n.to_string(),
        None => crate::utils::get_setting(conn, "default_user")?.ok_or(AccessError::NoIdentity)?,
    };
    find_user(conn, &name)?.ok_or_else(|| AccessError::UnknownUser(name).into())
}
