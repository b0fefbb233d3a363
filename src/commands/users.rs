// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::access::{self, Permission};
use crate::models::{Role, User};
use crate::utils::{pretty_table, set_setting};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use tracing::info;

/// `caller` is the `--user` value, if any; user management resolves its own
/// identity so the very first user can be created.
pub fn handle(conn: &Connection, caller: Option<&str>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let role = parse_role(sub.get_one::<String>("role").unwrap())?;
            let user = add(conn, caller, name, role)?;
            println!("Added user '{}' ({})", user.name, user.role);
        }
        Some(("list", _)) => {
            let who = access::resolve_identity(conn, caller)?;
            let users = list(conn, &who)?;
            let rows = users
                .iter()
                .map(|u| vec![u.id.to_string(), u.name.clone(), u.role.to_string()])
                .collect();
            println!("{}", pretty_table(&["ID", "Name", "Role"], rows));
        }
        Some(("role", sub)) => {
            let who = access::resolve_identity(conn, caller)?;
            who.require(Permission::ManageUsers)?;
            let name = sub.get_one::<String>("name").unwrap();
            let role = parse_role(sub.get_one::<String>("role").unwrap())?;
            access::set_role(conn, name, role)?;
            info!(user = %name, role = role.as_str(), by = %who.name, "role changed");
            println!("'{}' is now {}", name, role);
        }
        _ => {}
    }
    Ok(())
}

fn parse_role(s: &str) -> Result<Role> {
    s.parse::<Role>().map_err(anyhow::Error::msg)
}

fn user_count(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?)
}

/// Adds a user. The first user is created without an identity, becomes
/// Admin and is stored as `default_user`.
pub fn add(conn: &Connection, caller: Option<&str>, name: &str, role: Role) -> Result<User> {
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("User name must not be empty"));
    }
    if user_count(conn)? == 0 {
        let user = access::create_user(conn, name, Role::Admin)?;
        set_setting(conn, "default_user", &user.name)?;
        info!(user = %user.name, "bootstrap admin created");
        return Ok(user);
    }
    let who = access::resolve_identity(conn, caller)?;
    who.require(Permission::ManageUsers)?;
    let user = access::create_user(conn, name, role)?;
    info!(user = %user.name, role = role.as_str(), by = %who.name, "user created");
    Ok(user)
}

pub fn list(conn: &Connection, who: &User) -> Result<Vec<User>> {
    who.require(Permission::Read)?;
    access::list_users(conn)
}
