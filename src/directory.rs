//! User directory: the authentication collaborator.
//!
//! Maps credentials to a user and their role. The engine never calls this;
//! callers resolve an actor here and pass the role code to the engine.
//! A roster can be loaded from TOML:
//!
//! ```toml
//! [[user]]
//! id = 1
//! username = "CS"
//! password = "CSPass"
//! name = "Customer Service"
//! role = "CS"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::secrets::{SecretString, secret_matches};
use crate::error::{Error, Result};
use crate::model::Role;

/// Top-level TOML wrapper.
#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    user: Vec<UserEntry>,
}

#[derive(Debug, Deserialize)]
struct UserEntry {
    id: u32,
    username: String,
    password: SecretString,
    name: String,
    role: Role,
}

/// An authenticated user. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: u32,
    pub username: String,
    pub role: Role,
    pub name: String,
}

/// Roster of users, in definition order.
pub struct UserDirectory {
    entries: Vec<UserEntry>,
}

impl UserDirectory {
    /// One account per role, username equal to the role code and password
    /// `<code>Pass`.
    pub fn builtin() -> Self {
        let entries = Role::ALL
            .into_iter()
            .zip(1u32..)
            .map(|(role, id)| UserEntry {
                id,
                username: role.code().to_string(),
                password: SecretString::from(format!("{}Pass", role.code())),
                name: role.title().to_string(),
                role,
            })
            .collect();
        Self { entries }
    }

    /// Parse a TOML roster.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RosterFile =
            toml::from_str(content).map_err(|e| Error::Config(format!("bad roster: {e}")))?;

        for (i, entry) in file.user.iter().enumerate() {
            if file.user[..i].iter().any(|other| other.username == entry.username) {
                return Err(Error::Config(format!(
                    "duplicate username in roster: {}",
                    entry.username
                )));
            }
            if file.user[..i].iter().any(|other| other.id == entry.id) {
                return Err(Error::Config(format!("duplicate user id in roster: {}", entry.id)));
            }
        }

        Ok(Self { entries: file.user })
    }

    /// Load a TOML roster from disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read roster {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// The configured roster if a path is given, the built-in one otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Check credentials. `None` for an unknown user or a wrong password.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        let entry = self.entries.iter().find(|e| e.username == username)?;
        if !secret_matches(&entry.password, password) {
            tracing::debug!(username, "authentication failed");
            return None;
        }
        Some(entry.to_user())
    }

    pub fn get_by_id(&self, id: u32) -> Option<User> {
        self.entries.iter().find(|e| e.id == id).map(UserEntry::to_user)
    }

    pub fn users(&self) -> Vec<User> {
        self.entries.iter().map(UserEntry::to_user).collect()
    }
}

impl UserEntry {
    fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            name: self.name.clone(),
        }
    }
}
