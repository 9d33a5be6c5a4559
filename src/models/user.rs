use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stored credential for one account, keyed by username in [`UserDocument`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    // bcrypt hash, or a legacy unsalted SHA-256 hex digest awaiting upgrade
    #[serde(rename = "password")]
    pub password_hash: String,
}

/// Contents of `users.json`: username -> credential.
pub type UserDocument = BTreeMap<String, User>;
