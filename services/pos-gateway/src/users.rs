use common_auth::{Role, TokenSubject};
use serde::Serialize;
use subtle::ConstantTimeEq;

/// A login the gateway accepts. Passwords are plain demo values.
#[derive(Debug, Clone)]
pub struct DemoUser {
    pub id: u64,
    pub username: String,
    password: String,
    pub role: Role,
    pub name: String,
}

impl DemoUser {
    pub fn new(
        id: u64,
        username: impl Into<String>,
        password: impl Into<String>,
        role: Role,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
            role,
            name: name.into(),
        }
    }

    pub fn subject(&self) -> TokenSubject {
        TokenSubject {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            name: self.name.clone(),
        }
    }
}

/// User record returned by login, without the password.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<DemoUser>,
}

impl UserDirectory {
    pub fn new(users: Vec<DemoUser>) -> Self {
        Self { users }
    }

    /// The three built-in accounts.
    pub fn demo() -> Self {
        Self::new(vec![
            DemoUser::new(1, "admin", "admin123", Role::Admin, "Administrator"),
            DemoUser::new(2, "staff", "staff123", Role::Staff, "Staff Member"),
            DemoUser::new(3, "manager", "manager123", Role::Manager, "Store Manager"),
        ])
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Option<&DemoUser> {
        self.users.iter().find(|user| {
            user.username == username
                && bool::from(user.password.as_bytes().ct_eq(password.as_bytes()))
        })
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.users.iter().map(|user| user.username.as_str())
    }
}
