// src/auth/mod.rs

use sha2::{Digest, Sha256};

use crate::models::{Department, Role, StaffUser};

/// Fixed staff directory. This is a stand-in for a real credential store:
/// accounts are seeded at startup and never created or destroyed at runtime.
pub struct StaffDirectory {
    users: Vec<StaffUser>,
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl StaffDirectory {
    /// The pilot deployment's three accounts: one admin plus one staff
    /// account per piloted department.
    pub fn seeded() -> Self {
        Self {
            users: vec![
                StaffUser {
                    id: "1".into(),
                    username: "admin".into(),
                    // admin123
                    password_digest: "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
                        .into(),
                    department: Department::Other,
                    role: Role::Admin,
                    name: "Admin User".into(),
                },
                StaffUser {
                    id: "2".into(),
                    username: "roads".into(),
                    // roads123
                    password_digest: "c00cbc08cbe31c17f3aba0a470f5d6348d0557b0bdaf73e1f4a213212ad42dff"
                        .into(),
                    department: Department::Roads,
                    role: Role::Staff,
                    name: "Roads Department".into(),
                },
                StaffUser {
                    id: "3".into(),
                    username: "water".into(),
                    // water123
                    password_digest: "b2c01a98ab998a1aa7d031863431752c0c76fbfb3e9ddce4059a6a2b48f77a6f"
                        .into(),
                    department: Department::Water,
                    role: Role::Staff,
                    name: "Water Department".into(),
                },
            ],
        }
    }

    /// Credential check against the static list. `None` covers both an
    /// unknown username and a wrong password; callers get no distinction.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&StaffUser> {
        let digest = sha256_hex(password);
        self.users
            .iter()
            .find(|u| u.username == username && u.password_digest == digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_credentials_authenticate() {
        let directory = StaffDirectory::seeded();

        let admin = directory.authenticate("admin", "admin123").unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.name, "Admin User");

        let roads = directory.authenticate("roads", "roads123").unwrap();
        assert_eq!(roads.role, Role::Staff);
        assert_eq!(roads.department, Department::Roads);
    }

    #[test]
    fn bad_credentials_fail_closed() {
        let directory = StaffDirectory::seeded();

        assert!(directory.authenticate("admin", "wrong").is_none());
        assert!(directory.authenticate("nobody", "admin123").is_none());
        assert!(directory.authenticate("admin", "").is_none());
    }

    #[test]
    fn admins_see_every_department_staff_see_their_own() {
        let directory = StaffDirectory::seeded();

        let admin = directory.authenticate("admin", "admin123").unwrap();
        assert_eq!(admin.department_scope(), None);

        let water = directory.authenticate("water", "water123").unwrap();
        assert_eq!(water.department_scope(), Some(Department::Water));
    }
}
