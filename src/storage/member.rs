//! Member storage: register and look up members by username.

use rusqlite::OptionalExtension;

use crate::model::{Admin, Member, Worker};

use super::{Result, StorageError, Tx, is_constraint_violation};

impl Tx<'_> {
    /// Registers a member. Fails with `AlreadyExists` if the username is taken.
    pub fn insert_member(&self, member: &Member) -> Result<()> {
        let (name, contact) = match member {
            Member::Worker(w) => (&w.name, w.contact.as_deref()),
            Member::Admin(a) => (&a.name, None),
        };
        self.tx
            .execute(
                "INSERT INTO member (username, name, role, contact) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![member.username(), name, member.role(), contact],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    StorageError::AlreadyExists(format!("member '{}'", member.username()))
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }

    /// Looks up a member by username, whatever their role.
    pub fn find_member_by_username(&self, username: &str) -> Result<Option<Member>> {
        let row = self
            .tx
            .query_row(
                "SELECT username, name, role, contact FROM member WHERE username = ?1",
                [username],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((username, name, role, contact)) = row else {
            return Ok(None);
        };
        let member = match role.as_str() {
            "worker" => Member::Worker(Worker {
                username,
                name,
                contact,
            }),
            "admin" => Member::Admin(Admin { username, name }),
            other => {
                return Err(StorageError::Corrupt(format!(
                    "unknown member role: {other}"
                )));
            }
        };
        Ok(Some(member))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::test_support::*;

    fn sample_admin() -> Admin {
        Admin {
            username: "jiho".into(),
            name: "Park Jiho".into(),
        }
    }

    #[test]
    fn insert_and_find_worker() {
        let (_dir, storage) = test_storage();
        let tx = storage.transaction().unwrap();
        tx.insert_member(&Member::Worker(sample_worker())).unwrap();

        let found = tx.find_member_by_username("minji").unwrap().unwrap();
        assert_eq!(found, Member::Worker(sample_worker()));
    }

    #[test]
    fn insert_and_find_admin() {
        let (_dir, storage) = test_storage();
        let tx = storage.transaction().unwrap();
        tx.insert_member(&Member::Admin(sample_admin())).unwrap();

        let found = tx.find_member_by_username("jiho").unwrap().unwrap();
        assert!(matches!(found, Member::Admin(_)));
        assert!(found.into_worker().is_none());
    }

    #[test]
    fn find_missing_member_is_none() {
        let (_dir, storage) = test_storage();
        let tx = storage.read().unwrap();

        assert!(tx.find_member_by_username("ghost").unwrap().is_none());
    }

    #[test]
    fn insert_duplicate_username_fails() {
        let (_dir, storage) = test_storage();
        let tx = storage.transaction().unwrap();
        tx.insert_member(&Member::Worker(sample_worker())).unwrap();

        let err = tx
            .insert_member(&Member::Admin(Admin {
                username: "minji".into(),
                name: "Someone Else".into(),
            }))
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }
}
