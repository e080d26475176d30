//! Beach storage: register, look up, and list beaches.

use rusqlite::OptionalExtension;

use crate::model::{Beach, Coordinate};

use super::{Result, StorageError, Tx, is_constraint_violation};

impl Tx<'_> {
    /// Registers a beach. Fails with `AlreadyExists` if the name is taken.
    pub fn insert_beach(&self, beach: &Beach) -> Result<()> {
        self.tx
            .execute(
                "INSERT INTO beach (name, region, latitude, longitude) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    &beach.name,
                    &beach.region,
                    beach.center.map(|c| c.latitude),
                    beach.center.map(|c| c.longitude),
                ],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    StorageError::AlreadyExists(format!("beach '{}'", beach.name))
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }

    /// Looks up a beach by its exact name.
    pub fn find_beach_by_name(&self, name: &str) -> Result<Option<Beach>> {
        let beach = self
            .tx
            .query_row(
                "SELECT name, region, latitude, longitude FROM beach WHERE name = ?1",
                [name],
                beach_from_row,
            )
            .optional()?;
        Ok(beach)
    }

    /// Lists all beaches ordered by name.
    pub fn list_beaches(&self) -> Result<Vec<Beach>> {
        let mut stmt = self
            .tx
            .prepare("SELECT name, region, latitude, longitude FROM beach ORDER BY name")?;
        let beaches = stmt
            .query_map([], beach_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(beaches)
    }
}

/// Maps `name, region, latitude, longitude` columns to a `Beach`.
///
/// A centre is only present when both coordinates are.
fn beach_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Beach> {
    let latitude: Option<f64> = row.get(2)?;
    let longitude: Option<f64> = row.get(3)?;
    Ok(Beach {
        name: row.get(0)?,
        region: row.get(1)?,
        center: latitude.zip(longitude).map(|(lat, lon)| Coordinate::new(lat, lon)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::test_support::*;

    #[test]
    fn insert_and_find_beach() {
        let (_dir, storage) = test_storage();
        let tx = storage.transaction().unwrap();
        tx.insert_beach(&sample_beach()).unwrap();

        let found = tx.find_beach_by_name("Haeundae").unwrap().unwrap();
        assert_eq!(found, sample_beach());
    }

    #[test]
    fn find_missing_beach_is_none() {
        let (_dir, storage) = test_storage();
        let tx = storage.read().unwrap();

        assert!(tx.find_beach_by_name("Nowhere").unwrap().is_none());
    }

    #[test]
    fn insert_duplicate_beach_fails() {
        let (_dir, storage) = test_storage();
        let tx = storage.transaction().unwrap();
        tx.insert_beach(&sample_beach()).unwrap();

        let err = tx.insert_beach(&sample_beach()).unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[test]
    fn beach_without_center_round_trips() {
        let (_dir, storage) = test_storage();
        let tx = storage.transaction().unwrap();
        let beach = Beach {
            name: "Songjeong".into(),
            region: None,
            center: None,
        };
        tx.insert_beach(&beach).unwrap();

        assert_eq!(tx.find_beach_by_name("Songjeong").unwrap(), Some(beach));
    }

    #[test]
    fn list_beaches_sorted_by_name() {
        let (_dir, storage) = test_storage();
        let tx = storage.transaction().unwrap();
        for name in ["Songjeong", "Dadaepo", "Haeundae"] {
            tx.insert_beach(&Beach {
                name: name.into(),
                region: None,
                center: None,
            })
            .unwrap();
        }

        let names: Vec<String> = tx
            .list_beaches()
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, ["Dadaepo", "Haeundae", "Songjeong"]);
    }
}
