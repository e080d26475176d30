//! Beach directory commands: add, list.

use clap::Subcommand;

use crate::{
    model::{Beach, Coordinate},
    storage::Storage,
};

#[derive(Debug, Subcommand)]
pub enum BeachCommand {
    /// Register a beach.
    Add {
        /// Beach name. Research requests refer to the beach by this name.
        name: String,

        /// Administrative region (e.g. "Busan Haeundae-gu").
        #[arg(long)]
        region: Option<String>,

        /// Latitude of the beach centre, in decimal degrees.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the beach centre, in decimal degrees.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// List registered beaches.
    List,
}

pub(super) fn run(storage: &Storage, command: BeachCommand) -> Result<(), String> {
    match command {
        BeachCommand::Add {
            name,
            region,
            lat,
            lon,
        } => {
            let beach = Beach {
                name,
                region,
                center: lat.zip(lon).map(|(lat, lon)| Coordinate::new(lat, lon)),
            };
            cmd_add(storage, &beach)
        }
        BeachCommand::List => cmd_list(storage),
    }
}

fn cmd_add(storage: &Storage, beach: &Beach) -> Result<(), String> {
    let tx = storage
        .transaction()
        .map_err(|e| format!("failed to open storage: {e}"))?;
    tx.insert_beach(beach)
        .map_err(|e| format!("failed to add beach: {e}"))?;
    tx.commit()
        .map_err(|e| format!("failed to add beach: {e}"))?;

    eprintln!("Beach {} added", beach.name);
    Ok(())
}

fn cmd_list(storage: &Storage) -> Result<(), String> {
    let tx = storage
        .read()
        .map_err(|e| format!("failed to open storage: {e}"))?;
    let beaches = tx
        .list_beaches()
        .map_err(|e| format!("failed to list beaches: {e}"))?;

    if beaches.is_empty() {
        println!("No beaches");
        return Ok(());
    }

    for b in &beaches {
        let region = b.region.as_deref().unwrap_or("-");
        match b.center {
            Some(c) => println!("{}  [{region}]  ({:.4}, {:.4})", b.name, c.latitude, c.longitude),
            None => println!("{}  [{region}]", b.name),
        }
    }

    Ok(())
}
