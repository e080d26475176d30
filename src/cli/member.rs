//! Member directory commands: add.

use clap::Subcommand;

use crate::{
    model::{Admin, Member, Worker},
    storage::Storage,
};

#[derive(Debug, Subcommand)]
pub enum MemberCommand {
    /// Register a member. Workers by default.
    Add {
        /// Login name. Research requests refer to the researcher by this name.
        username: String,

        /// Display name.
        name: String,

        /// Register as an admin instead of a worker.
        /// Admins cannot file research reports.
        #[arg(long, conflicts_with = "contact")]
        admin: bool,

        /// Contact number or address (workers only).
        #[arg(long)]
        contact: Option<String>,
    },
}

pub(super) fn run(storage: &Storage, command: MemberCommand) -> Result<(), String> {
    match command {
        MemberCommand::Add {
            username,
            name,
            admin,
            contact,
        } => {
            let member = if admin {
                Member::Admin(Admin { username, name })
            } else {
                Member::Worker(Worker {
                    username,
                    name,
                    contact,
                })
            };
            cmd_add(storage, &member)
        }
    }
}

fn cmd_add(storage: &Storage, member: &Member) -> Result<(), String> {
    let tx = storage
        .transaction()
        .map_err(|e| format!("failed to open storage: {e}"))?;
    tx.insert_member(member)
        .map_err(|e| format!("failed to add member: {e}"))?;
    tx.commit()
        .map_err(|e| format!("failed to add member: {e}"))?;

    eprintln!("Member {} added as {}", member.username(), member.role());
    Ok(())
}
