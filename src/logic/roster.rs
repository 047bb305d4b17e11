//! Participant roster import from CSV (`id,seed,status`; seed and status optional).

use crate::models::{BracketError, Participant, ParticipantStatus, Tournament};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RosterRow {
    id: String,
    #[serde(default)]
    seed: Option<u32>,
    #[serde(default)]
    status: Option<ParticipantStatus>,
}

/// Read participants from CSV with a header row. Rows must have unique, non-empty ids.
pub fn read_participants<R: Read>(reader: R) -> Result<Vec<Participant>, BracketError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut participants = Vec::new();
    let mut seen = HashSet::new();
    for (index, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let line = index + 2;
        let row = row.map_err(|e| BracketError::Import(format!("line {}: {}", line, e)))?;
        if row.id.is_empty() {
            return Err(BracketError::Import(format!("line {}: empty id", line)));
        }
        if row.seed == Some(0) {
            return Err(BracketError::Import(format!("line {}: seed must be positive", line)));
        }
        if !seen.insert(row.id.clone()) {
            return Err(BracketError::DuplicateParticipant(row.id.into()));
        }
        participants.push(Participant {
            id: row.id.into(),
            seed: row.seed,
            status: row.status.unwrap_or_default(),
        });
    }
    Ok(participants)
}

/// Import a CSV roster into a tournament. All rows are added or none are.
pub fn import_participants<R: Read>(
    tournament: &mut Tournament,
    reader: R,
) -> Result<usize, BracketError> {
    let participants = read_participants(reader)?;
    if let Some(dup) = participants
        .iter()
        .find(|p| tournament.participants.iter().any(|existing| existing.id == p.id))
    {
        return Err(BracketError::DuplicateParticipant(dup.id.clone()));
    }
    let count = participants.len();
    for participant in participants {
        tournament.add_participant(participant)?;
    }
    log::info!("Imported {} participants into tournament {}", count, tournament.id);
    Ok(count)
}
