use crate::models::{Party, ResultsSummary, Standing};

pub fn total_votes(parties: &[Party]) -> i64 {
    parties.iter().map(|p| p.votes).sum()
}

pub fn percentage(votes: i64, total: i64) -> f64 {
    if total > 0 {
        votes as f64 * 100.0 / total as f64
    } else {
        0.0
    }
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

/// First party holding strictly the most votes; nobody leads at zero.
pub fn leader(parties: &[Party]) -> Option<&Party> {
    parties.iter().fold(None, |best: Option<&Party>, party| match best {
        Some(b) if b.votes >= party.votes => Some(b),
        _ if party.votes > 0 => Some(party),
        _ => best,
    })
}

pub fn summarize(parties: &[Party]) -> ResultsSummary {
    let total = total_votes(parties);

    let mut standings: Vec<Standing> = parties.iter()
        .map(|party| Standing {
            party: party.clone(),
            percentage: percentage(party.votes, total),
        })
        .collect();
    standings.sort_by(|a, b| {
        b.party.votes.cmp(&a.party.votes)
            .then_with(|| a.party.name.cmp(&b.party.name))
    });

    ResultsSummary {
        total_votes: total,
        leader: leader(parties).cloned(),
        standings,
    }
}
