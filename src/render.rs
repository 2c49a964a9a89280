//! Read-only views of a schedule for display.

use serde::Serialize;

use crate::models::{Match, PlayerId, Position, Roster, SeatedPair, SlotSet};
use crate::schedule::{Schedule, ScheduleStats};

/// One player at one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatView {
    pub position: Position,
    pub player: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairView {
    pub slot_set: SlotSet,
    pub seats: [SeatView; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchView {
    pub number: u32,
    pub pairs: Vec<PairView>,

    /// Seats that repeat a position the player already had
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repeated: Vec<SeatView>,
}

/// Per-player totals across the whole schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub player: String,
    pub matches: Vec<u32>,
    pub positions: Vec<Position>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleView {
    pub generated_at: String,
    pub seed: Option<u64>,
    pub effective_round_count: u32,
    pub matches: Vec<MatchView>,
    pub players: Vec<PlayerSummary>,
    pub stats: ScheduleStats,
}

fn seat(roster: &Roster, player: PlayerId, position: Position) -> SeatView {
    SeatView {
        position,
        player: roster.name(player),
    }
}

impl PairView {
    pub fn new(pair: &SeatedPair, roster: &Roster) -> Self {
        let [low, high] = pair.assignments();
        Self {
            slot_set: pair.slot_set,
            seats: [seat(roster, low.0, low.1), seat(roster, high.0, high.1)],
        }
    }
}

impl MatchView {
    pub fn new(m: &Match, roster: &Roster) -> Self {
        Self {
            number: m.number,
            pairs: m.pairs.iter().map(|p| PairView::new(p, roster)).collect(),
            repeated: m
                .conflicts
                .iter()
                .map(|c| seat(roster, c.player, c.position))
                .collect(),
        }
    }
}

impl ScheduleView {
    pub fn new(schedule: &Schedule, roster: &Roster) -> Self {
        let players = schedule
            .history
            .iter()
            .map(|(id, h)| PlayerSummary {
                player: roster.name(id),
                matches: h.match_history.clone(),
                positions: h.positions_played.iter().copied().collect(),
            })
            .collect();

        Self {
            generated_at: schedule.generated_at.to_rfc3339(),
            seed: schedule.seed,
            effective_round_count: schedule.effective_round_count,
            matches: schedule
                .matches
                .iter()
                .map(|m| MatchView::new(m, roster))
                .collect(),
            players,
            stats: schedule.stats,
        }
    }
}

/// `"1 Alice - Bob 4"`: low position, both names, high position.
pub fn pair_line(pair: &SeatedPair, roster: &Roster) -> String {
    format!(
        "{} {} - {} {}",
        pair.lower_position(),
        roster.name(pair.lower),
        roster.name(pair.upper),
        pair.upper_position()
    )
}

pub fn match_lines(m: &Match, roster: &Roster) -> Vec<String> {
    let mut lines = vec![format!("Match: {}", m.number)];
    lines.extend(m.pairs.iter().map(|p| format!("  {}", pair_line(p, roster))));

    if !m.conflicts.is_empty() {
        let repeated: Vec<String> = m
            .conflicts
            .iter()
            .map(|c| format!("{}@{}", roster.name(c.player), c.position))
            .collect();
        lines.push(format!("  repeated: {}", repeated.join(", ")));
    }

    lines
}

/// Plain-text schedule, one block per match.
pub fn render_text(schedule: &Schedule, roster: &Roster) -> String {
    let mut out = format!(
        "{} players, {} rounds, {} matches\n",
        roster.len(),
        schedule.effective_round_count,
        schedule.matches.len()
    );

    for m in &schedule.matches {
        out.push('\n');
        for line in match_lines(m, roster) {
            out.push_str(&line);
            out.push('\n');
        }
    }

    out
}

pub fn render_json(schedule: &Schedule, roster: &Roster) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ScheduleView::new(schedule, roster))
}
