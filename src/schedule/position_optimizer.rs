//! Seating the three pairs of a match.
//!
//! A conflict is a player seated at a position they have already played.
//! Position 1 is protected first, then the total number of conflicts is kept
//! as low as the three pairs allow:
//!
//! - Step A tries all six pair-to-slot-set permutations.
//! - Step B orders the two players inside each pair.
//! - Step C swaps the position-1 pair with another pair if that clears a
//!   position-1 conflict Steps A and B left behind.
//!
//! `optimize` never touches history; `commit` records the final positions.

use tracing::{debug, warn};

use crate::models::{
    History, Match, MatchError, Pair, PositionConflict, SeatedPair, SlotSet, POSITION_ONE,
};

/// `PERMUTATIONS[k][s]` is the input pair seated on slot-set `s`. Step A keeps
/// the first best permutation in this order.
const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// The optimizer's answer for one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seating {
    /// Seated pairs in table order (A, B, C)
    pub pairs: [SeatedPair; 3],

    /// Conflicts that could not be avoided
    pub conflicts: Vec<PositionConflict>,
}

impl Seating {
    pub fn has_position_one_conflict(&self) -> bool {
        self.conflicts.iter().any(|c| c.position == POSITION_ONE)
    }

    pub fn into_match(self, number: u32) -> Result<Match, MatchError> {
        Match::new(number, self.pairs, self.conflicts)
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    arrangement: [SeatedPair; 3],
    total: usize,
    position_one: usize,
}

/// Chooses slot-sets and seat order for a match's three pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionOptimizer;

impl PositionOptimizer {
    /// Seat `pairs` against the positions already recorded in `history`.
    ///
    /// Deterministic: the same pairs and history always give the same seating.
    pub fn optimize(&self, pairs: [Pair; 3], history: &History) -> Seating {
        let mut seated = assign_slot_sets(&pairs, history);

        for pair in seated.iter_mut() {
            *pair = orient(*pair, history);
        }

        if position_one_conflicts(&seated[SlotSet::A.index()], history) > 0
            && !repair_position_one(&mut seated, history)
        {
            warn!(
                "Position 1 conflict left in place for {}",
                seated[SlotSet::A.index()].lower
            );
        }

        Seating {
            conflicts: collect_conflicts(&seated, history),
            pairs: seated,
        }
    }

    /// Record every player's final position.
    pub fn commit(&self, seating: &Seating, history: &mut History) {
        for pair in &seating.pairs {
            for (player, position) in pair.assignments() {
                history.record_position(player, position);
            }
        }
    }
}

fn conflicts(pair: &SeatedPair, history: &History) -> usize {
    pair.assignments()
        .iter()
        .filter(|(player, position)| history.has_played_position(*player, *position))
        .count()
}

fn position_one_conflicts(pair: &SeatedPair, history: &History) -> usize {
    usize::from(
        pair.slot_set.holds_position_one() && history.has_played_position(pair.lower, POSITION_ONE),
    )
}

/// Position 1 first, then total conflicts. Lower is better.
fn orientation_key(pair: &SeatedPair, history: &History) -> (usize, usize) {
    (
        position_one_conflicts(pair, history),
        conflicts(pair, history),
    )
}

/// Step A: pick the slot-set for each pair.
fn assign_slot_sets(pairs: &[Pair; 3], history: &History) -> [SeatedPair; 3] {
    let evaluate = |perm: &[usize; 3]| {
        let arrangement = SlotSet::ALL.map(|slot_set| pairs[perm[slot_set.index()]].seat(slot_set));
        Candidate {
            total: arrangement.iter().map(|p| conflicts(p, history)).sum(),
            position_one: position_one_conflicts(&arrangement[SlotSet::A.index()], history),
            arrangement,
        }
    };

    let mut lowest = evaluate(&PERMUTATIONS[0]);
    let mut best = (lowest.position_one == 0).then_some(lowest);

    for perm in &PERMUTATIONS[1..] {
        let candidate = evaluate(perm);
        if candidate.position_one == 0 && best.map_or(true, |b| candidate.total < b.total) {
            best = Some(candidate);
        }
        if candidate.total < lowest.total {
            lowest = candidate;
        }
    }

    let chosen = best.unwrap_or(lowest);
    debug!(
        "Slot-sets chosen with {} conflicts ({} at position 1)",
        chosen.total, chosen.position_one
    );
    chosen.arrangement
}

/// Step B: swap the two players if that strictly improves the pair.
fn orient(pair: SeatedPair, history: &History) -> SeatedPair {
    let swapped = pair.swapped();
    if orientation_key(&swapped, history) < orientation_key(&pair, history) {
        debug!(
            "Swapped {} and {} on {}",
            pair.lower, pair.upper, pair.slot_set
        );
        swapped
    } else {
        pair
    }
}

/// Step C: trade slot-sets between the position-1 pair and the first other
/// pair whose swap clears position 1 without adding a conflict to either.
fn repair_position_one(seated: &mut [SeatedPair; 3], history: &History) -> bool {
    let head_index = SlotSet::A.index();
    let head = seated[head_index];

    for other_index in [SlotSet::B.index(), SlotSet::C.index()] {
        let other = seated[other_index];
        let new_head = orient(other.moved_to(SlotSet::A), history);
        let new_other = orient(head.moved_to(other.slot_set), history);

        let clears = position_one_conflicts(&new_head, history) == 0;
        let before = collect_conflicts(&[head, other], history);
        let no_new_conflicts = collect_conflicts(&[new_head, new_other], history)
            .iter()
            .all(|c| before.contains(c));

        if clears && no_new_conflicts {
            debug!("Moved pair off position 1 to {}", other.slot_set);
            seated[head_index] = new_head;
            seated[other_index] = new_other;
            return true;
        }
    }

    false
}

/// Seats whose position is already in that player's history.
fn collect_conflicts(seated: &[SeatedPair], history: &History) -> Vec<PositionConflict> {
    seated
        .iter()
        .flat_map(|p| p.assignments())
        .filter(|(player, position)| history.has_played_position(*player, *position))
        .map(|(player, position)| PositionConflict { player, position })
        .collect()
}
