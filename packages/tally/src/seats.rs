//! Seat allocation with the D'Hondt highest-averages method.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::election::Election;
use crate::types::Party;

/// Allocate `total_seats` seats proportionally to `party_votes`.
///
/// Each round awards a seat to the party with the greatest quotient
/// `votes / (seats + 1)`. Quotients are compared exactly by
/// cross-multiplication; on a tie the party whose name sorts first wins.
/// Every party in the input appears in the output. If no party has votes,
/// nobody gets a seat.
///
/// # Example
/// ```
/// use std::collections::BTreeMap;
/// use kiesuitslag_tally::seats::allocate_seats;
///
/// let votes = BTreeMap::from([
///     ("A".to_string(), 4200),
///     ("B".to_string(), 3500),
///     ("C".to_string(), 2300),
/// ]);
/// let seats = allocate_seats(&votes, 10);
/// assert_eq!(seats["A"], 4);
/// assert_eq!(seats["B"], 4);
/// assert_eq!(seats["C"], 2);
/// ```
#[must_use]
pub fn allocate_seats(party_votes: &BTreeMap<String, u64>, total_seats: u32) -> BTreeMap<String, u32> {
    let mut seats: BTreeMap<String, u32> =
        party_votes.keys().map(|party| (party.clone(), 0)).collect();

    if party_votes.values().all(|&votes| votes == 0) {
        return seats;
    }

    for _ in 0..total_seats {
        // BTreeMap iterates in name order; only a strictly greater quotient
        // replaces the current best, so ties go to the first name.
        let mut best: Option<(&str, u64, u32)> = None;
        for (party, &votes) in party_votes {
            let current = seats.get(party).copied().unwrap_or(0);
            let better = match best {
                None => true,
                Some((_, best_votes, best_seats)) => {
                    compare_quotients(votes, current, best_votes, best_seats) == Ordering::Greater
                }
            };
            if better {
                best = Some((party.as_str(), votes, current));
            }
        }

        if let Some((party, _, _)) = best {
            if let Some(count) = seats.get_mut(party) {
                *count += 1;
            }
        }
    }

    seats
}

/// Compare `a_votes / (a_seats + 1)` with `b_votes / (b_seats + 1)`.
fn compare_quotients(a_votes: u64, a_seats: u32, b_votes: u64, b_seats: u32) -> Ordering {
    let left = u128::from(a_votes) * (u128::from(b_seats) + 1);
    let right = u128::from(b_votes) * (u128::from(a_seats) + 1);
    left.cmp(&right)
}

/// National votes per party, summing entries that share a name.
#[must_use]
pub fn national_vote_totals(election: &Election) -> BTreeMap<String, u64> {
    let mut totals = BTreeMap::new();
    for party in election.national_results() {
        *totals.entry(party.name.clone()).or_insert(0) += party.votes;
    }
    totals
}

/// National results with a computed seat distribution.
///
/// Returns one [`Party`] per party name with summed votes, D'Hondt seats and
/// the percentage of the national vote, sorted by votes descending then
/// name.
#[must_use]
pub fn national_seat_distribution(election: &Election, total_seats: u32) -> Vec<Party> {
    let totals = national_vote_totals(election);
    let seats = allocate_seats(&totals, total_seats);
    let all_votes: u64 = totals.values().sum();

    let mut parties: Vec<Party> = totals
        .into_iter()
        .map(|(name, votes)| {
            let mut party = Party::with_votes(election.id(), name, votes);
            party.seats = seats.get(&party.name).copied().unwrap_or(0);
            party.percentage = if all_votes == 0 {
                0.0
            } else {
                votes as f64 * 100.0 / all_votes as f64
            };
            party
        })
        .collect();

    parties.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.name.cmp(&b.name)));
    parties
}
