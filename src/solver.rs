//! Finds the cheapest combination of segment tickets covering the whole itinerary.
//!
//! Tickets only run forward along the itinerary, so the segments form a DAG ordered by
//! station index and a single forward pass settles every station.

use tracing::{debug, trace};

use crate::fares::{Fare, FareMatrix, Route, Segment};

/// Computes the cheapest chain of tickets from the first to the last station.
///
/// Returns `None` when no chain of known fares connects the two, counting chains whose
/// total overflows as unconnected. Among equally cheap
/// chains, each station keeps the predecessor with the lowest index.
pub fn cheapest_route(matrix: &FareMatrix) -> Option<Route> {
    let n = matrix.n();
    if n < 2 {
        return None;
    }

    // cost[i]: cheapest way found so far to reach station i, `None` while unreachable
    let mut cost: Vec<Option<Fare>> = vec![None; n];
    // prev[i]: the station the cheapest ticket into i starts from
    let mut prev: Vec<Option<usize>> = vec![None; n];
    cost[0] = Some(Fare::ZERO);

    for i in 1..n {
        for j in 0..i {
            let (Some(reached), Some(fare)) = (cost[j], matrix.fare(Segment::new(j, i))) else {
                continue;
            };
            // A total too large to represent cannot be bought
            let Some(candidate) = reached.checked_add(fare) else {
                trace!("Fare total via station {} to {} overflows, skipping", j, i);
                continue;
            };
            // Strict comparison: the first minimum in index order wins
            if cost[i].map_or(true, |best| candidate < best) {
                cost[i] = Some(candidate);
                prev[i] = Some(j);
            }
        }
    }

    let Some(total) = cost[n - 1] else {
        debug!("No route from {:?} to {:?}", matrix.first_station(), matrix.last_station());
        return None;
    };

    // Walk back from the destination; station 0 is the only station without a predecessor
    let mut segments = vec![];
    let mut fares = vec![];
    let mut current = n - 1;
    while let Some(from) = prev[current] {
        let segment = Segment::new(from, current);
        segments.push(segment);
        // prev is only recorded for segments with a known fare
        fares.extend(matrix.fare(segment));
        current = from;
    }
    segments.reverse();
    fares.reverse();

    debug!("Cheapest route costs {} using {} ticket(s)", total, segments.len());
    Some(Route { cost: total, segments, fares })
}
