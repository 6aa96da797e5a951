//! Demand analysis for the price auction.
//!
//! An agent demands the rooms that maximize its net utility `V[i][r] - p[r]`,
//! as long as that utility is not negative. The overdemanded rooms are those
//! left after repeatedly discarding agents that can be served by a room
//! nobody else wants.

use std::collections::HashSet;

use itertools::Itertools;

use super::*;

/// A pair `(agent, room)`: `room` is one of the best affordable rooms for `agent`.
pub type Demand = (Agent, Room);

/// Best net utility of `agent` over all rooms.
pub fn max_utility(valuations: &Valuations, prices: &[Money], agent: Agent) -> Money {
    valuations
        .rooms()
        .map(|room| valuations.utility(agent, room, prices))
        .fold(Money::NEG_INFINITY, Money::max)
}

/// Computes the demand relation at `prices`, in agent-major order.
///
/// Utilities within `eps` of the row maximum count as ties, and utilities
/// above `-eps` count as affordable. Agents with no affordable room do not
/// appear in the result.
pub fn demands(valuations: &Valuations, prices: &[Money], eps: Money) -> Vec<Demand> {
    valuations
        .agents()
        .flat_map(move |agent| {
            let best = max_utility(valuations, prices, agent);
            valuations
                .rooms()
                .filter(move |&room| {
                    let u = valuations.utility(agent, room, prices);
                    u >= best - eps && u >= -eps
                })
                .map(move |room| (agent, room))
        })
        .collect()
}

/// Removes, until none is left, every agent that demands a room demanded by
/// nobody else.
pub fn reduce(mut demands: Vec<Demand>) -> Vec<Demand> {
    loop {
        let counts = demands.iter().map(|&(_, room)| room).counts();
        let satisfied: HashSet<Agent> = demands
            .iter()
            .filter(|(_, room)| counts[room] == 1)
            .map(|&(agent, _)| agent)
            .collect();
        if satisfied.is_empty() {
            return demands;
        }
        demands = demands
            .into_iter()
            .filter(|(agent, _)| !satisfied.contains(agent))
            .collect();
    }
}

/// Distinct rooms, sorted, appearing in `demands`.
pub fn demanded_rooms(demands: &[Demand]) -> Vec<Room> {
    demands.iter().map(|&(_, room)| room).sorted_unstable().dedup().collect()
}

/// Sorted set of overdemanded rooms for the demand relation `demands`.
pub fn overdemanded(demands: &[Demand]) -> Vec<Room> {
    demanded_rooms(&reduce(demands.to_vec()))
}

/// Largest step by which the prices of the rooms in `od` can move before some
/// agent starts demanding a room outside `od`.
///
/// Only agents whose whole, non-empty, demand set lies in `od` constrain the
/// step. Returns `None` when no agent does, or when `od` covers every room.
pub fn increment(
    valuations: &Valuations,
    prices: &[Money],
    demands: &[Demand],
    od: &[Room],
) -> Option<Money> {
    let outside = valuations.rooms().filter(|room| !od.contains(room)).collect_vec();
    if outside.is_empty() {
        return None;
    }
    demands
        .iter()
        .copied()
        .into_group_map()
        .into_iter()
        .filter(|(_, rooms)| rooms.iter().all(|room| od.contains(room)))
        .map(|(agent, _)| {
            let best_outside = outside
                .iter()
                .map(|&room| valuations.utility(agent, room, prices))
                .fold(Money::NEG_INFINITY, Money::max);
            max_utility(valuations, prices, agent) - best_outside
        })
        .min_by(Money::total_cmp)
}
