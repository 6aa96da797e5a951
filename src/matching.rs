//! Maximum-weight perfect matching between agents and rooms (Hungarian method).
//!
//! Dense O(n^3) implementation with row and column potentials. Valuations are
//! negated so that the minimum-cost formulation yields the maximum total
//! valuation.

use super::*;

/// Returns, for each agent, the room it receives in some assignment of
/// maximum total valuation.
pub(crate) fn max_weight_matching(valuations: &Valuations) -> Vec<Room> {
    let n = valuations.agent_count();
    if n == 0 {
        return Vec::new();
    }

    let cost = |agent: Agent, room: Room| -valuations[(agent, room)];
    let inf = Money::INFINITY;
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; n + 1];
    let mut owner = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for agent in 1..=n {
        owner[0] = agent;
        let mut j0 = 0usize;
        let mut minv = vec![inf; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = inf;
            let mut j1 = 0usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut rooms = vec![0; n];
    for j in 1..=n {
        if owner[j] > 0 {
            rooms[owner[j] - 1] = j - 1;
        }
    }
    rooms
}
