use std::fmt;

use super::*;

/// A room assignment: agent `i` lives in room `rooms[i]`.
#[derive(Clone, Debug)]
pub struct Assignment<'a> {
    pub valuations: &'a Valuations,
    rooms: Vec<Room>,
}

/// An agent that strictly prefers another agent's room at its price.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Envy {
    pub agent: Agent,
    pub room: Room,
    pub envied_agent: Agent,
    pub envied_room: Room,
    /// Net utility of `agent` in its own room.
    pub utility: Money,
    /// Net utility `agent` would get in `envied_room`.
    pub envied_utility: Money,
}

impl fmt::Display for Envy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "agent {} has room {} (utility {}), but prefers room {} of agent {} (utility {})",
            self.agent, self.room, self.utility, self.envied_room, self.envied_agent, self.envied_utility
        )
    }
}

impl<'a> Assignment<'a> {
    /// First room of `rooms` that is out of range or already taken.
    fn _misplaced_room(rooms: &[Room]) -> Option<Room> {
        let mut seen = vec![false; rooms.len()];
        for &r in rooms {
            if r >= rooms.len() || seen[r] {
                return Some(r);
            }
            seen[r] = true;
        }
        None
    }

    fn _is_permutation(rooms: &[Room]) -> bool {
        Self::_misplaced_room(rooms).is_none()
    }

    pub fn new_unchecked(valuations: &'a Valuations, rooms: Vec<Room>) -> Self {
        Assignment { valuations, rooms }
    }

    pub fn from_vec(valuations: &'a Valuations, rooms: Vec<Room>) -> Self {
        debug_assert_eq!(
            rooms.len(),
            valuations.agent_count(),
            "The length of rooms should be equal to the number of agents."
        );
        debug_assert!(
            Self::_is_permutation(&rooms),
            "The vector rooms should be a permutation of the room numbers."
        );
        Self::new_unchecked(valuations, rooms)
    }

    /// Like [`Assignment::from_vec`], but fails instead of trusting `rooms`.
    pub fn try_from_vec(valuations: &'a Valuations, rooms: Vec<Room>) -> Result<Self> {
        let expected = valuations.agent_count();
        if rooms.len() != expected {
            return Err(ValidationError::AssignmentLength { len: rooms.len(), expected }.into());
        }
        if let Some(room) = Self::_misplaced_room(&rooms) {
            return Err(ValidationError::NotAPermutation { room }.into());
        }
        Ok(Self::new_unchecked(valuations, rooms))
    }

    pub fn agent_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn agents(&self) -> impl Iterator<Item = Agent> {
        self.valuations.agents()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn agent_room(&self, ag: Agent) -> Room {
        debug_assert!(ag < self.agent_count(), "Agent number out of range.");
        self.rooms[ag]
    }

    /// Valuation of `ag` for its own room, before prices.
    pub fn agent_valuation(&self, ag: Agent) -> Money {
        self.valuations[(ag, self.agent_room(ag))]
    }

    pub fn agent_utility(&self, ag: Agent, prices: &[Money]) -> Money {
        self.valuations.utility(ag, self.agent_room(ag), prices)
    }

    pub fn total_valuation(&self) -> Money {
        self.agents().map(|ag| self.agent_valuation(ag)).sum()
    }

    /// Returns `true` when no other assignment has a larger total valuation.
    pub fn is_efficient(&self) -> bool {
        self.is_efficient_with_tolerance(DEFAULT_TOLERANCE)
    }

    pub fn is_efficient_with_tolerance(&self, tolerance: Money) -> bool {
        let eps = self.valuations.epsilon(tolerance) * self.agent_count() as Money;
        self.total_valuation() >= self.valuations.social_surplus() - eps
    }

    /// Envy of `ag` towards `other`, if `ag` strictly prefers the room of
    /// `other` by more than `eps`.
    pub fn envy_towards(&self, ag: Agent, other: Agent, prices: &[Money], eps: Money) -> Option<Envy> {
        debug_assert!(ag < self.agent_count(), "Agent number out of range.");
        debug_assert!(other < self.agent_count(), "Agent number out of range.");
        let room = self.agent_room(ag);
        let envied_room = self.agent_room(other);
        let utility = self.valuations.utility(ag, room, prices);
        let envied_utility = self.valuations.utility(ag, envied_room, prices);
        (envied_utility > utility + eps).then_some(Envy {
            agent: ag,
            room,
            envied_agent: other,
            envied_room,
            utility,
            envied_utility,
        })
    }

    /// All envious pairs, in agent order.
    pub fn envies<'b>(&'b self, prices: &'b [Money], eps: Money) -> impl Iterator<Item = Envy> + 'b {
        self.agents().flat_map(move |ag| {
            self.agents()
                .filter_map(move |other| self.envy_towards(ag, other, prices, eps))
        })
    }

    /// First envious pair under `prices`, using the default tolerance.
    pub fn find_envy(&self, prices: &[Money]) -> Option<Envy> {
        self.find_envy_with_tolerance(prices, DEFAULT_TOLERANCE)
    }

    /// First envious pair under `prices`. `tolerance` is relative, as in
    /// [`AuctionConfig::tolerance`].
    pub fn find_envy_with_tolerance(&self, prices: &[Money], tolerance: Money) -> Option<Envy> {
        self.envies(prices, self.valuations.epsilon(tolerance)).next()
    }

    pub fn is_envy_free(&self, prices: &[Money]) -> bool {
        self.find_envy(prices).is_none()
    }

    pub fn is_envy_free_with_tolerance(&self, prices: &[Money], tolerance: Money) -> bool {
        self.find_envy_with_tolerance(prices, tolerance).is_none()
    }

    /// `(agent, room)` pairs in agent order.
    pub fn to_pairs(&self) -> Vec<(Agent, Room)> {
        self.rooms.iter().copied().enumerate().collect()
    }
}

impl<'a> PartialEq for Assignment<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.valuations, other.valuations) && self.rooms == other.rooms
    }
}

/// Checks that no agent prefers another agent's room at its price.
///
/// Fails if `rooms` is not a permutation of the rooms of `valuations`, or if
/// there is not exactly one price per room.
pub fn is_envy_free(rooms: &[Room], prices: &[Money], valuations: &Valuations) -> Result<bool> {
    Ok(find_envy(rooms, prices, valuations)?.is_none())
}

/// Like [`is_envy_free`], but reports the first violation.
pub fn find_envy(rooms: &[Room], prices: &[Money], valuations: &Valuations) -> Result<Option<Envy>> {
    let mu = Assignment::try_from_vec(valuations, rooms.to_vec())?;
    valuations.check_prices(prices)?;
    Ok(mu.find_envy(prices))
}

/// Lexicographic enumeration of all permutations of the rooms.
pub struct Assignments<'a> {
    mu: Assignment<'a>,
    started: bool,
}

impl<'a> Assignments<'a> {
    pub fn new(valuations: &'a Valuations) -> Assignments<'a> {
        let mu = Assignment::new_unchecked(valuations, valuations.rooms().collect());
        Assignments { mu, started: false }
    }

    fn mu_next(&mut self) -> bool {
        if !self.started {
            self.started = true;
            return true;
        }
        let rooms = &mut self.mu.rooms;
        let n = rooms.len();
        let Some(i) = (0..n.saturating_sub(1)).rev().find(|&i| rooms[i] < rooms[i + 1]) else {
            return false;
        };
        let j = (i + 1..n).rev().find(|&j| rooms[j] > rooms[i]).unwrap_or(i + 1);
        rooms.swap(i, j);
        rooms[i + 1..].reverse();
        true
    }

    pub fn next_lending(&mut self) -> Option<&Assignment<'a>> {
        if self.mu_next() { Some(&self.mu) } else { None }
    }
}

impl<'a> Iterator for Assignments<'a> {
    type Item = Assignment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_lending().cloned()
    }
}
