use std::ops::Index;

use grid::*;

use super::*;

/// Square matrix of valuations: entry `(agent, room)` is how much `agent`
/// values `room`.
///
/// A `Valuations` value is always non-empty, square, finite and non-negative.
#[derive(Clone, Debug, PartialEq)]
pub struct Valuations {
    weights: Grid<Money>,
}

impl Valuations {
    /// Validates the shape and the entries of `weights`.
    pub fn from_grid(weights: Grid<Money>) -> Result<Self> {
        let (rows, cols) = weights.size();
        if rows == 0 || cols == 0 {
            return Err(ValidationError::Empty.into());
        }
        if rows != cols {
            return Err(ValidationError::NotSquare { rows, cols }.into());
        }
        for ((agent, room), &value) in weights.indexed_iter() {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { agent, room, value }.into());
            }
            if value < 0.0 {
                return Err(ValidationError::Negative { agent, room, value }.into());
            }
        }
        Ok(Valuations { weights })
    }

    /// Builds the matrix from one row per agent.
    pub fn from_rows(rows: Vec<Vec<Money>>) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(ValidationError::Empty.into());
        };
        let cols = first.len();
        if cols == 0 {
            return Err(ValidationError::Empty.into());
        }
        for (agent, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ValidationError::Ragged {
                    agent,
                    len: row.len(),
                    expected: cols,
                }
                .into());
            }
        }
        Self::from_grid(Grid::from_vec(rows.into_iter().flatten().collect(), cols))
    }

    /// Number of agents, which is also the number of rooms.
    pub fn agent_count(&self) -> usize {
        self.weights.rows()
    }

    /// Iterator over agent identifiers.
    pub fn agents(&self) -> impl Iterator<Item = Agent> {
        0..self.weights.rows()
    }

    /// Iterator over room identifiers.
    pub fn rooms(&self) -> impl Iterator<Item = Room> {
        0..self.weights.cols()
    }

    /// Valuations of `agent` for every room.
    pub fn row(&self, agent: Agent) -> impl Iterator<Item = Money> + '_ {
        debug_assert!(agent < self.agent_count(), "Agent number out of range.");
        self.weights.iter_row(agent).copied()
    }

    /// Total valuation of `agent` over all rooms.
    pub fn row_sum(&self, agent: Agent) -> Money {
        self.row(agent).sum()
    }

    /// Largest valuation in the matrix.
    pub fn max_value(&self) -> Money {
        self.weights.iter().copied().fold(0.0, Money::max)
    }

    /// Absolute comparison threshold for a relative `tolerance`, scaled by the
    /// largest valuation.
    pub fn epsilon(&self, tolerance: Money) -> Money {
        tolerance * self.max_value().max(1.0)
    }

    /// Fails unless there is exactly one price per room.
    pub fn check_prices(&self, prices: &[Money]) -> Result<()> {
        let expected = self.agent_count();
        if prices.len() != expected {
            return Err(ValidationError::PriceCount { len: prices.len(), expected }.into());
        }
        Ok(())
    }

    /// Net utility of `room` for `agent` at the given prices.
    pub fn utility(&self, agent: Agent, room: Room, prices: &[Money]) -> Money {
        debug_assert_eq!(prices.len(), self.agent_count(), "One price per room is required.");
        self.weights[(agent, room)] - prices[room]
    }

    /// Maximum total valuation over all assignments, computed by an optimal
    /// matching.
    pub fn social_surplus(&self) -> Money {
        matching::max_weight_matching(self)
            .into_iter()
            .enumerate()
            .map(|(agent, room)| self.weights[(agent, room)])
            .sum()
    }

    pub fn assignment<'a>(&'a self, rooms: Vec<Room>) -> Assignment<'a> {
        Assignment::from_vec(self, rooms)
    }

    /// Every assignment of rooms to agents, in lexicographic order.
    pub fn assignments<'a>(&'a self) -> Assignments<'a> {
        Assignments::new(self)
    }

    /// All assignments whose total valuation reaches the social surplus.
    ///
    /// This walks all `n!` permutations and is meant for small instances.
    pub fn efficient_assignments<'a>(&'a self) -> Vec<Assignment<'a>> {
        self.efficient_assignments_with_tolerance(DEFAULT_TOLERANCE)
    }

    /// Like [`Valuations::efficient_assignments`], with a relative `tolerance`
    /// on the total valuation.
    pub fn efficient_assignments_with_tolerance<'a>(&'a self, tolerance: Money) -> Vec<Assignment<'a>> {
        let surplus = self.social_surplus();
        let eps = self.epsilon(tolerance) * self.agent_count() as Money;
        self.assignments()
            .filter(|mu| (mu.total_valuation() - surplus).abs() <= eps)
            .collect()
    }
}

impl Index<(Agent, Room)> for Valuations {
    type Output = Money;

    /// Returns the valuation at `(agent, room)`.
    fn index(&self, index: (Agent, Room)) -> &Self::Output {
        &self.weights[index]
    }
}

impl TryFrom<Grid<Money>> for Valuations {
    type Error = RentError;

    fn try_from(weights: Grid<Money>) -> Result<Self> {
        Self::from_grid(weights)
    }
}

/// Enumerates the assignments of `valuations` that maximize total valuation.
pub fn compute_efficient_assignments(valuations: &Valuations) -> Vec<Assignment<'_>> {
    valuations.efficient_assignments()
}
