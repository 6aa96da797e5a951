use thiserror::Error;

use super::*;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, RentError>;

/// Reasons why a valuation matrix or a rent cannot be used.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValidationError {
    #[error("expected a non-empty valuation matrix")]
    Empty,
    #[error("row {agent} of the valuation matrix has {len} entries, but row 0 has {expected}")]
    Ragged { agent: Agent, len: usize, expected: usize },
    #[error("expected a square valuation matrix, but its dimensions are {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("valuation of agent {agent} for room {room} is not finite ({value})")]
    NonFinite { agent: Agent, room: Room, value: Money },
    #[error("valuation of agent {agent} for room {room} is negative ({value})")]
    Negative { agent: Agent, room: Room, value: Money },
    #[error("expected a positive finite rent, but the rent is {0}")]
    InvalidRent(Money),
    #[error("valuations of agent {agent} sum to {sum}, which is less than the rent {rent}")]
    Infeasible { agent: Agent, sum: Money, rent: Money },
    #[error("expected one room per agent ({expected}), but the assignment lists {len}")]
    AssignmentLength { len: usize, expected: usize },
    #[error("room {room} is out of range or assigned to more than one agent")]
    NotAPermutation { room: Room },
    #[error("expected one price per room ({expected}), but got {len}")]
    PriceCount { len: usize, expected: usize },
}

/// Errors returned by the pricing engine.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RentError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    /// The auction hit its iteration cap. `prices` holds the last price vector.
    #[error("price auction did not converge after {iterations} iterations")]
    NonConvergence { iterations: usize, prices: Vec<Money> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = RentError::from(ValidationError::NotSquare { rows: 2, cols: 3 });
        assert_eq!(
            err.to_string(),
            "invalid input: expected a square valuation matrix, but its dimensions are 2x3"
        );
        let err = RentError::NonConvergence { iterations: 7, prices: vec![1.0] };
        assert_eq!(err.to_string(), "price auction did not converge after 7 iterations");
        let err = ValidationError::PriceCount { len: 1, expected: 2 };
        assert_eq!(err.to_string(), "expected one price per room (2), but got 1");
    }
}
