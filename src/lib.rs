//! Envy-free rent division.
//!
//! Given every agent's valuation of every room and a total rent, [`compute_prices`]
//! finds room prices summing to the rent under which every efficient assignment
//! ([`compute_efficient_assignments`]) is envy-free ([`is_envy_free`]).

mod assignment;
mod auction;
mod config;
pub mod demand;
mod error;
mod matching;
mod problem;
mod types;
mod valuations;

pub use assignment::{Assignment, Assignments, Envy, find_envy, is_envy_free};
pub use auction::{AuctionState, PriceAuction, compute_prices};
pub use config::{AuctionConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
pub use error::{RentError, Result, ValidationError};
pub use problem::{RentDivision, validate};
pub use types::{Agent, Money, Room};
pub use valuations::{Valuations, compute_efficient_assignments};
