//! Simultaneous ascending-descending price auction (Abdulkadiroğlu, Sönmez and
//! Ünver, 2004).
//!
//! Prices start at an equal split of the rent. Each round the overdemanded
//! rooms become more expensive and the others cheaper, by the largest step
//! that keeps the overdemanded set unchanged. The total price is preserved by
//! every update, and the auction stops as soon as no room, or every room, is
//! overdemanded.

use tracing::{debug, info, warn};

use super::*;

/// State of a [`PriceAuction`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuctionState {
    Running,
    Converged,
    NonConvergent,
}

use AuctionState::*;

#[derive(Debug)]
pub struct PriceAuction<'a> {
    problem: &'a RentDivision,
    config: AuctionConfig,
    prices: Vec<Money>,
    iterations: usize,
    state: AuctionState,
    eps: Money,
}

impl<'a> PriceAuction<'a> {
    pub fn new(problem: &'a RentDivision, config: AuctionConfig) -> Self {
        PriceAuction {
            problem,
            config,
            prices: problem.equal_prices(),
            iterations: 0,
            state: Running,
            eps: problem.valuations().epsilon(config.tolerance),
        }
    }

    pub fn problem(&self) -> &'a RentDivision {
        self.problem
    }

    pub fn config(&self) -> &AuctionConfig {
        &self.config
    }

    pub fn prices(&self) -> &[Money] {
        &self.prices
    }

    /// Number of price updates performed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn state(&self) -> AuctionState {
        self.state
    }

    /// Spreads the residual `R - Σp` evenly over all rooms.
    fn renormalize(&mut self) -> Money {
        let n = self.prices.len() as Money;
        let residual = (self.problem.rent() - self.prices.iter().sum::<Money>()) / n;
        for p in &mut self.prices {
            *p += residual;
        }
        residual
    }

    fn converge(&mut self) {
        let residual = self.renormalize();
        self.state = Converged;
        info!(iterations = self.iterations, residual, "price auction converged");
    }

    /// Performs one round of the auction and returns the new state.
    ///
    /// Once the auction has left the `Running` state, this is a no-op.
    pub fn step(&mut self) -> AuctionState {
        if self.state != Running {
            return self.state;
        }
        let problem = self.problem;
        let valuations = problem.valuations();
        let n = self.prices.len();
        let demands = demand::demands(valuations, &self.prices, self.eps);
        let od = demand::overdemanded(&demands);
        if od.is_empty() || od.len() == n {
            self.converge();
            return self.state;
        }
        if self.iterations >= self.config.max_iterations {
            self.state = NonConvergent;
            warn!(iterations = self.iterations, overdemanded = ?od, "price auction reached the iteration cap");
            return self.state;
        }

        let Some(x) = demand::increment(valuations, &self.prices, &demands, &od) else {
            warn!(
                iterations = self.iterations,
                overdemanded = od.len(),
                "no agent constrains the price increment"
            );
            self.converge();
            return self.state;
        };
        debug!(iteration = self.iterations, overdemanded = ?od, increment = x, "raising overdemanded prices");

        let k = od.len() as Money;
        let n = n as Money;
        for (room, p) in self.prices.iter_mut().enumerate() {
            if od.contains(&room) {
                *p += (n - k) / n * x;
            } else {
                *p -= k / n * x;
            }
        }
        self.iterations += 1;
        self.state
    }

    /// Runs the auction until it converges or gives up.
    pub fn run(mut self) -> Result<Vec<Money>> {
        loop {
            match self.step() {
                Running => continue,
                Converged => return Ok(self.prices),
                NonConvergent => {
                    return Err(RentError::NonConvergence {
                        iterations: self.iterations,
                        prices: self.prices,
                    });
                }
            }
        }
    }
}

/// Computes envy-free room prices summing to `rent`.
///
/// The input is validated before any price is computed.
pub fn compute_prices(valuations: &Valuations, rent: Money, max_iterations: usize) -> Result<Vec<Money>> {
    RentDivision::new(valuations.clone(), rent)?.solve(&AuctionConfig::new(max_iterations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuations::globals::*;
    use grid::*;

    fn problem(instance: &(Valuations, Money)) -> RentDivision {
        RentDivision::new(instance.0.clone(), instance.1).unwrap()
    }

    #[test]
    fn test_two_agents() {
        let p = problem(&FLAT_2).solve(&AuctionConfig::default()).unwrap();
        assert!((p[0] - 600.0).abs() < 1e-9);
        assert!((p[1] - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_steps() {
        let problem = problem(&FLAT_2);
        let mut auction = problem.auction(AuctionConfig::default());
        assert_eq!(auction.prices(), [500.0, 500.0]);
        assert_eq!(auction.step(), Running);
        assert_eq!(auction.prices(), [600.0, 400.0]);
        assert_eq!(auction.iterations(), 1);
        assert_eq!(auction.step(), Converged);
        assert_eq!(auction.step(), Converged);
        assert_eq!(auction.iterations(), 1);
    }

    #[test]
    fn test_budget_balance() {
        for instance in all() {
            let p = problem(instance).solve(&AuctionConfig::default()).unwrap();
            assert_eq!(p.len(), instance.0.agent_count());
            assert!((p.iter().sum::<Money>() - instance.1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_efficient_assignments_are_envy_free() {
        for instance in all() {
            let p = problem(instance).solve(&AuctionConfig::default()).unwrap();
            for mu in instance.0.efficient_assignments() {
                assert_eq!(mu.find_envy(&p), None, "prices {p:?}, assignment {:?}", mu.rooms());
            }
        }
    }

    #[test]
    fn test_single_agent() {
        let v = Valuations::from_grid(grid![[50.0]]).unwrap();
        assert_eq!(compute_prices(&v, 40.0, 10).unwrap(), [40.0]);
    }

    #[test]
    fn test_equal_split_is_final() {
        let v = Valuations::from_grid(grid![[10.0, 0.0][0.0, 10.0]]).unwrap();
        assert_eq!(compute_prices(&v, 8.0, 10).unwrap(), [4.0, 4.0]);
    }

    #[test]
    fn test_non_convergence() {
        let problem = problem(&FLAT_2);
        let err = problem.solve(&AuctionConfig::new(0)).unwrap_err();
        assert_eq!(
            err,
            RentError::NonConvergence { iterations: 0, prices: vec![500.0, 500.0] }
        );
        let mut auction = problem.auction(AuctionConfig::new(0));
        assert_eq!(auction.step(), NonConvergent);
        assert_eq!(auction.step(), NonConvergent);
    }

    #[test]
    fn test_validation_comes_first() {
        assert_eq!(
            compute_prices(&FLAT_2.0, -1.0, 0),
            Err(ValidationError::InvalidRent(-1.0).into())
        );
        assert_eq!(
            compute_prices(&FLAT_2.0, 1500.0, 10),
            Err(ValidationError::Infeasible { agent: 0, sum: 1000.0, rent: 1500.0 }.into())
        );
    }

    #[test]
    fn test_cap_allows_final_check() {
        let problem = problem(&FLAT_2);
        assert!(problem.solve(&AuctionConfig::new(1)).is_ok());
        let problem = RentDivision::new(FLAT_2.0.clone(), 1000.0).unwrap();
        let mut auction = problem.auction(AuctionConfig::new(1));
        assert_eq!(auction.step(), Running);
        assert_eq!(auction.step(), Converged);
    }

    #[test]
    fn test_accessors() {
        let problem = problem(&FLAT_3);
        let config = AuctionConfig::new(5).with_tolerance(1e-6);
        let auction = problem.auction(config);
        assert!(std::ptr::eq(auction.problem(), &problem));
        assert_eq!(*auction.config(), config);
        assert_eq!(auction.state(), Running);
        assert_eq!(auction.iterations(), 0);
    }

    #[test]
    fn test_budget_balance_after_each_step() {
        for instance in all() {
            let problem = problem(instance);
            let mut auction = problem.auction(AuctionConfig::default());
            loop {
                let state = auction.step();
                assert!((auction.prices().iter().sum::<Money>() - instance.1).abs() < 1e-6);
                if state != Running {
                    break;
                }
            }
        }
    }

    // Stops with every room overdemanded at prices under which both efficient
    // assignments leave agent 3 envious of agent 2.
    #[test]
    fn test_all_rooms_overdemanded_can_leave_envy() {
        let v = Valuations::from_grid(grid![
            [5.0, 8.0, 4.0, 0.0, 0.0, 9.0]
            [4.0, 8.0, 7.0, 6.0, 8.0, 0.0]
            [0.0, 9.0, 0.0, 0.0, 5.0, 0.0]
            [0.0, 9.0, 7.0, 0.0, 6.0, 6.0]
            [7.0, 5.0, 6.0, 7.0, 0.0, 5.0]
            [0.0, 0.0, 5.0, 4.0, 6.0, 6.0]
        ])
        .unwrap();
        let problem = RentDivision::new(v, 7.0).unwrap();
        let mut auction = problem.auction(AuctionConfig::default());
        while auction.step() == Running {}
        assert_eq!(auction.state(), Converged);
        assert_eq!(auction.iterations(), 3);
        let expected = [-5.0 / 3.0, 7.0 / 3.0, 4.0 / 3.0, 1.0 / 3.0, 7.0 / 3.0, 7.0 / 3.0];
        for (p, e) in auction.prices().iter().zip(expected) {
            assert!((p - e).abs() < 1e-9, "prices {:?}", auction.prices());
        }
        let prices = auction.prices();
        let efficient = problem.efficient_assignments();
        assert_eq!(
            efficient.iter().map(|mu| mu.rooms().to_vec()).collect::<Vec<_>>(),
            [vec![5, 3, 1, 2, 0, 4], vec![5, 4, 1, 2, 0, 3]]
        );
        for mu in efficient {
            let envy = mu.find_envy(prices).unwrap();
            assert_eq!((envy.agent, envy.envied_agent), (3, 2));
        }
    }

    #[test]
    fn test_is_deterministic() {
        let a = problem(&FLAT_6).solve(&AuctionConfig::default()).unwrap();
        let b = problem(&FLAT_6).solve(&AuctionConfig::default()).unwrap();
        assert_eq!(a, b);
    }
}
