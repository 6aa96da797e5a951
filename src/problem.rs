use super::*;

/// A validated rent division instance: a valuation matrix and the total rent.
#[derive(Clone, Debug, PartialEq)]
pub struct RentDivision {
    valuations: Valuations,
    rent: Money,
}

/// Checks that `rent` is positive and that every agent's valuations cover it.
pub fn validate(valuations: &Valuations, rent: Money) -> std::result::Result<(), ValidationError> {
    if !rent.is_finite() || rent <= 0.0 {
        return Err(ValidationError::InvalidRent(rent));
    }
    for agent in valuations.agents() {
        let sum = valuations.row_sum(agent);
        if sum < rent {
            return Err(ValidationError::Infeasible { agent, sum, rent });
        }
    }
    Ok(())
}

impl RentDivision {
    pub fn new(valuations: Valuations, rent: Money) -> Result<Self> {
        validate(&valuations, rent)?;
        Ok(RentDivision { valuations, rent })
    }

    pub fn from_rows(rows: Vec<Vec<Money>>, rent: Money) -> Result<Self> {
        Self::new(Valuations::from_rows(rows)?, rent)
    }

    pub fn valuations(&self) -> &Valuations {
        &self.valuations
    }

    pub fn rent(&self) -> Money {
        self.rent
    }

    pub fn agent_count(&self) -> usize {
        self.valuations.agent_count()
    }

    /// Equal split of the rent, the starting point of the auction.
    pub fn equal_prices(&self) -> Vec<Money> {
        vec![self.rent / self.agent_count() as Money; self.agent_count()]
    }

    pub fn auction(&self, config: AuctionConfig) -> PriceAuction<'_> {
        PriceAuction::new(self, config)
    }

    /// Runs the price auction to completion.
    pub fn solve(&self, config: &AuctionConfig) -> Result<Vec<Money>> {
        self.auction(*config).run()
    }

    pub fn efficient_assignments(&self) -> Vec<Assignment<'_>> {
        self.valuations.efficient_assignments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuations::globals::*;
    use grid::*;

    #[test]
    fn test_valid() {
        let (v, rent) = &*FLAT_3;
        let problem = RentDivision::new(v.clone(), *rent).unwrap();
        assert_eq!(problem.rent(), 1000.0);
        assert_eq!(problem.agent_count(), 3);
        assert_eq!(problem.valuations(), v);
        assert_eq!(problem.equal_prices(), [1000.0 / 3.0; 3]);
    }

    #[test]
    fn test_invalid_rent() {
        for rent in [0.0, -10.0, Money::INFINITY] {
            assert_eq!(
                RentDivision::new(FLAT_2.0.clone(), rent),
                Err(ValidationError::InvalidRent(rent).into())
            );
        }
        assert!(matches!(
            RentDivision::new(FLAT_2.0.clone(), Money::NAN),
            Err(RentError::Validation(ValidationError::InvalidRent(_)))
        ));
    }

    #[test]
    fn test_infeasible() {
        let v = Valuations::from_grid(grid![[10.0, 10.0][5.0, 4.0]]).unwrap();
        assert_eq!(
            RentDivision::new(v, 10.0),
            Err(ValidationError::Infeasible { agent: 1, sum: 9.0, rent: 10.0 }.into())
        );
    }

    #[test]
    fn test_rent_equal_to_min_row_sum() {
        let v = Valuations::from_grid(grid![[10.0, 10.0][5.0, 4.0]]).unwrap();
        assert!(RentDivision::new(v, 9.0).is_ok());
    }

    #[test]
    fn test_from_rows() {
        assert_eq!(
            RentDivision::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], 1.0),
            Err(ValidationError::NotSquare { rows: 2, cols: 3 }.into())
        );
        assert!(RentDivision::from_rows(vec![vec![700.0, 300.0], vec![600.0, 400.0]], 1000.0).is_ok());
    }
}
