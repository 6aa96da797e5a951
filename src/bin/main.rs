use rentdiv::*;
use std::time::Instant;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let rent = 3500.0;
    let problem = RentDivision::from_rows(
        vec![
            vec![890.0, 900.0, 900.0, 810.0],
            vec![885.0, 890.0, 890.0, 835.0],
            vec![905.0, 892.0, 894.0, 809.0],
            vec![885.0, 895.0, 870.0, 850.0],
        ],
        rent,
    )?;

    let now = Instant::now();
    let prices = problem.solve(&AuctionConfig::default())?;
    println!("rent: {} prices: {:?}", rent, prices);
    for mu in problem.efficient_assignments() {
        println!(
            "assignment: {:?} total: {} envy-free: {}",
            mu.to_pairs(),
            mu.total_valuation(),
            mu.is_envy_free(&prices)
        );
    }
    println!("Time: {} ms", now.elapsed().as_millis());
    Ok(())
}
