/// Monetary amount: valuations, prices and rent.
pub type Money = f64;
/// Agent identifier, a row of the valuation matrix.
pub type Agent = usize;
/// Room identifier, a column of the valuation matrix.
pub type Room = usize;
