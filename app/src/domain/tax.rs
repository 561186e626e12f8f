// foodtruck/src/domain/tax.rs

use rust_decimal::Decimal;

const SOUTH_CAROLINA_INDICATORS: [&str; 3] = ["sc", "south carolina", "rock hill"];
const NORTH_CAROLINA_INDICATORS: [&str; 3] = ["nc", "north carolina", "charlotte"];

/// 8 %
pub const SOUTH_CAROLINA_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);
/// 7.5 %
pub const NORTH_CAROLINA_RATE: Decimal = Decimal::from_parts(75, 0, 0, false, 3);
pub const DEFAULT_RATE: Decimal = SOUTH_CAROLINA_RATE;

/// Rate applied to orders picked up at `address`.
///
/// Plain case-insensitive substring test. South Carolina wins when both
/// states match, and anything unrecognised falls back to the default rate.
/// Short indicators can match inside unrelated words ("Disco Ave" reads as SC).
pub fn tax_rate(address: &str) -> Decimal {
  let address = address.to_lowercase();
  let mentions = |indicators: &[&str]| indicators.iter().any(|i| address.contains(i));

  if mentions(&SOUTH_CAROLINA_INDICATORS) {
    SOUTH_CAROLINA_RATE
  } else if mentions(&NORTH_CAROLINA_INDICATORS) {
    NORTH_CAROLINA_RATE
  } else {
    DEFAULT_RATE
  }
}

pub fn calculate_tax(subtotal: Decimal, address: &str) -> Decimal {
  subtotal * tax_rate(address)
}
