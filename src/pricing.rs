//! Quotation pricing
//!
//! Converts the extracted physical quantities into a priced quotation.
//! Monetary values are integer cents; each cost component is rounded
//! half-up to the cent once, at construction, and the total is the exact
//! cent-sum of the two already-rounded components. That order of operations
//! is part of the contract: totals must be reproducible bit-for-bit.

use crate::error::{Error, Result};
use crate::model::PrintParameters;
use crate::output::SlicingOutcome;
use std::collections::HashMap;
use tracing::info;

/// Currency code attached to every quotation
pub const CURRENCY: &str = "USD";

/// A monetary amount in integer cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero
    pub const ZERO: Money = Money(0);

    /// Wrap an amount already expressed in cents
    pub fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Round an amount to the cent, half-up (half away from zero)
    pub fn from_amount_half_up(amount: f64) -> Self {
        let scaled = amount * 100.0;
        let cents = if scaled >= 0.0 {
            (scaled + 0.5).floor()
        } else {
            (scaled - 0.5).ceil()
        };
        Money(cents as i64)
    }

    /// The amount in cents
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// The amount as a float, for display-adjacent uses only
    pub fn amount(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

/// Pricing rates for one material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialRates {
    /// Price per gram of filament
    pub price_per_gram: f64,
}

/// Per-material and per-time rate tables
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTable {
    materials: HashMap<String, MaterialRates>,
    price_per_minute: f64,
}

impl PricingTable {
    /// Create a table with the given per-minute machine rate
    pub fn new(price_per_minute: f64) -> Self {
        Self {
            materials: HashMap::new(),
            price_per_minute,
        }
    }

    /// Add or replace a material's rates
    pub fn with_material(mut self, name: impl Into<String>, price_per_gram: f64) -> Self {
        self.materials
            .insert(name.into(), MaterialRates { price_per_gram });
        self
    }

    /// Per-gram rate for a material
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for a material absent from the
    /// table.
    pub fn price_per_gram(&self, material: &str) -> Result<f64> {
        self.materials
            .get(material)
            .map(|rates| rates.price_per_gram)
            .ok_or_else(|| Error::InvalidParameter(format!("unknown material: {material}")))
    }

    /// Per-minute machine rate
    pub fn price_per_minute(&self) -> f64 {
        self.price_per_minute
    }
}

impl Default for PricingTable {
    /// Stock rates for the supported materials
    fn default() -> Self {
        PricingTable::new(0.10)
            .with_material("PLA", 0.05)
            .with_material("ABS", 0.06)
            .with_material("PETG", 0.07)
            .with_material("TPU", 0.12)
    }
}

/// A priced quotation: effective parameters, physical quantities, and the
/// cost breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct Quotation {
    /// Original filename of the quoted model
    pub file_name: String,
    /// The effective print parameters the estimate was produced with
    pub parameters: PrintParameters,
    /// Filament mass in grams
    pub filament_grams: f64,
    /// Print duration in minutes
    pub print_minutes: u32,
    /// Per-gram rate used
    pub price_per_gram: f64,
    /// Per-minute rate used
    pub price_per_minute: f64,
    /// Cost of the material
    pub material_cost: Money,
    /// Cost of the machine time
    pub time_cost: Money,
    /// Total cost
    pub total_cost: Money,
    /// Currency code for all monetary fields
    pub currency: &'static str,
}

/// Compute the cost breakdown from quantities and rates
///
/// Returns `(material_cost, time_cost, total_cost)`. Each component is
/// rounded half-up independently; the total is their cent-sum.
pub fn compute_costs(
    filament_grams: f64,
    print_minutes: u32,
    price_per_gram: f64,
    price_per_minute: f64,
) -> (Money, Money, Money) {
    let material_cost = Money::from_amount_half_up(filament_grams * price_per_gram);
    let time_cost = Money::from_amount_half_up(f64::from(print_minutes) * price_per_minute);
    let total_cost = material_cost + time_cost;
    (material_cost, time_cost, total_cost)
}

/// Price a slicing outcome into a quotation
pub fn price_quotation(
    outcome: &SlicingOutcome,
    file_name: &str,
    parameters: PrintParameters,
    table: &PricingTable,
) -> Result<Quotation> {
    let price_per_gram = table.price_per_gram(&parameters.material)?;
    let price_per_minute = table.price_per_minute();

    let (material_cost, time_cost, total_cost) = compute_costs(
        outcome.filament_grams,
        outcome.print_minutes,
        price_per_gram,
        price_per_minute,
    );

    info!(
        grams = outcome.filament_grams,
        minutes = outcome.print_minutes,
        material = %material_cost,
        time = %time_cost,
        total = %total_cost,
        "pricing calculated"
    );

    Ok(Quotation {
        file_name: file_name.to_string(),
        parameters,
        filament_grams: outcome.filament_grams,
        print_minutes: outcome.print_minutes,
        price_per_gram,
        price_per_minute,
        material_cost,
        time_cost,
        total_cost,
        currency: CURRENCY,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_pricing_example() {
        // 50.0g at 0.05/g and 120min at 0.10/min
        let (material, time, total) = compute_costs(50.0, 120, 0.05, 0.10);
        assert_eq!(material, Money::from_cents(250));
        assert_eq!(time, Money::from_cents(1200));
        assert_eq!(total, Money::from_cents(1450));
        assert_eq!(total.to_string(), "14.50");
    }

    #[test]
    fn test_half_up_rounding_at_the_cent_boundary() {
        assert_eq!(Money::from_amount_half_up(0.125), Money::from_cents(13));
        assert_eq!(Money::from_amount_half_up(0.124), Money::from_cents(12));
        assert_eq!(Money::from_amount_half_up(0.135), Money::from_cents(14));
        assert_eq!(Money::from_amount_half_up(0.0), Money::ZERO);
    }

    #[test]
    fn test_components_round_before_the_total() {
        // 0.333 and 0.333 each round to 0.33; the total is 0.66, not a
        // re-rounded 0.666 -> 0.67.
        let material = Money::from_amount_half_up(0.333);
        let time = Money::from_amount_half_up(0.333);
        assert_eq!((material + time).cents(), 66);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(1234).to_string(), "12.34");
        assert_eq!(Money::from_cents(-250).to_string(), "-2.50");
    }

    #[test]
    fn test_unknown_material_is_an_error() {
        let table = PricingTable::default();
        assert!(table.price_per_gram("UNOBTAINIUM").is_err());
    }

    #[test]
    fn test_price_quotation_echoes_inputs() {
        let table = PricingTable::new(0.10).with_material("PLA", 0.05);
        let params = PrintParameters::new("FDM", "PLA", 0.2, 2, 15, false);
        let outcome = SlicingOutcome {
            filament_grams: 50.0,
            print_minutes: 120,
        };

        let quotation = price_quotation(&outcome, "benchy.stl", params.clone(), &table).unwrap();
        assert_eq!(quotation.file_name, "benchy.stl");
        assert_eq!(quotation.parameters, params);
        assert_eq!(quotation.filament_grams, 50.0);
        assert_eq!(quotation.print_minutes, 120);
        assert_eq!(quotation.price_per_gram, 0.05);
        assert_eq!(quotation.price_per_minute, 0.10);
        assert_eq!(quotation.total_cost, Money::from_cents(1450));
        assert_eq!(quotation.currency, "USD");
    }
}
