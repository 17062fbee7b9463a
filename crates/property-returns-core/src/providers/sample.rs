//! Randomly generated placeholder listings.

use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{PropertyType, SampleDataProvider, SampleProperty};
use crate::types::Money;

const STREETS: [&str; 10] = [
    "Collins St",
    "Bourke St",
    "George St",
    "Queen St",
    "King St",
    "Flinders St",
    "Chapel St",
    "Smith St",
    "High St",
    "Park Ave",
];

const PROPERTY_TYPES: [PropertyType; 3] = [
    PropertyType::House,
    PropertyType::Apartment,
    PropertyType::Townhouse,
];

const BATHROOMS: [Decimal; 5] = [dec!(1), dec!(1.5), dec!(2), dec!(2.5), dec!(3)];

/// Prices are drawn in whole thousands.
const MIN_PRICE_THOUSANDS: u32 = 350;
const MAX_PRICE_THOUSANDS: u32 = 1_500;

/// Seedable generator of [`SampleProperty`] records. The same seed and
/// reference date always produce the same sequence.
#[derive(Debug, Clone)]
pub struct RandomSampleData {
    rng: StdRng,
    reference_date: NaiveDate,
}

impl RandomSampleData {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            reference_date: Utc::now().date_naive(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            reference_date: Utc::now().date_naive(),
        }
    }

    /// Stamp generated records with `date` instead of today.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    fn generate(&mut self, address: String, max_price_thousands: u32) -> SampleProperty {
        let property_type = *PROPERTY_TYPES
            .choose(&mut self.rng)
            .unwrap_or(&PropertyType::House);
        let bathrooms = *BATHROOMS.choose(&mut self.rng).unwrap_or(&Decimal::ONE);
        let price_thousands = self.rng.gen_range(MIN_PRICE_THOUSANDS..=max_price_thousands);

        SampleProperty {
            address,
            property_type,
            bedrooms: self.rng.gen_range(1..=4),
            bathrooms,
            floor_area_sqm: self.rng.gen_range(50..=250),
            price: Decimal::from(price_thousands) * dec!(1000),
            year_built: self.rng.gen_range(2000..=2023),
            generated_on: self.reference_date.format("%Y-%m-%d").to_string(),
        }
    }

    fn street_address(&mut self, location: &str) -> String {
        let number: u32 = self.rng.gen_range(1..=999);
        let street = STREETS.choose(&mut self.rng).unwrap_or(&STREETS[0]);
        format!("{number} {street}, {location}")
    }
}

impl Default for RandomSampleData {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleDataProvider for RandomSampleData {
    fn property(&mut self, address: &str) -> SampleProperty {
        self.generate(address.to_string(), MAX_PRICE_THOUSANDS)
    }

    fn search(&mut self, location: &str, max_budget: Money, count: usize) -> Vec<SampleProperty> {
        let budget_thousands = (max_budget / dec!(1000))
            .floor()
            .min(Decimal::from(MAX_PRICE_THOUSANDS));
        let cap = budget_thousands.to_u32().unwrap_or(0);
        if cap < MIN_PRICE_THOUSANDS {
            log::debug!("budget {max_budget} is below the cheapest sample listing");
            return Vec::new();
        }

        (0..count)
            .map(|_| {
                let address = self.street_address(location);
                self.generate(address, cap)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(seed: u64) -> RandomSampleData {
        RandomSampleData::seeded(seed)
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    #[test]
    fn test_same_seed_same_records() {
        let a = fixed(7).search("Melbourne", dec!(900000), 5);
        let b = fixed(7).search("Melbourne", dec!(900000), 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fields_within_ranges() {
        let mut source = fixed(11);
        for _ in 0..50 {
            let p = source.property("10 Queen St");
            assert!((1..=4).contains(&p.bedrooms));
            assert!(BATHROOMS.contains(&p.bathrooms));
            assert!((50..=250).contains(&p.floor_area_sqm));
            assert!(p.price >= dec!(350000) && p.price <= dec!(1500000));
            assert!((2000..=2023).contains(&p.year_built));
            assert_eq!(p.generated_on, "2024-03-01");
        }
    }

    #[test]
    fn test_search_respects_budget() {
        let listings = fixed(3).search("Sydney", dec!(600000), 20);
        assert_eq!(listings.len(), 20);
        assert!(listings.iter().all(|p| p.price <= dec!(600000)));
        assert!(listings.iter().all(|p| p.address.ends_with(", Sydney")));
    }

    #[test]
    fn test_search_below_cheapest_listing_is_empty() {
        assert!(fixed(3).search("Sydney", dec!(200000), 5).is_empty());
    }
}
