//! Calculation Result Cache
//!
//! Facade over one shared cache for the amortization family of calculations.
//! Callers look results up by their loan parameters instead of building keys.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::warn;

use crate::amortization::AmortizationRow;
use crate::cache::{Cache, CacheStats};
use crate::config::{CacheConfig, EvictionStrategy};

/// Optional named parameters of a calculation.
///
/// A `BTreeMap` so the encoded key does not depend on insertion order.
pub type CalculationParams = BTreeMap<String, f64>;

/// Longer than the generic default: loan results do not go stale quickly.
pub const CALCULATION_TTL: Duration = Duration::from_secs(30 * 60);

/// Smaller than the generic default: schedules are large values.
pub const CALCULATION_MAX_SIZE: usize = 500;

// == Calculation Kind ==
/// The calculations this cache knows how to key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationKind {
    MonthlyPayment,
    TotalInterest,
    AmortizationSchedule,
}

impl CalculationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationKind::MonthlyPayment => "monthly_payment",
            CalculationKind::TotalInterest => "total_interest",
            CalculationKind::AmortizationSchedule => "amortization_schedule",
        }
    }
}

/// A stored result; the variant always matches the kind in the key.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedCalculation {
    Amount(f64),
    Schedule(Vec<AmortizationRow>),
}

// == Calculation Key ==
/// Builds the composite key for one calculation.
///
/// Layout: `kind:principal:annual_rate:term_months:params`, where `params` is
/// `none` when absent and the sorted bag in braces otherwise, so an
/// empty bag (`{}`) never collides with a missing one.
pub fn calculation_key(
    kind: CalculationKind,
    principal: f64,
    annual_rate: f64,
    term_months: u32,
    params: Option<&CalculationParams>,
) -> String {
    let bag = match params {
        None => "none".to_string(),
        Some(params) => encode_params(params),
    };
    format!(
        "{}:{}:{}:{}:{}",
        kind.as_str(),
        principal,
        annual_rate,
        term_months,
        bag
    )
}

fn encode_params(params: &CalculationParams) -> String {
    let fields: Vec<String> = params
        .iter()
        .map(|(name, value)| format!("{:?}:{}", name, value))
        .collect();
    format!("{{{}}}", fields.join(","))
}

// == Calculation Cache ==
/// Named getters and setters over a single shared [`Cache`].
#[derive(Debug)]
pub struct CalculationCache {
    cache: Cache<CachedCalculation>,
}

impl CalculationCache {
    /// Creates the cache with the calculation defaults (30 minute TTL, 500
    /// entries, LRU).
    pub fn new() -> Self {
        Self::with_config(CacheConfig::new(
            CALCULATION_TTL,
            CALCULATION_MAX_SIZE,
            EvictionStrategy::Lru,
        ))
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            cache: Cache::new(config),
        }
    }

    // == Monthly Payment ==
    pub fn get_monthly_payment(
        &self,
        principal: f64,
        annual_rate: f64,
        term_months: u32,
    ) -> Option<f64> {
        let key = calculation_key(
            CalculationKind::MonthlyPayment,
            principal,
            annual_rate,
            term_months,
            None,
        );
        self.get_amount(&key)
    }

    pub fn set_monthly_payment(
        &self,
        principal: f64,
        annual_rate: f64,
        term_months: u32,
        payment: f64,
    ) {
        let key = calculation_key(
            CalculationKind::MonthlyPayment,
            principal,
            annual_rate,
            term_months,
            None,
        );
        self.cache.set(&key, CachedCalculation::Amount(payment));
    }

    // == Total Interest ==
    pub fn get_total_interest(
        &self,
        principal: f64,
        annual_rate: f64,
        term_months: u32,
    ) -> Option<f64> {
        let key = calculation_key(
            CalculationKind::TotalInterest,
            principal,
            annual_rate,
            term_months,
            None,
        );
        self.get_amount(&key)
    }

    pub fn set_total_interest(
        &self,
        principal: f64,
        annual_rate: f64,
        term_months: u32,
        interest: f64,
    ) {
        let key = calculation_key(
            CalculationKind::TotalInterest,
            principal,
            annual_rate,
            term_months,
            None,
        );
        self.cache.set(&key, CachedCalculation::Amount(interest));
    }

    // == Amortization Schedule ==
    pub fn get_amortization_schedule(
        &self,
        principal: f64,
        annual_rate: f64,
        term_months: u32,
        params: Option<&CalculationParams>,
    ) -> Option<Vec<AmortizationRow>> {
        let key = calculation_key(
            CalculationKind::AmortizationSchedule,
            principal,
            annual_rate,
            term_months,
            params,
        );
        match self.cache.get(&key)? {
            CachedCalculation::Schedule(rows) => Some(rows),
            CachedCalculation::Amount(_) => {
                warn!(key = %key, "Schedule key holds an amount");
                None
            }
        }
    }

    pub fn set_amortization_schedule(
        &self,
        principal: f64,
        annual_rate: f64,
        term_months: u32,
        params: Option<&CalculationParams>,
        schedule: Vec<AmortizationRow>,
    ) {
        let key = calculation_key(
            CalculationKind::AmortizationSchedule,
            principal,
            annual_rate,
            term_months,
            params,
        );
        self.cache.set(&key, CachedCalculation::Schedule(schedule));
    }

    // == Maintenance ==
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Statistics of the shared cache, unchanged.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Sweeps expired results. Returns how many were removed.
    pub fn cleanup(&self) -> usize {
        self.cache.cleanup()
    }

    fn get_amount(&self, key: &str) -> Option<f64> {
        match self.cache.get(key)? {
            CachedCalculation::Amount(value) => Some(value),
            CachedCalculation::Schedule(_) => {
                warn!(key, "Amount key holds a schedule");
                None
            }
        }
    }
}

impl Default for CalculationCache {
    fn default() -> Self {
        Self::new()
    }
}
