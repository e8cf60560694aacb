//! Price change detection over a sorted price history.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::price::{PriceChangeEvent, PriceRecord};

/// Why a price change has no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The previous price was zero, so there is no percentage.
    ZeroPreviousPrice,
    /// The change or its percentage does not fit in a `Decimal`.
    Overflow,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ZeroPreviousPrice => write!(f, "previous price was zero"),
            SkipReason::Overflow => write!(f, "change is out of range"),
        }
    }
}

/// A price change that could not be turned into an event.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedChange {
    pub item_name: String,
    pub previous_date: NaiveDate,
    pub current_date: NaiveDate,
    pub previous_price: Decimal,
    pub current_price: Decimal,
    pub reason: SkipReason,
}

/// Result of walking every item's price series.
#[derive(Debug, Clone, Default)]
pub struct PriceAnalysis {
    /// Change events, grouped by item in history order.
    pub events: Vec<PriceChangeEvent>,

    /// Changes that have no event: a zero base or an out-of-range result.
    pub skipped: Vec<SkippedChange>,
}

/// Detect price changes between consecutive purchases of each item.
///
/// `records` must be sorted by item name and then date, as produced by
/// [`build_price_history`](crate::history::build_price_history).
pub fn analyze_price_changes(records: &[PriceRecord]) -> PriceAnalysis {
    let mut analysis = PriceAnalysis::default();

    for series in records.chunk_by(|a, b| a.item_name == b.item_name) {
        for pair in series.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            if previous.unit_rate == current.unit_rate {
                continue;
            }

            let outcome = if previous.unit_rate.is_zero() {
                Err(SkipReason::ZeroPreviousPrice)
            } else {
                change_event(previous, current).ok_or(SkipReason::Overflow)
            };

            match outcome {
                Ok(event) => analysis.events.push(event),
                Err(reason) => {
                    warn!(
                        "Skipping change for '{}' on {}: {}",
                        current.item_name, current.date, reason
                    );
                    analysis.skipped.push(SkippedChange {
                        item_name: current.item_name.clone(),
                        previous_date: previous.date,
                        current_date: current.date,
                        previous_price: previous.unit_rate,
                        current_price: current.unit_rate,
                        reason,
                    });
                }
            }
        }
    }

    debug!(
        "Found {} price changes ({} skipped)",
        analysis.events.len(),
        analysis.skipped.len()
    );
    analysis
}

/// `None` when the change or percentage overflows.
fn change_event(previous: &PriceRecord, current: &PriceRecord) -> Option<PriceChangeEvent> {
    let price_change = current.unit_rate.checked_sub(previous.unit_rate)?;
    // round_dp rounds half to even
    let percentage_change = price_change
        .checked_div(previous.unit_rate)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp(2);

    Some(PriceChangeEvent {
        item_name: current.item_name.clone(),
        previous_date: previous.date,
        current_date: current.date,
        previous_price: previous.unit_rate,
        current_price: current.unit_rate,
        price_change,
        percentage_change,
    })
}

/// Mean of `values` rounded to 2 places; `None` when empty.
///
/// Falls back to summing `value / n` when the plain sum would overflow.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let count = Decimal::from(values.len());

    let mean = match values.iter().try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v)) {
        Some(sum) => sum / count,
        None => values
            .iter()
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v / count)),
    };
    Some(mean.round_dp(2))
}

/// Aggregate statistics over a set of price change events.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChangeSummary {
    pub total: usize,
    pub increases: usize,
    pub decreases: usize,
    /// Mean percentage change, rounded to 2 places.
    pub average_change: Decimal,
    pub largest_increase: Decimal,
    pub largest_decrease: Decimal,
}

impl PriceChangeSummary {
    /// Summarize `events`; `None` when there are none.
    pub fn from_events(events: &[PriceChangeEvent]) -> Option<Self> {
        let percentages: Vec<Decimal> = events.iter().map(|e| e.percentage_change).collect();

        let largest_increase = percentages.iter().copied().max()?;
        let largest_decrease = percentages.iter().copied().min()?;

        Some(Self {
            total: events.len(),
            increases: events.iter().filter(|e| e.is_increase()).count(),
            decreases: events.iter().filter(|e| e.is_decrease()).count(),
            average_change: mean(&percentages)?,
            largest_increase,
            largest_decrease,
        })
    }
}
