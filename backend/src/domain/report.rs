//! Stock valuation and cash reconciliation aggregates.
//!
//! The aggregation is pure: adapters fetch products or sales, these functions
//! fold them. Fees and postage are per unit and are multiplied by quantity.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{Product, Sale};

/// Per-product valuation line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReportRow {
    pub id: i32,
    pub sku: String,
    pub name: String,
    pub on_ebay: bool,
    pub cost: Decimal,
    pub retail: Decimal,
    pub fees: Decimal,
    pub postage: Decimal,
    pub quantity: i32,
    pub value_cost: Decimal,
    pub value_retail: Decimal,
    pub potential_profit: Decimal,
}

/// Sums over every product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StockReportTotals {
    pub qty_total: i64,
    pub total_cost_value: Decimal,
    pub total_retail_value: Decimal,
    pub total_potential_profit: Decimal,
}

/// Stock valuation report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockReport {
    pub rows: Vec<StockReportRow>,
    pub totals: StockReportTotals,
}

/// Value every product at cost and retail, preserving input order.
pub fn build_stock_report(products: &[Product]) -> StockReport {
    let mut totals = StockReportTotals::default();
    let rows = products
        .iter()
        .map(|product| {
            let qty = Decimal::from(product.quantity);
            let row = StockReportRow {
                id: product.id,
                sku: product.sku.clone(),
                name: product.name.clone(),
                on_ebay: product.on_ebay,
                cost: product.cost,
                retail: product.retail,
                fees: product.fees,
                postage: product.postage,
                quantity: product.quantity,
                value_cost: qty * product.cost,
                value_retail: qty * product.retail,
                potential_profit: qty * product.pricing().unit_profit(),
            };
            totals.qty_total += i64::from(product.quantity);
            totals.total_cost_value += row.value_cost;
            totals.total_retail_value += row.value_retail;
            totals.total_potential_profit += row.potential_profit;
            row
        })
        .collect();
    StockReport { rows, totals }
}

/// Inclusive calendar-day range in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

/// Invalid report range input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateRangeError {
    #[error("{field} must be a YYYY-MM-DD date (got {value})")]
    Malformed { field: &'static str, value: String },
    #[error("to must not be before from")]
    Reversed,
}

impl DateRange {
    /// Parse `from`/`to` query values.
    ///
    /// `from` defaults to `today` and `to` defaults to `from`. Blank values
    /// count as missing.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use stockroom::domain::DateRange;
    ///
    /// let today = NaiveDate::from_ymd_opt(2024, 3, 9).expect("date");
    /// let range = DateRange::parse(None, None, today).expect("range");
    /// assert_eq!(range.label(), "2024-03-09");
    /// ```
    pub fn parse(
        from: Option<&str>,
        to: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, DateRangeError> {
        let from = parse_day("from", from)?.unwrap_or(today);
        let to = parse_day("to", to)?.unwrap_or(from);
        if to < from {
            return Err(DateRangeError::Reversed);
        }
        Ok(Self { from, to })
    }

    /// First day covered.
    pub fn from(&self) -> NaiveDate {
        self.from
    }

    /// Last day covered.
    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Start of `from`, inclusive.
    pub fn start(&self) -> DateTime<Utc> {
        self.from.and_time(NaiveTime::MIN).and_utc()
    }

    /// Start of the day after `to`, exclusive.
    pub fn end_exclusive(&self) -> DateTime<Utc> {
        let next = self.to.checked_add_days(Days::new(1)).unwrap_or(self.to);
        next.and_time(NaiveTime::MIN).and_utc()
    }

    /// Whether `instant` falls inside the range.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start() && instant < self.end_exclusive()
    }

    /// Human label: one date, or `from → to`.
    pub fn label(&self) -> String {
        if self.from == self.to {
            self.from.to_string()
        } else {
            format!("{} → {}", self.from, self.to)
        }
    }
}

fn parse_day(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, DateRangeError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| DateRangeError::Malformed {
            field,
            value: value.to_owned(),
        })
}

/// Money moved by one or more sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CashFigures {
    pub qty: i64,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub fees: Decimal,
    pub postage: Decimal,
}

impl CashFigures {
    fn of_sale(sale: &Sale) -> Self {
        let qty = Decimal::from(sale.quantity);
        Self {
            qty: i64::from(sale.quantity),
            revenue: sale.unit_retail * qty,
            cost: sale.unit_cost * qty,
            fees: sale.fees * qty,
            postage: sale.postage * qty,
        }
    }

    fn add(&mut self, other: &Self) {
        self.qty += other.qty;
        self.revenue += other.revenue;
        self.cost += other.cost;
        self.fees += other.fees;
        self.postage += other.postage;
    }

    /// Revenue left after cost, fees and postage.
    pub fn net(&self) -> Decimal {
        self.revenue - self.cost - self.fees - self.postage
    }
}

/// Totals for one sales channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub channel: String,
    pub figures: CashFigures,
}

/// One sale as shown on the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashLine {
    pub created_at: DateTime<Utc>,
    pub channel: String,
    pub sku: String,
    pub figures: CashFigures,
}

/// Cash reconciliation for a date range.
#[derive(Debug, Clone, PartialEq)]
pub struct CashReport {
    pub range: DateRange,
    pub channels: Vec<ChannelSummary>,
    pub lines: Vec<CashLine>,
    pub totals: CashFigures,
}

/// Fold `sales` that fall inside `range`.
///
/// Channels are ordered by name; lines by time, then channel, then SKU.
pub fn build_cash_report(range: DateRange, sales: &[Sale]) -> CashReport {
    let mut by_channel: BTreeMap<String, CashFigures> = BTreeMap::new();
    let mut totals = CashFigures::default();
    let mut lines: Vec<CashLine> = sales
        .iter()
        .filter(|sale| range.contains(sale.created_at))
        .map(|sale| {
            let figures = CashFigures::of_sale(sale);
            by_channel
                .entry(sale.channel.clone())
                .or_default()
                .add(&figures);
            totals.add(&figures);
            CashLine {
                created_at: sale.created_at,
                channel: sale.channel.clone(),
                sku: sale.sku.clone(),
                figures,
            }
        })
        .collect();
    lines.sort_by(|a, b| {
        (a.created_at, &a.channel, &a.sku).cmp(&(b.created_at, &b.channel, &b.sku))
    });

    let channels = by_channel
        .into_iter()
        .map(|(channel, figures)| ChannelSummary { channel, figures })
        .collect();

    CashReport {
        range,
        channels,
        lines,
        totals,
    }
}
