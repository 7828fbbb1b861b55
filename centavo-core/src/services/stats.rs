//! Stats service - date-range filtering and bucketing of movements

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::duckdb::{DuckDbRepository, MovementFilter};
use crate::domain::{Movement, MovementKind};

/// Time bucket granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Day,
    /// ISO week, Monday start
    Week,
    Month,
}

impl Bucket {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Some(Bucket::Day),
            "week" | "weekly" => Some(Bucket::Week),
            "month" | "monthly" => Some(Bucket::Month),
            _ => None,
        }
    }

    /// Map a date to the first day of its bucket
    pub fn start_of(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Bucket::Day => date,
            Bucket::Week => {
                let week = date.iso_week();
                NaiveDate::from_isoywd_opt(week.year(), week.week(), Weekday::Mon).unwrap_or(date)
            }
            Bucket::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

/// Per-bucket totals
#[derive(Debug, Clone, Serialize)]
pub struct BucketSummary {
    pub bucket_start: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub saving: Decimal,
    /// income - expense - saving
    pub net: Decimal,
}

/// Per-category expense totals over a range
#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub category_id: Option<String>,
    pub category: String,
    pub total: Decimal,
    /// Fraction of the total expense volume, 0..1
    pub share: f64,
}

/// Stats service for movement aggregation
pub struct StatsService {
    repository: Arc<DuckDbRepository>,
}

impl StatsService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Bucketed income/expense/saving totals over [from, to], both inclusive
    pub fn overview(&self, from: NaiveDate, to: NaiveDate, bucket: Bucket) -> Result<Vec<BucketSummary>> {
        let movements = self.movements_in_range(from, to)?;
        Ok(bucket_movements(&movements, bucket))
    }

    /// Expense totals per category over [from, to], sorted descending
    pub fn category_breakdown(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<CategoryShare>> {
        let movements = self.movements_in_range(from, to)?;
        let categories = self.repository.get_categories()?;
        let names: HashMap<Uuid, String> =
            categories.into_iter().map(|c| (c.id, c.name)).collect();
        Ok(category_breakdown(&movements, &names))
    }

    fn movements_in_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Movement>> {
        if from > to {
            anyhow::bail!("Start date {} is after end date {}", from, to);
        }
        let filter = MovementFilter {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        };
        self.repository.get_movements(&filter)
    }
}

/// Group movements into buckets and sum per kind
///
/// Pure function; movements are assumed pre-filtered to the range and to
/// exclude soft-deleted rows (the repository does both).
pub fn bucket_movements(movements: &[Movement], bucket: Bucket) -> Vec<BucketSummary> {
    let mut totals: HashMap<NaiveDate, (Decimal, Decimal, Decimal)> = HashMap::new();

    for movement in movements {
        let start = bucket.start_of(movement.movement_date);
        let entry = totals
            .entry(start)
            .or_insert((Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
        match movement.kind {
            MovementKind::Income => entry.0 += movement.amount,
            MovementKind::Expense => entry.1 += movement.amount,
            MovementKind::Saving => entry.2 += movement.amount,
        }
    }

    let mut starts: Vec<NaiveDate> = totals.keys().copied().collect();
    starts.sort();

    starts
        .into_iter()
        .map(|start| {
            let (income, expense, saving) = totals[&start];
            BucketSummary {
                bucket_start: start.format("%Y-%m-%d").to_string(),
                income,
                expense,
                saving,
                net: income - expense - saving,
            }
        })
        .collect()
}

/// Sum expenses per category and compute each category's share
///
/// Movements without a category land under "Uncategorized".
pub fn category_breakdown(
    movements: &[Movement],
    category_names: &HashMap<Uuid, String>,
) -> Vec<CategoryShare> {
    let mut totals: HashMap<Option<Uuid>, Decimal> = HashMap::new();

    for movement in movements {
        if movement.kind != MovementKind::Expense {
            continue;
        }
        *totals.entry(movement.category_id).or_insert(Decimal::ZERO) += movement.amount;
    }

    let grand_total: Decimal = totals.values().copied().sum();

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category_id, total)| {
            let share = if grand_total > Decimal::ZERO {
                (total / grand_total).to_f64().unwrap_or(0.0)
            } else {
                0.0
            };
            CategoryShare {
                category_id: category_id.map(|id| id.to_string()),
                category: category_id
                    .and_then(|id| category_names.get(&id).cloned())
                    .unwrap_or_else(|| "Uncategorized".to_string()),
                total,
                share,
            }
        })
        .collect();

    shares.sort_by(|a, b| b.total.cmp(&a.total));
    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(kind: MovementKind, cents: i64, date: NaiveDate) -> Movement {
        Movement::new(Uuid::new_v4(), kind, Decimal::new(cents, 2), date)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_bucket_starts_monday() {
        // 2025-03-14 is a Friday; its ISO week starts Monday 2025-03-10
        assert_eq!(Bucket::Week.start_of(date(2025, 3, 14)), date(2025, 3, 10));
        // A Monday maps to itself
        assert_eq!(Bucket::Week.start_of(date(2025, 3, 10)), date(2025, 3, 10));
        // A Sunday belongs to the preceding Monday's week
        assert_eq!(Bucket::Week.start_of(date(2025, 3, 16)), date(2025, 3, 10));
    }

    #[test]
    fn test_month_bucket() {
        assert_eq!(Bucket::Month.start_of(date(2025, 3, 14)), date(2025, 3, 1));
    }

    #[test]
    fn test_bucket_totals_per_kind() {
        let movements = vec![
            movement(MovementKind::Income, 200000, date(2025, 3, 1)),
            movement(MovementKind::Expense, 50000, date(2025, 3, 5)),
            movement(MovementKind::Expense, 25000, date(2025, 3, 20)),
            movement(MovementKind::Saving, 30000, date(2025, 3, 10)),
        ];

        let summaries = bucket_movements(&movements, Bucket::Month);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].bucket_start, "2025-03-01");
        assert_eq!(summaries[0].income, Decimal::new(200000, 2));
        assert_eq!(summaries[0].expense, Decimal::new(75000, 2));
        assert_eq!(summaries[0].saving, Decimal::new(30000, 2));
        // 2000 - 750 - 300
        assert_eq!(summaries[0].net, Decimal::new(95000, 2));
    }

    #[test]
    fn test_buckets_sorted_ascending() {
        let movements = vec![
            movement(MovementKind::Expense, 1000, date(2025, 3, 14)),
            movement(MovementKind::Expense, 1000, date(2025, 1, 2)),
            movement(MovementKind::Expense, 1000, date(2025, 2, 7)),
        ];

        let summaries = bucket_movements(&movements, Bucket::Month);
        let starts: Vec<&str> = summaries.iter().map(|s| s.bucket_start.as_str()).collect();
        assert_eq!(starts, vec!["2025-01-01", "2025-02-01", "2025-03-01"]);
    }

    #[test]
    fn test_daily_buckets_keep_days_separate() {
        let movements = vec![
            movement(MovementKind::Expense, 1000, date(2025, 3, 1)),
            movement(MovementKind::Expense, 2000, date(2025, 3, 2)),
        ];

        let summaries = bucket_movements(&movements, Bucket::Day);
        assert_eq!(summaries.len(), 2);
    }

    #[test]
    fn test_category_breakdown_shares() {
        let groceries = Uuid::new_v4();
        let dining = Uuid::new_v4();
        let mut names = HashMap::new();
        names.insert(groceries, "Groceries".to_string());
        names.insert(dining, "Dining".to_string());

        let mut m1 = movement(MovementKind::Expense, 7500, date(2025, 3, 1));
        m1.category_id = Some(groceries);
        let mut m2 = movement(MovementKind::Expense, 2500, date(2025, 3, 2));
        m2.category_id = Some(dining);
        // Income is excluded from the breakdown
        let m3 = movement(MovementKind::Income, 100000, date(2025, 3, 3));

        let shares = category_breakdown(&[m1, m2, m3], &names);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].category, "Groceries");
        assert!((shares[0].share - 0.75).abs() < 1e-9);
        assert_eq!(shares[1].category, "Dining");
        assert!((shares[1].share - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_uncategorized_expenses_grouped() {
        let names = HashMap::new();
        let m1 = movement(MovementKind::Expense, 1000, date(2025, 3, 1));
        let m2 = movement(MovementKind::Expense, 2000, date(2025, 3, 2));

        let shares = category_breakdown(&[m1, m2], &names);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].category, "Uncategorized");
        assert_eq!(shares[0].total, Decimal::new(3000, 2));
    }

    #[test]
    fn test_empty_movements_empty_breakdown() {
        let summaries = bucket_movements(&[], Bucket::Day);
        assert!(summaries.is_empty());

        let shares = category_breakdown(&[], &HashMap::new());
        assert!(shares.is_empty());
    }
}
