use std::collections::HashMap;

use chrono::{Days, Local, NaiveDate};

use crate::entities::{Category, CategorySpend, DailySpend, DashboardSummary, Receipt};

const TRAILING_DAYS: u64 = 7;

pub(crate) struct SpendAggregator<'a> {
    receipts: &'a [Receipt],
    monthly_budget: f64,
    today: NaiveDate,
}

impl<'a> SpendAggregator<'a> {
    pub(crate) fn new(receipts: &'a [Receipt], monthly_budget: f64, today: NaiveDate) -> Self {
        Self {
            receipts,
            monthly_budget,
            today,
        }
    }

    pub(crate) fn process(self) -> DashboardSummary {
        let total_spent: f64 = self.receipts.iter().map(Receipt::total).sum();
        DashboardSummary {
            total_spent,
            monthly_budget: self.monthly_budget,
            budget_progress_percent: budget_progress(total_spent, self.monthly_budget),
            over_budget: total_spent > self.monthly_budget,
            category_spend: self.category_spend(),
            last_seven_days: self.last_seven_days(),
        }
    }

    fn category_spend(&self) -> Vec<CategorySpend> {
        let by_category = self
            .receipts
            .iter()
            .flat_map(|r| r.items())
            .fold(HashMap::<Category, f64>::new(), |mut map, item| {
                *map.entry(item.category).or_default() += item.price;
                map
            });
        Category::ALL
            .iter()
            .filter_map(|category| {
                by_category
                    .get(category)
                    .filter(|amount| **amount > 0.0)
                    .map(|amount| CategorySpend {
                        category: *category,
                        amount: *amount,
                    })
            })
            .collect()
    }

    fn last_seven_days(&self) -> Vec<DailySpend> {
        let by_day = self
            .receipts
            .iter()
            .fold(HashMap::<NaiveDate, f64>::new(), |mut map, receipt| {
                let day = receipt.created_at.with_timezone(&Local).date_naive();
                *map.entry(day).or_default() += receipt.total();
                map
            });
        (0..TRAILING_DAYS)
            .rev()
            .filter_map(|offset| self.today.checked_sub_days(Days::new(offset)))
            .map(|date| DailySpend {
                date,
                amount: by_day.get(&date).copied().unwrap_or(0.0),
            })
            .collect()
    }
}

fn budget_progress(total_spent: f64, monthly_budget: f64) -> f64 {
    if monthly_budget <= 0.0 {
        return if total_spent > 0.0 { 100.0 } else { 0.0 };
    }
    (total_spent / monthly_budget * 100.0).min(100.0)
}
