use chrono::NaiveDate;

use super::category::Category;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_spent: f64,
    pub monthly_budget: f64,
    /// Share of the budget used, capped at 100.
    pub budget_progress_percent: f64,
    pub over_budget: bool,
    /// Non-zero categories only, in `Category::ALL` order.
    pub category_spend: Vec<CategorySpend>,
    /// Seven entries, oldest first, ending today.
    pub last_seven_days: Vec<DailySpend>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpend {
    pub category: Category,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySpend {
    pub date: NaiveDate,
    pub amount: f64,
}
