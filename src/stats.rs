use crate::models::{
    AlertKind, AlertsResponse, AppData, BudgetAlert, BudgetPeriod, BudgetStatusItem,
    BudgetStatusResponse, CategorySummary, CategoryUsage, Expense, MonthlySummary, PeriodQuery,
    UsageResponse,
};
use crate::utils::month_bounds;
use chrono::{Datelike, Local, NaiveDate};
use std::collections::BTreeMap;

pub const DEFAULT_ALERT_THRESHOLD: f64 = 80.0;

pub fn category_summary(expenses: &[Expense], query: PeriodQuery) -> Vec<CategorySummary> {
    let mut totals: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    for expense in expenses {
        if query.year.is_some_and(|year| expense.date.year() != year) {
            continue;
        }
        if query.month.is_some_and(|month| expense.date.month() != month) {
            continue;
        }
        let entry = totals.entry(expense.category.as_str()).or_default();
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut summary: Vec<CategorySummary> = totals
        .into_iter()
        .map(|(category, (total_amount, count))| CategorySummary {
            category: category.to_string(),
            total_amount,
            count,
            avg_amount: total_amount / count as f64,
        })
        .collect();
    summary.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    summary
}

pub fn monthly_summary(expenses: &[Expense], year: Option<i32>) -> Vec<MonthlySummary> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for expense in expenses {
        if year.is_some_and(|year| expense.date.year() != year) {
            continue;
        }
        let key = format!("{}-{:02}", expense.date.year(), expense.date.month());
        *totals.entry(key).or_default() += expense.amount;
    }

    totals
        .into_iter()
        .map(|(month, total_amount)| MonthlySummary {
            month,
            total_amount,
        })
        .collect()
}

/// Budget vs. spending for one month (monthly budgets) or one year (yearly budgets).
pub fn budget_status(data: &AppData, year: i32, month: Option<u32>) -> BudgetStatusResponse {
    let (start, end) = match month.and_then(|month| month_bounds(year, month)) {
        Some(bounds) => bounds,
        None => year_bounds(year),
    };

    let mut spent_by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in &data.expenses {
        if expense.date >= start && expense.date <= end {
            *spent_by_category.entry(expense.category.as_str()).or_default() += expense.amount;
        }
    }

    let budget_status: Vec<BudgetStatusItem> = data
        .budgets
        .iter()
        .filter(|budget| budget.year == year)
        .filter(|budget| match month {
            Some(month) => budget.period == BudgetPeriod::Monthly && budget.month == Some(month),
            None => budget.period == BudgetPeriod::Yearly,
        })
        .map(|budget| {
            let spent = spent_by_category
                .get(budget.category.as_str())
                .copied()
                .unwrap_or(0.0);
            let usage = if budget.amount > 0.0 {
                spent / budget.amount * 100.0
            } else {
                0.0
            };
            BudgetStatusItem {
                category: budget.category.clone(),
                budget_amount: budget.amount,
                spent_amount: spent,
                remaining_amount: budget.amount - spent,
                usage_percentage: round2(usage),
                is_over_budget: spent > budget.amount,
                period: budget.period,
                year: budget.year,
                month: budget.month,
            }
        })
        .collect();

    BudgetStatusResponse {
        period: match month {
            Some(month) => format!("{year}-{month:02}"),
            None => year.to_string(),
        },
        total_budget: budget_status.iter().map(|item| item.budget_amount).sum(),
        total_spent: budget_status.iter().map(|item| item.spent_amount).sum(),
        budget_status,
    }
}

pub fn budget_alerts(data: &AppData, threshold: f64) -> AlertsResponse {
    budget_alerts_at(Local::now().date_naive(), data, threshold)
}

pub fn budget_alerts_at(today: NaiveDate, data: &AppData, threshold: f64) -> AlertsResponse {
    let status = budget_status(data, today.year(), Some(today.month()));
    let alerts: Vec<BudgetAlert> = status
        .budget_status
        .into_iter()
        .filter(|item| item.usage_percentage >= threshold)
        .map(|item| BudgetAlert {
            kind: if item.is_over_budget {
                AlertKind::OverBudget
            } else {
                AlertKind::Warning
            },
            message: format!(
                "{} has used {:.1}% of its budget.",
                item.category, item.usage_percentage
            ),
            category: item.category,
            usage_percentage: item.usage_percentage,
        })
        .collect();

    AlertsResponse {
        alert_count: alerts.len(),
        alerts,
    }
}

pub fn category_usage(data: &AppData, query: PeriodQuery) -> UsageResponse {
    let window = query.year.map(|year| {
        query
            .month
            .and_then(|month| month_bounds(year, month))
            .unwrap_or_else(|| year_bounds(year))
    });

    let mut total_amount = 0.0;
    let mut per_category: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    for expense in &data.expenses {
        if let Some((start, end)) = window {
            if expense.date < start || expense.date > end {
                continue;
            }
        }
        total_amount += expense.amount;
        let entry = per_category.entry(expense.category.as_str()).or_default();
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut categories: Vec<CategoryUsage> = data
        .categories
        .iter()
        .map(|category| {
            let (amount, count) = per_category
                .get(category.name.as_str())
                .copied()
                .unwrap_or_default();
            let percentage = if total_amount > 0.0 {
                amount / total_amount * 100.0
            } else {
                0.0
            };
            CategoryUsage {
                category_id: category.id.clone(),
                category_name: category.name.clone(),
                color: category.color.clone(),
                total_amount: amount,
                transaction_count: count,
                percentage: round2(percentage),
            }
        })
        .collect();
    categories.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));

    let period = match (query.year, query.month) {
        (Some(year), Some(month)) => format!("{year}-{month:02}"),
        (Some(year), None) => year.to_string(),
        _ => "all".to_string(),
    };

    UsageResponse {
        period,
        total_amount,
        categories,
    }
}

fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
    (start, end)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
