use jiff::civil::date;
use uuid::Uuid;

use masroufi_core::models::{Budget, BudgetPeriod, Category, Transaction, TransactionType};
use masroufi_core::summary::{summarize, UNCATEGORIZED};

struct Fixture {
    user: Uuid,
    food: Category,
    transport: Category,
    salary: Category,
}

fn fixture() -> Fixture {
    let user = Uuid::new_v4();
    Fixture {
        user,
        food: Category::new(user, "Food", TransactionType::Expense),
        transport: Category::new(user, "Transport", TransactionType::Expense),
        salary: Category::new(user, "Salary", TransactionType::Income),
    }
}

fn txn(f: &Fixture, kind: TransactionType, amount: f64, category: &Category) -> Transaction {
    Transaction::new(f.user, kind, amount, category.id, date(2024, 3, 1))
}

#[test]
fn top_categories_and_totals() {
    let f = fixture();
    let transactions = vec![
        txn(&f, TransactionType::Expense, 100.0, &f.food),
        txn(&f, TransactionType::Expense, 50.0, &f.food),
        txn(&f, TransactionType::Expense, 30.0, &f.transport),
        txn(&f, TransactionType::Income, 500.0, &f.salary),
    ];
    let categories = vec![f.food.clone(), f.transport.clone(), f.salary.clone()];

    let summary = summarize("MAD", &transactions, &categories, &[]);

    assert_eq!(
        summary.top_expense_categories,
        vec![("Food".to_string(), 150.0), ("Transport".to_string(), 30.0)]
    );
    assert_eq!(summary.total_income, 500.0);
    assert_eq!(summary.total_expense, 180.0);
}

#[test]
fn top_categories_are_capped_at_three() {
    let f = fixture();
    let extra: Vec<Category> = ["Rent", "Leisure", "Health"]
        .iter()
        .map(|n| Category::new(f.user, *n, TransactionType::Expense))
        .collect();
    let mut transactions = vec![txn(&f, TransactionType::Expense, 5.0, &f.food)];
    for (i, c) in extra.iter().enumerate() {
        transactions.push(txn(&f, TransactionType::Expense, 100.0 * (i as f64 + 1.0), c));
    }

    let summary = summarize("MAD", &transactions, &extra, &[]);

    let names: Vec<&str> = summary
        .top_expense_categories
        .iter()
        .map(|(n, _)| n.as_str())
        .collect();
    assert_eq!(names, vec!["Health", "Leisure", "Rent"]);
}

#[test]
fn unknown_category_is_labelled() {
    let f = fixture();
    let transactions = vec![txn(&f, TransactionType::Expense, 12.0, &f.food)];

    let summary = summarize("MAD", &transactions, &[], &[]);

    assert_eq!(
        summary.top_expense_categories,
        vec![(UNCATEGORIZED.to_string(), 12.0)]
    );
}

#[test]
fn budget_percentages_are_rounded() {
    let f = fixture();
    let mut budget = Budget::new(f.user, f.food.id, 300.0, BudgetPeriod::Monthly, date(2024, 3, 1));
    budget.spent = 100.0;
    let mut empty = Budget::new(f.user, f.transport.id, 0.0, BudgetPeriod::Monthly, date(2024, 3, 1));
    empty.spent = 20.0;

    let summary = summarize(
        "MAD",
        &[],
        &[f.food.clone(), f.transport.clone()],
        &[budget, empty],
    );

    assert_eq!(summary.budgets[0].category, "Food");
    assert_eq!(summary.budgets[0].percentage, 33);
    assert_eq!(summary.budgets[1].percentage, 0);
}

#[test]
fn context_string_lists_every_section() {
    let f = fixture();
    let transactions = vec![
        txn(&f, TransactionType::Expense, 100.0, &f.food),
        txn(&f, TransactionType::Income, 500.0, &f.salary),
    ];
    let mut budget = Budget::new(f.user, f.food.id, 200.0, BudgetPeriod::Monthly, date(2024, 3, 1));
    budget.spent = 150.0;

    let text = summarize(
        "EUR",
        &transactions,
        &[f.food.clone(), f.salary.clone()],
        &[budget],
    )
    .to_context_string();

    assert!(text.contains("Currency: EUR"));
    assert!(text.contains("Total monthly income: 500.00"));
    assert!(text.contains("Total monthly expenses: 100.00"));
    assert!(text.contains("- Food: 100.00"));
    assert!(text.contains("- Food: spent 150.00 of 200.00 (75%)"));
}

#[test]
fn empty_collections_omit_optional_sections() {
    let text = summarize("MAD", &[], &[], &[]).to_context_string();
    assert!(!text.contains("Top expense categories"));
    assert!(!text.contains("Budgets:"));
}
