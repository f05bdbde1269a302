mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use devbills_client::create::{SAVE_FAILED, SAVE_OK};
use devbills_client::dashboard::DEFAULT_HISTORY_MONTHS;
use devbills_client::notify::Level;
use devbills_client::{CreateFlow, DashboardController, NotificationLog, SubmitOutcome};
use devbills_core::{
    FormError, MonthlyItem, TransactionForm, TransactionSummary, TransactionType, categories_for,
    time::to_rfc3339_millis,
};
use rust_decimal::Decimal;
use support::{FakeGateway, category, period};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn filled_form() -> TransactionForm {
    TransactionForm {
        kind: TransactionType::Income,
        description: "Salário".into(),
        amount: "3500".parse().unwrap(),
        date: NaiveDate::from_ymd_opt(2024, 3, 5),
        category_id: "c-salary".into(),
    }
}

fn flow(gw: FakeGateway) -> (CreateFlow, Arc<FakeGateway>, NotificationLog) {
    let gw = Arc::new(gw);
    let log = NotificationLog::new();
    (CreateFlow::new(gw.clone(), Arc::new(log.clone())), gw, log)
}

#[tokio::test]
async fn test_invalid_form_is_not_submitted() {
    let (flow, gw, log) = flow(FakeGateway::new());
    let mut form = filled_form();
    form.amount = Decimal::ZERO;

    let outcome = flow.submit(&form).await;

    assert!(matches!(outcome, SubmitOutcome::Invalid(FormError::Incomplete { .. })));
    assert!(gw.created.lock().unwrap().is_empty());
    assert!(log.all().is_empty());
}

#[tokio::test]
async fn test_valid_form_creates_at_midday() {
    let (flow, gw, log) = flow(FakeGateway::new());

    let outcome = flow.submit(&filled_form()).await;

    let SubmitOutcome::Saved(created) = outcome else {
        panic!("expected Saved, got {outcome:?}");
    };
    assert_eq!(created.description, "Salário");
    assert_eq!(created.kind, TransactionType::Income);

    let sent = gw.created.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(to_rfc3339_millis(sent[0].date), "2024-03-05T12:00:00.000Z");
    assert_eq!(sent[0].category_id, "c-salary");

    let last = log.last().unwrap();
    assert_eq!((last.level, last.message.as_str()), (Level::Success, SAVE_OK));
}

#[tokio::test]
async fn test_failed_create_keeps_form_and_notifies() {
    let gw = FakeGateway::new();
    gw.fail_create(true);
    let (flow, _, log) = flow(gw);
    let form = filled_form();
    let before = form.clone();

    let outcome = flow.submit(&form).await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(form, before);
    let last = log.last().unwrap();
    assert_eq!((last.level, last.message.as_str()), (Level::Error, SAVE_FAILED));
}

#[tokio::test]
async fn test_category_picker_follows_type() {
    let gw = FakeGateway::new().with_categories(vec![
        category("c-food", "Food", TransactionType::Expense),
        category("c-salary", "Salary", TransactionType::Income),
    ]);
    let (flow, _, _) = flow(gw);

    let categories = flow.load_categories().await.unwrap();
    let income: Vec<_> = categories_for(TransactionType::Income, &categories)
        .into_iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(income, vec!["Salary"]);
}

fn summary(balance: &str) -> TransactionSummary {
    TransactionSummary {
        total_expenses: dec("100"),
        total_incomes: dec("100") + dec(balance),
        balance: dec(balance),
        expenses_by_category: Vec::new(),
    }
}

fn history(n: usize) -> Vec<MonthlyItem> {
    (0..n)
        .map(|i| MonthlyItem {
            name: format!("M{i}"),
            income: "10".parse().unwrap(),
            expense: "5".parse().unwrap(),
        })
        .collect()
}

#[tokio::test]
async fn test_dashboard_loads_summary_and_history() {
    let gw = Arc::new(
        FakeGateway::new()
            .with_summary(summary("250"))
            .with_history(history(6)),
    );
    let dash = DashboardController::new(gw, period(3, 2024), DEFAULT_HISTORY_MONTHS);
    assert!(dash.snapshot().summary_loading);

    dash.load(period(3, 2024)).await;

    let view = dash.snapshot();
    assert!(!view.summary_loading && !view.history_loading);
    assert_eq!(view.summary.balance, dec("250"));
    assert_eq!(view.history.len(), 4);
}

#[tokio::test]
async fn test_dashboard_failures_degrade_quietly() {
    let gw = Arc::new(
        FakeGateway::new()
            .with_summary(summary("250"))
            .with_history(history(4)),
    );
    let dash = DashboardController::new(gw.clone(), period(3, 2024), DEFAULT_HISTORY_MONTHS);
    dash.load(period(3, 2024)).await;

    gw.fail_summary(true);
    gw.fail_history(true);
    dash.load(period(4, 2024)).await;

    let view = dash.snapshot();
    assert_eq!(view.period, period(4, 2024));
    assert_eq!(view.summary.balance, dec("250"));
    assert!(view.history.is_empty());
    assert!(!view.summary_loading);
}

#[tokio::test(start_paused = true)]
async fn test_summary_shows_before_slow_history() {
    let gw = Arc::new(
        FakeGateway::new()
            .with_summary(summary("250"))
            .with_history(history(4))
            .with_history_delay(Duration::from_millis(500)),
    );
    let dash = DashboardController::new(gw, period(3, 2024), DEFAULT_HISTORY_MONTHS);

    let task = tokio::spawn({
        let dash = dash.clone();
        async move { dash.load(period(3, 2024)).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let view = dash.snapshot();
    assert!(!view.summary_loading);
    assert_eq!(view.summary.balance, dec("250"));
    assert!(view.history_loading);
    assert!(view.history.is_empty());

    task.await.unwrap();
    let view = dash.snapshot();
    assert!(!view.history_loading);
    assert_eq!(view.history.len(), 4);
}
