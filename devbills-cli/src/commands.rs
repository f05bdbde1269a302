use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::io::{self, Write};
use std::sync::Arc;

use devbills_client::{
    CreateFlow, DashboardController, DeleteOutcome, Gateway, HttpGateway, Level, Notifier,
    Session, SubmitOutcome, TransactionsController, TransactionsView,
};
use devbills_core::{
    Category, Period, Transaction, TransactionForm, TransactionType, categories_for,
    category_shares, format_currency, format_date, time::today_in,
};

use crate::auth::load_auth;
use crate::config::Config;

/// Prints notifications the way the browser would toast them.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Success => {
                tracing::debug!(message, "notify success");
                println!("✓ {message}");
            }
            Level::Error => {
                tracing::debug!(message, "notify error");
                eprintln!("✗ {message}");
            }
        }
    }
}

/// Everything a command needs to reach the API as the stored user.
pub struct App {
    pub config: Config,
    pub session: Session,
    pub gateway: Arc<dyn Gateway>,
}

impl App {
    pub fn connect(config: Config) -> Result<Self> {
        let session = load_auth()?.session();
        session
            .require_user()
            .map_err(|_| anyhow!("not signed in (run: devbills auth login)"))?;

        let gateway = HttpGateway::new(config.api.base_url.clone(), config.timeout(), session.clone())
            .context("build http client")?;
        tracing::debug!(base_url = %config.api.base_url, "connected");

        Ok(Self {
            config,
            session,
            gateway: Arc::new(gateway),
        })
    }

    /// The current month in the configured timezone, with either part
    /// overridden.
    pub fn period(&self, month: Option<u32>, year: Option<i32>) -> Result<Period> {
        let current = Period::current(self.config.timezone(), Utc::now());
        Ok(Period::new(
            month.unwrap_or(current.month()),
            year.unwrap_or(current.year()),
        )?)
    }

    pub fn today(&self) -> NaiveDate {
        today_in(self.config.timezone(), Utc::now())
    }

    fn transactions(&self, period: Period) -> TransactionsController {
        TransactionsController::with_debounce(
            self.gateway.clone(),
            Arc::new(ConsoleNotifier),
            period,
            self.config.search_debounce(),
        )
    }

    fn expired(&self) -> Result<()> {
        if !self.session.is_authenticated() {
            bail!("the API rejected the stored token (run: devbills auth login)");
        }
        Ok(())
    }
}

pub struct ListOptions {
    pub period: Period,
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub kind: Option<TransactionType>,
}

pub async fn list(app: &App, opts: ListOptions) -> Result<()> {
    let controller = app.transactions(opts.period);
    controller.set_server_filter(opts.category_id, opts.kind);
    controller.open().await;
    if let Some(search) = &opts.search {
        controller.search_now(search);
    }

    let view = controller.snapshot();
    app.expired()?;
    if let Some(err) = &view.error {
        bail!("{err}");
    }
    print_list(&view);
    Ok(())
}

fn print_list(view: &TransactionsView) {
    println!("{}", view.period.label());
    if let Some(message) = empty_message(view) {
        println!("{message}");
        return;
    }
    for t in &view.filtered {
        println!("{}", row(t));
    }
    let total: Decimal = view.filtered.iter().map(Transaction::signed_amount).sum();
    println!("{} transaction(s), net {}", view.filtered.len(), format_currency(total));
}

/// Text for the list area when there are no rows to show.
pub fn empty_message(view: &TransactionsView) -> Option<String> {
    if !view.has_transactions() {
        Some("No transactions registered for this month.".to_string())
    } else if !view.has_results() {
        Some(format!("No transactions found for \"{}\".", view.applied_search.trim()))
    } else {
        None
    }
}

pub fn row(t: &Transaction) -> String {
    format!(
        "{}  {} {:<32} {:<16} {:>14}  {}",
        format_date(t.date),
        t.kind.arrow(),
        truncate(&t.description, 32),
        truncate(&t.category.name, 16),
        format_currency(t.signed_amount()),
        t.id,
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn ask(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    io::stdout().flush().ok();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_err() {
        return false;
    }
    matches!(s.trim(), "y" | "Y" | "yes")
}

pub async fn delete(app: &App, id: &str, yes: bool) -> Result<()> {
    let controller = app.transactions(app.period(None, None)?);
    let outcome = controller.delete(id, |prompt: &str| yes || ask(prompt)).await;
    app.expired()?;
    match outcome {
        DeleteOutcome::Deleted => Ok(()),
        DeleteOutcome::Declined => {
            println!("Cancelled.");
            Ok(())
        }
        DeleteOutcome::AlreadyInFlight => bail!("a delete for {id} is already running"),
        DeleteOutcome::Failed(e) => bail!("delete {id}: {e}"),
    }
}

pub struct NewTransaction {
    pub kind: TransactionType,
    pub description: String,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
    pub category: String,
}

/// Match a category by id, or by name ignoring case, within the type.
pub fn resolve_category<'a>(
    kind: TransactionType,
    categories: &'a [Category],
    wanted: &str,
) -> Option<&'a Category> {
    let candidates = categories_for(kind, categories);
    candidates
        .iter()
        .find(|c| c.id == wanted)
        .or_else(|| candidates.iter().find(|c| c.name.eq_ignore_ascii_case(wanted)))
        .copied()
}

pub async fn create(app: &App, new: NewTransaction) -> Result<()> {
    let flow = CreateFlow::new(app.gateway.clone(), Arc::new(ConsoleNotifier));
    let categories = flow.load_categories().await.context("load categories")?;

    let Some(category) = resolve_category(new.kind, &categories, &new.category) else {
        let names: Vec<_> = categories_for(new.kind, &categories)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        bail!(
            "unknown {} category {:?} (choose one of: {})",
            new.kind,
            new.category,
            names.join(", ")
        );
    };

    let form = TransactionForm {
        kind: new.kind,
        description: new.description,
        amount: new.amount,
        date: Some(new.date.unwrap_or_else(|| app.today())),
        category_id: category.id.clone(),
    };

    match flow.submit(&form).await {
        SubmitOutcome::Saved(t) => {
            println!("{}", row(&t));
            Ok(())
        }
        SubmitOutcome::Invalid(e) => bail!("{e}"),
        SubmitOutcome::Failed(e) => {
            app.expired()?;
            bail!("create transaction: {e}")
        }
    }
}

pub async fn categories(app: &App, kind: Option<TransactionType>) -> Result<()> {
    let all = app.gateway.list_categories().await.context("load categories")?;
    let shown: Vec<&Category> = match kind {
        Some(kind) => categories_for(kind, &all),
        None => all.iter().collect(),
    };
    if shown.is_empty() {
        println!("No categories.");
    }
    for c in shown {
        println!("{:<24} {:<8} {:<8} {}", c.id, c.kind, c.color, c.name);
    }
    Ok(())
}

pub async fn dashboard(app: &App, period: Period) -> Result<()> {
    let controller =
        DashboardController::new(app.gateway.clone(), period, app.config.view.history_months);
    controller.load(period).await;
    app.expired()?;

    let view = controller.snapshot();
    let s = &view.summary;
    println!("{}", view.period.label());
    println!("  Balance   {:>16}", format_currency(s.balance));
    println!("  Incomes   {:>16}", format_currency(s.total_incomes));
    println!("  Expenses  {:>16}", format_currency(s.total_expenses));

    let shares = category_shares(s);
    if !shares.is_empty() {
        println!("\nExpenses by category");
        for share in shares {
            println!("  {share}");
        }
    }

    if !view.history.is_empty() {
        println!("\nHistory");
        for item in &view.history {
            println!(
                "  {:<10} in {:>14}  out {:>14}",
                item.name,
                format_currency(item.income),
                format_currency(item.expense)
            );
        }
    }
    Ok(())
}
