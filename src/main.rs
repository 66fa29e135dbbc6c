use chrono::Local;
use dotenvy::dotenv;
use library_ledger::{
    config::{database, settings},
    core::{
        dashboard::{self, DashboardSummary, ExpensesSummary, PaymentsSummary, ReportMetrics},
        report::format_amount,
    },
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load settings, letting a CLI argument pick the owner
    let settings = settings::load_default_settings()?.with_env_overrides();
    let owner_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings.owner_id.clone());
    info!(%owner_id, "Loaded settings for {}", settings.library_name);

    // 4. Connect and make sure the tables exist
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Fetch a snapshot and print the overview
    let snapshot = dashboard::load_snapshot(&db, &owner_id).await;
    for list in &snapshot.failed {
        warn!("{:?} could not be loaded; figures below treat it as empty", list);
    }

    let symbol = settings.currency_symbol.as_str();
    let overview = DashboardSummary::from_snapshot(&snapshot);
    let payments = PaymentsSummary::compute(&snapshot.payments);
    let expenses = ExpensesSummary::compute(&snapshot.expenses, &Local::now());
    let report = ReportMetrics::compute(&snapshot.payments, &snapshot.expenses);

    println!("{} - overview", settings.library_name);
    println!(
        "Students:          {} ({} active, {} inactive, {} with dues)",
        overview.students.total,
        overview.students.active,
        overview.students.inactive,
        overview.students.with_dues
    );
    println!("Total dues:        {}", format_amount(overview.total_dues, symbol));
    println!("Total received:    {}", format_amount(overview.total_received, symbol));
    println!(
        "Available balance: {} (after {} expenses)",
        format_amount(overview.available_balance, symbol),
        format_amount(overview.total_expenses, symbol)
    );
    println!("Net balance:       {}", format_amount(overview.net_balance, symbol));
    println!(
        "Payments:          {} cash, {} online over {} transactions",
        format_amount(payments.cash, symbol),
        format_amount(payments.online, symbol),
        payments.transactions
    );
    println!(
        "Expenses:          {} this month, {} average",
        format_amount(expenses.this_month, symbol),
        format_amount(expenses.average, symbol)
    );
    for (category, amount) in report.by_category.iter() {
        println!("  {:<22} {}", category.as_str(), format_amount(amount, symbol));
    }

    Ok(())
}
