use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use devbills_core::TransactionType;

mod auth;
mod browse;
mod commands;
mod config;
mod logging;
mod state;

use commands::{App, ListOptions, NewTransaction};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("DEVBILLS_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "devbills", version = VERSION, about = "DevBills personal finance client")]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage ~/.devbills/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Store or clear the API token
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// List, create or delete transactions
    Transactions {
        #[command(subcommand)]
        command: TransactionsCommand,
    },

    /// List categories
    Categories {
        #[arg(long = "type")]
        kind: Option<TransactionType>,
    },

    /// Month summary and income/expense history
    Dashboard {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Interactive month browser with search and delete
    Browse,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Paste a token issued by the identity provider
    Login,
    /// Forget the stored token
    Logout,
    Status,
}

#[derive(Subcommand, Debug)]
enum TransactionsCommand {
    /// Transactions of one month (defaults to the current one)
    List {
        #[command(flatten)]
        period: PeriodArgs,

        /// Keep only descriptions containing this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Server-side category filter (category id)
        #[arg(long)]
        category: Option<String>,

        #[arg(long = "type")]
        kind: Option<TransactionType>,
    },

    /// Delete one transaction by id
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Create a transaction
    New {
        #[arg(long)]
        description: String,

        #[arg(long)]
        amount: Decimal,

        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Category id or name
        #[arg(long)]
        category: String,

        #[arg(long = "type", default_value_t = TransactionType::Expense)]
        kind: TransactionType,
    },
}

#[derive(Args, Debug)]
struct PeriodArgs {
    /// 1-12 (default: current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Default: current year
    #[arg(long)]
    year: Option<i32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Command::Browse) {
        logging::init_file(cli.verbose, &state::log_path()?)?;
    } else {
        logging::init_stderr(cli.verbose)?;
    }

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },

        Command::Auth { command } => match command {
            AuthCommand::Login => auth::login()?,
            AuthCommand::Logout => auth::logout()?,
            AuthCommand::Status => auth::status()?,
        },

        Command::Transactions { command } => {
            let app = App::connect(config::load_config()?)?;
            match command {
                TransactionsCommand::List {
                    period,
                    search,
                    category,
                    kind,
                } => {
                    let opts = ListOptions {
                        period: app.period(period.month, period.year)?,
                        search,
                        category_id: category,
                        kind,
                    };
                    commands::list(&app, opts).await?;
                }
                TransactionsCommand::Delete { id, yes } => {
                    commands::delete(&app, &id, yes).await?;
                }
                TransactionsCommand::New {
                    description,
                    amount,
                    date,
                    category,
                    kind,
                } => {
                    let new = NewTransaction {
                        kind,
                        description,
                        amount,
                        date,
                        category,
                    };
                    commands::create(&app, new).await?;
                }
            }
        }

        Command::Categories { kind } => {
            let app = App::connect(config::load_config()?)?;
            commands::categories(&app, kind).await?;
        }

        Command::Dashboard { period } => {
            let app = App::connect(config::load_config()?)?;
            let period = app.period(period.month, period.year)?;
            commands::dashboard(&app, period).await?;
        }

        Command::Browse => {
            let app = App::connect(config::load_config()?)?;
            browse::run_browse(app).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_arguments() {
        let cli = Cli::try_parse_from([
            "devbills", "transactions", "list", "--month", "3", "--year", "2024", "--search", "mer",
            "--type", "expense",
        ])
        .unwrap();
        let Command::Transactions {
            command:
                TransactionsCommand::List {
                    period,
                    search,
                    kind,
                    ..
                },
        } = cli.command
        else {
            panic!("expected transactions list");
        };
        assert_eq!((period.month, period.year), (Some(3), Some(2024)));
        assert_eq!(search.as_deref(), Some("mer"));
        assert_eq!(kind, Some(TransactionType::Expense));
    }

    #[test]
    fn test_month_out_of_range_is_rejected() {
        let res = Cli::try_parse_from(["devbills", "dashboard", "--month", "13"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_new_defaults_to_expense() {
        let cli = Cli::try_parse_from([
            "devbills", "transactions", "new", "--description", "Mercado", "--amount", "42.90",
            "--date", "2024-03-05", "--category", "Food",
        ])
        .unwrap();
        let Command::Transactions {
            command: TransactionsCommand::New { kind, amount, date, .. },
        } = cli.command
        else {
            panic!("expected transactions new");
        };
        assert_eq!(kind, TransactionType::Expense);
        assert_eq!(amount, "42.90".parse::<Decimal>().unwrap());
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5));
    }
}
