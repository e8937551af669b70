use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};

use crate::application::{CategoryReport, LedgerService, SummaryReport};
use crate::config::{Config, ConfigOverrides};
use crate::domain::{
    ExpenseCategory, LedgerKind, NewExpense, NewInvoice, format_amount, format_with_currency,
    parse_amount,
};

/// Ledgerbook - invoices and expenses in plain CSV files
#[derive(Parser)]
#[command(name = "ledgerbook")]
#[command(about = "Record invoices and expenses to CSV ledgers and report totals")]
#[command(version)]
pub struct Cli {
    /// Config file path
    #[arg(long, default_value = "ledgerbook.toml", global = true)]
    pub config: PathBuf,

    /// Directory holding the ledger files (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Currency code for the amount column (overrides config)
    #[arg(long, global = true)]
    pub currency: Option<String>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the ledger files if they do not exist
    Init,

    /// Record an invoice
    Invoice {
        /// Client name
        #[arg(long)]
        client: String,

        /// Amount (e.g., "50000" or "50,000")
        #[arg(short, long)]
        amount: String,

        /// Description of the work billed
        #[arg(short, long, default_value = "")]
        description: String,

        /// Date of the invoice (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Log an expense
    Expense {
        /// Category: office, transport, supplies, other, or any custom name
        #[arg(short, long)]
        category: String,

        /// Amount (e.g., "15000")
        #[arg(short, long)]
        amount: String,

        /// Description of the expense
        #[arg(short, long, default_value = "")]
        description: String,

        /// Date of the expense (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List recorded invoices
    Invoices,

    /// List logged expenses
    Expenses,

    /// Show total income, total expenses and net profit
    Report {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export a ledger file as-is
    Export {
        /// Which ledger: invoices, expenses
        ledger: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_dir: self.data_dir.clone(),
            currency: self.currency.clone(),
            log_level: if self.verbose {
                Some("debug".to_string())
            } else {
                self.log_level.clone()
            },
        }
    }

    /// Resolve configuration from the config file and flags.
    pub fn load_config(&self) -> Result<Config> {
        Config::load(&self.config, &self.overrides())
    }

    pub fn run(self, config: &Config) -> Result<()> {
        let service = LedgerService::init(config).context("Failed to open ledgers")?;

        match self.command {
            Commands::Init => {
                println!("Invoices: {}", config.invoice_path().display());
                println!("Expenses: {}", config.expense_path().display());
            }

            Commands::Invoice {
                client,
                amount,
                description,
                date,
            } => {
                let amount = parse_amount(&amount)
                    .context("Invalid amount format. Use '50000' or '50,000'")?;
                let mut request = NewInvoice::new(client, amount).with_description(description);
                if let Some(date_str) = date {
                    request = request.with_timestamp(parse_date(&date_str)?);
                }

                let invoice = service.record_invoice(request)?;
                println!(
                    "Invoice saved: {} for {}",
                    format_with_currency(invoice.amount, service.currency()),
                    invoice.client
                );
            }

            Commands::Expense {
                category,
                amount,
                description,
                date,
            } => {
                let category = ExpenseCategory::from_str(&category)
                    .context("Category must not be empty")?;
                let amount =
                    parse_amount(&amount).context("Invalid amount format. Use '15000' or '15,000'")?;
                let mut request = NewExpense::new(category, amount).with_description(description);
                if let Some(date_str) = date {
                    request = request.with_timestamp(parse_date(&date_str)?);
                }

                let expense = service.record_expense(request)?;
                println!(
                    "Expense saved: {} ({})",
                    format_with_currency(expense.amount, service.currency()),
                    expense.category
                );
            }

            Commands::Invoices => run_invoices_command(&service)?,

            Commands::Expenses => run_expenses_command(&service)?,

            Commands::Report { format } => run_report_command(&service, &format)?,

            Commands::Export { ledger, output } => {
                run_export_command(&service, &ledger, output, self.verbose)?
            }
        }

        Ok(())
    }
}

fn run_invoices_command(service: &LedgerService) -> Result<()> {
    let invoices = service.list_invoices()?;
    if invoices.is_empty() {
        println!("No invoices recorded.");
        return Ok(());
    }

    println!(
        "{:<19} {:<20} {:<30} {:>15}",
        "DATE", "CLIENT", "DESCRIPTION", "AMOUNT"
    );
    println!("{}", "-".repeat(87));
    for invoice in &invoices {
        println!(
            "{:<19} {:<20} {:<30} {:>15}",
            invoice.timestamp.format("%Y-%m-%d %H:%M:%S"),
            truncate(&invoice.client, 20),
            truncate(&invoice.description, 30),
            format_amount(invoice.amount)
        );
    }
    Ok(())
}

fn run_expenses_command(service: &LedgerService) -> Result<()> {
    let expenses = service.list_expenses()?;
    if expenses.is_empty() {
        println!("No expenses logged.");
        return Ok(());
    }

    println!(
        "{:<19} {:<12} {:<30} {:>15}",
        "DATE", "CATEGORY", "DESCRIPTION", "AMOUNT"
    );
    println!("{}", "-".repeat(79));
    for expense in &expenses {
        println!(
            "{:<19} {:<12} {:<30} {:>15}",
            expense.timestamp.format("%Y-%m-%d %H:%M:%S"),
            truncate(expense.category.as_str(), 12),
            truncate(&expense.description, 30),
            format_amount(expense.amount)
        );
    }
    Ok(())
}

fn run_report_command(service: &LedgerService, format: &str) -> Result<()> {
    let summary = service.summary()?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "csv" => {
            println!("metric,amount");
            println!("income,{}", summary.total_income);
            println!("expenses,{}", summary.total_expenses);
            println!("net_profit,{}", summary.net_profit);
        }
        "table" => {
            let breakdown = service.expense_breakdown()?;
            print_summary_table(&summary, &breakdown);
        }
        other => {
            anyhow::bail!("Invalid format '{}'. Valid formats: table, json, csv", other);
        }
    }

    Ok(())
}

fn print_summary_table(summary: &SummaryReport, breakdown: &CategoryReport) {
    let currency = &summary.currency;
    println!("Accounting Summary ({})", currency);
    println!();
    println!(
        "Total Income:    {:>20}  ({} invoices)",
        format_with_currency(summary.total_income, currency),
        summary.invoice_count
    );
    println!(
        "Total Expenses:  {:>20}  ({} expenses)",
        format_with_currency(summary.total_expenses, currency),
        summary.expense_count
    );
    println!("{}", "-".repeat(38));
    println!(
        "Net Profit:      {:>20}",
        format_with_currency(summary.net_profit, currency)
    );

    if !breakdown.categories.is_empty() {
        println!();
        println!("Expenses by Category:");
        for (i, cat) in breakdown.categories.iter().enumerate() {
            println!(
                "  {}. {:<18} {:>15} ({:.1}%)",
                i + 1,
                truncate(&cat.category, 18),
                format_amount(cat.total),
                cat.percentage
            );
        }
    }
}

fn run_export_command(
    service: &LedgerService,
    ledger: &str,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let kind = LedgerKind::from_str(ledger).ok_or_else(|| {
        anyhow::anyhow!("Invalid ledger '{}'. Valid ledgers: invoices, expenses", ledger)
    })?;

    let exporter = Exporter::new(service);
    let contents = service.export_bytes(kind)?;

    let writer: Box<dyn Write> = match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let bytes = exporter.write_bytes(kind, &contents, writer)?;
    if let Some(path) = output {
        eprintln!(
            "Exported {} {} ({} bytes) to {}",
            exporter.record_count(kind)?,
            kind,
            bytes,
            path.display()
        );
    } else if verbose {
        eprintln!(
            "Exported {} bytes (suggested file name: {})",
            bytes,
            service.export_file_name(kind)
        );
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a YYYY-MM-DD date as midnight local time.
fn parse_date(date_str: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))?;
    Ok(date.and_time(NaiveTime::default()))
}
