use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use simples_core::calculations::{
    BracketWarningEngine, TaxCalculator, TaxProjector, contribution, monthly_breakdown,
};
use simples_core::db::LedgerRegistry;
use simples_core::format::{format_currency, format_percent, ordinal};
use simples_core::{BracketTable, BracketWarning, TaxLedger, WarningLevel};
use simples_data::{AppConfig, IncomeLoader, logging};
use simples_db_sqlite::SqliteLedgerFactory;
use tracing::info;

/// Simples Nacional tax calculations over an income ledger.
#[derive(Parser, Debug)]
#[command(name = "simples")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file (defaults to ./simples.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database connection string, overriding the config file
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Log level or filter directive, overriding the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load incomes from a CSV file, replacing the accounts it contains
    Load {
        /// CSV with columns account_id,received_on,gross_amount,tax_amount,net_amount,description
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Tax on one gross payment
    Calc {
        /// Gross revenue of the trailing twelve months
        #[arg(long)]
        revenue_12m: Decimal,

        /// Gross amount of the payment
        #[arg(long)]
        gross: Decimal,

        /// Force a bracket (1-6) instead of looking it up
        #[arg(long)]
        bracket: Option<u8>,
    },

    /// Bracket warning for a revenue position
    Warning {
        /// Gross revenue of the trailing twelve months
        #[arg(long)]
        revenue_12m: Decimal,

        /// Projected gross revenue for the full year
        #[arg(long)]
        projected: Decimal,
    },

    /// Year-to-date figures and full-year projection
    Projection {
        /// Accounts to aggregate, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        accounts: Vec<i64>,

        /// Calendar year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Month-by-month figures for one year
    Breakdown {
        /// Accounts to aggregate, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        accounts: Vec<i64>,

        /// Calendar year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(database) = args.database {
        config.database.connection_string = database;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    let table = BracketTable::simples_nacional();

    match args.command {
        Command::Load { file } => {
            let ledger = open_ledger(&config).await?;
            run_load(ledger.as_ref(), &table, &file).await
        }
        Command::Calc {
            revenue_12m,
            gross,
            bracket,
        } => {
            run_calc(&table, &config, revenue_12m, gross, bracket);
            Ok(())
        }
        Command::Warning {
            revenue_12m,
            projected,
        } => {
            let bracket = table.lookup(revenue_12m).index;
            let warning =
                BracketWarningEngine::new(&table).bracket_warning(revenue_12m, projected, bracket);
            println!("Faixa atual:      {}", ordinal(bracket));
            print_warning(&warning);
            Ok(())
        }
        Command::Projection { accounts, year } => {
            let ledger = open_ledger(&config).await?;
            run_projection(ledger.as_ref(), &table, &config, &accounts, year).await
        }
        Command::Breakdown { accounts, year } => {
            let ledger = open_ledger(&config).await?;
            run_breakdown(ledger.as_ref(), &config, &accounts, year).await
        }
    }
}

async fn open_ledger(config: &AppConfig) -> Result<Box<dyn TaxLedger>> {
    let mut registry = LedgerRegistry::new();
    registry.register(Box::new(SqliteLedgerFactory));

    registry
        .create(&config.database)
        .await
        .with_context(|| {
            format!(
                "Failed to open {} ledger: {}",
                config.database.backend, config.database.connection_string
            )
        })
}

async fn run_load(
    ledger: &dyn TaxLedger,
    table: &BracketTable,
    path: &Path,
) -> Result<()> {
    info!(file = %path.display(), "Loading incomes");

    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;

    let records = IncomeLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let incomes = IncomeLoader::prepare(table, &records);
    let inserted = IncomeLoader::load(ledger, &incomes)
        .await
        .context("Failed to load incomes into the ledger")?;

    println!("Successfully loaded {} incomes into the ledger.", inserted);

    Ok(())
}

fn run_calc(
    table: &BracketTable,
    config: &AppConfig,
    revenue_12m: Decimal,
    gross: Decimal,
    bracket: Option<u8>,
) {
    let calculator = TaxCalculator::new(table);
    let mut result = match bracket {
        Some(bracket) => calculator.calculate_tax_manual(revenue_12m, gross, bracket),
        None => calculator.calculate_tax(revenue_12m, gross),
    };
    if config.contribution.is_some() {
        result = result.with_contribution(contribution(config.contribution.as_ref()));
    }

    let manual = if result.manual_override { " (manual)" } else { "" };
    println!("Faixa:            {}{}", ordinal(result.bracket), manual);
    println!(
        "Alíquota efetiva: {}",
        format_percent(result.effective_rate_percent())
    );
    println!("Valor bruto:      {}", format_currency(result.gross_amount));
    println!("Imposto:          {}", format_currency(result.tax_amount));
    println!("Valor líquido:    {}", format_currency(result.net_amount));
    if let Some(amount) = result.contribution_amount {
        println!("Contribuição:     {}", format_currency(amount));
    }
}

async fn run_projection(
    ledger: &dyn TaxLedger,
    table: &BracketTable,
    config: &AppConfig,
    accounts: &[i64],
    year: Option<i32>,
) -> Result<()> {
    let projector = TaxProjector::new(ledger, table);
    let projection = match year {
        Some(year) => {
            projector
                .tax_projection_for_year(year, accounts, config.contribution.as_ref())
                .await
        }
        None => {
            projector
                .tax_projection(accounts, config.contribution.as_ref())
                .await
        }
    }
    .context("Failed to compute projection")?;

    println!(
        "Ano {} ({} meses)",
        projection.year, projection.months_elapsed
    );
    println!();
    println!("                   Acumulado        Projetado");
    print_row(
        "Faturamento",
        projection.ytd_gross_income,
        projection.projected_annual_income,
    );
    print_row(
        "Imposto",
        projection.ytd_tax,
        projection.projected_annual_tax,
    );
    print_row(
        "Contribuição",
        projection.ytd_contribution,
        projection.projected_annual_contribution,
    );
    print_row(
        "Líquido",
        projection.ytd_net_income,
        projection.projected_net_income,
    );
    println!();
    println!("Faixa atual:      {}", ordinal(projection.current_bracket));
    println!(
        "Alíquota efetiva: {}",
        format_percent(projection.effective_rate_percent)
    );
    println!(
        "Próximo limite:   {}",
        format_currency(projection.next_threshold)
    );
    print_warning(&projection.warning);

    Ok(())
}

async fn run_breakdown(
    ledger: &dyn TaxLedger,
    config: &AppConfig,
    accounts: &[i64],
    year: Option<i32>,
) -> Result<()> {
    let year = year.unwrap_or_else(|| Local::now().year());
    let months = monthly_breakdown(ledger, year, accounts, config.contribution.as_ref())
        .await
        .context("Failed to compute monthly breakdown")?;

    println!(
        "{:<10} {:>18} {:>16} {:>16} {:>18}",
        "Mês", "Bruto", "Imposto", "Contribuição", "Líquido"
    );
    for month in &months {
        println!(
            "{:<10} {:>18} {:>16} {:>16} {:>18}",
            month.month_name,
            format_currency(month.gross_income),
            format_currency(month.tax_paid),
            format_currency(month.contribution_paid),
            format_currency(month.net_income),
        );
    }

    let total_gross: Decimal = months.iter().map(|m| m.gross_income).sum();
    let total_tax: Decimal = months.iter().map(|m| m.tax_paid).sum();
    let total_contribution: Decimal = months.iter().map(|m| m.contribution_paid).sum();
    let total_net: Decimal = months.iter().map(|m| m.net_income).sum();
    println!(
        "{:<10} {:>18} {:>16} {:>16} {:>18}",
        "Total",
        format_currency(total_gross),
        format_currency(total_tax),
        format_currency(total_contribution),
        format_currency(total_net),
    );

    Ok(())
}

fn print_row(
    label: &str,
    ytd: Decimal,
    projected: Decimal,
) {
    println!(
        "{:<14} {:>16} {:>16}",
        label,
        format_currency(ytd),
        format_currency(projected)
    );
}

fn print_warning(warning: &BracketWarning) {
    if warning.level == WarningLevel::None && warning.message.is_empty() {
        println!("Aviso:            nenhum");
        return;
    }
    println!("Aviso:            {} ({})", warning.level, warning.message);
    if let Some(rate) = warning.next_bracket_rate_percent {
        println!("Próxima alíquota: {}", format_percent(rate));
    }
    if warning.is_approaching {
        println!(
            "Faixa projetada:  {}",
            ordinal(warning.projected_bracket)
        );
    }
}
