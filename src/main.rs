use clap::{Parser, Subcommand, ValueEnum};
use creatorhub::application::catalog::CatalogService;
use creatorhub::application::checkout::Checkout;
use creatorhub::config::{PaymentConfig, SessionTiming};
use creatorhub::domain::criteria::{FilterCriteria, SortMode};
use creatorhub::domain::money::Amount;
use creatorhub::domain::payment::{PaymentKind, Quote, TipPercentage};
use creatorhub::domain::ports::{CatalogSourceBox, PaymentGatewayHandle};
use creatorhub::error::MarketplaceError;
use creatorhub::infrastructure::in_memory::InMemoryCatalog;
use creatorhub::infrastructure::json_file::JsonFileCatalog;
use creatorhub::infrastructure::sandbox_gateway::SandboxGateway;
use creatorhub::interfaces::csv::creator_writer::CreatorWriter;
use creatorhub::interfaces::csv::order_reader::OrderReader;
use creatorhub::interfaces::csv::payment_writer::{OutcomeWriter, QuoteWriter};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Query the creator catalog and print matches as CSV
    Search(SearchArgs),
    /// Print the fee and tip breakdown for a payment
    Quote {
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(long)]
        amount: Decimal,
        /// Tip percentage (0, 10, 15 or 20), service bookings only
        #[arg(long)]
        tip: Option<u8>,
    },
    /// Run every payment request in a CSV file through checkout
    Pay {
        /// Input payment requests CSV file
        input: PathBuf,
        #[arg(long, default_value_t = 2000)]
        processing_delay_ms: u64,
        #[arg(long, default_value_t = 2000)]
        success_delay_ms: u64,
    },
}

#[derive(clap::Args)]
struct SearchArgs {
    /// JSON file holding an array of creators. Defaults to the bundled catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[arg(long, default_value = "")]
    query: String,
    #[arg(long = "category")]
    categories: Vec<String>,
    #[arg(long = "language")]
    languages: Vec<String>,
    #[arg(long)]
    min_age: Option<u32>,
    #[arg(long)]
    max_age: Option<u32>,
    #[arg(long)]
    min_price: Option<Decimal>,
    #[arg(long)]
    max_price: Option<Decimal>,
    #[arg(long)]
    online: bool,
    #[arg(long)]
    verified: bool,
    #[arg(long)]
    min_rating: Option<f64>,
    #[arg(long, value_enum)]
    sort: Option<SortArg>,
}

impl SearchArgs {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::default();
        if !self.categories.is_empty() {
            criteria = criteria.with_categories(self.categories.iter().cloned());
        }
        if !self.languages.is_empty() {
            criteria = criteria.with_languages(self.languages.iter().cloned());
        }
        if self.min_age.is_some() || self.max_age.is_some() {
            criteria = criteria
                .with_age_range(self.min_age.unwrap_or(0)..=self.max_age.unwrap_or(u32::MAX));
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            criteria = criteria.with_price_range(
                self.min_price.unwrap_or(Decimal::ZERO)..=self.max_price.unwrap_or(Decimal::MAX),
            );
        }
        if self.online {
            criteria = criteria.with_online(true);
        }
        if self.verified {
            criteria = criteria.with_verified(true);
        }
        if let Some(rating) = self.min_rating {
            criteria = criteria.with_min_rating(rating);
        }
        if let Some(sort) = self.sort {
            criteria = criteria.with_sort(sort.into());
        }
        criteria
    }
}

#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
enum SortArg {
    Popular,
    Newest,
    PriceLow,
    PriceHigh,
    Rating,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Popular => SortMode::Popular,
            SortArg::Newest => SortMode::Newest,
            SortArg::PriceLow => SortMode::PriceLow,
            SortArg::PriceHigh => SortMode::PriceHigh,
            SortArg::Rating => SortMode::Rating,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
enum KindArg {
    Tip,
    Service,
    VideoCall,
    CustomContent,
}

impl From<KindArg> for PaymentKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Tip => PaymentKind::Tip,
            KindArg::Service => PaymentKind::Service,
            KindArg::VideoCall => PaymentKind::VideoCall,
            KindArg::CustomContent => PaymentKind::CustomContent,
        }
    }
}

fn open_catalog(path: Option<PathBuf>) -> creatorhub::error::Result<CatalogSourceBox> {
    if let Some(path) = path {
        match JsonFileCatalog::open(&path) {
            Ok(catalog) => return Ok(Box::new(catalog)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Catalog file unavailable, falling back to the bundled catalog"
                );
            }
        }
    }
    Ok(Box::new(InMemoryCatalog::seeded()?))
}

async fn search(args: SearchArgs) -> Result<()> {
    let criteria = args.criteria();
    let service = CatalogService::new(open_catalog(args.catalog).into_diagnostic()?);
    let creators = service
        .query(&args.query, &criteria)
        .await
        .into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = CreatorWriter::new(stdout.lock());
    writer.write_creators(&creators).into_diagnostic()?;
    Ok(())
}

fn quote(kind: PaymentKind, amount: Decimal, tip: Option<u8>) -> Result<()> {
    let tip = match tip {
        Some(_) if !kind.accepts_tip() => {
            return Err(MarketplaceError::ValidationError(format!(
                "Tips can only be added to service bookings, not {kind}"
            )))
            .into_diagnostic();
        }
        Some(percent) => TipPercentage::try_from(percent).into_diagnostic()?,
        None => TipPercentage::None,
    };
    let amount = Amount::new(amount).into_diagnostic()?;
    let quote = Quote::compute(kind, amount, tip, &PaymentConfig::default().fee_policy);

    let stdout = io::stdout();
    let mut writer = QuoteWriter::new(stdout.lock());
    writer.write_quote(&quote).into_diagnostic()?;
    Ok(())
}

async fn pay(input: PathBuf, timing: SessionTiming) -> Result<()> {
    let gateway: PaymentGatewayHandle = Arc::new(SandboxGateway::new());
    let checkout = Checkout::new(gateway, PaymentConfig::default().with_timing(timing));

    let file = File::open(input).into_diagnostic()?;
    let reader = OrderReader::new(file);
    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());

    for order in reader.orders() {
        match order {
            Ok(order) => match checkout.run(order).await {
                Ok(outcome) => writer.write_outcome(&outcome).into_diagnostic()?,
                Err(e) => tracing::warn!(error = %e, "Error processing payment request"),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Error reading payment request");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "creatorhub=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Search(args) => search(args).await,
        Command::Quote { kind, amount, tip } => quote(kind.into(), amount, tip),
        Command::Pay {
            input,
            processing_delay_ms,
            success_delay_ms,
        } => pay(
            input,
            SessionTiming::from_millis(processing_delay_ms, success_delay_ms),
        )
        .await,
    }
}
