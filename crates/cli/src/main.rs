//! `stockroom` command-line client.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use stockroom_auth::{Role, landing_page, navigation};
use stockroom_client::{
    ClientConfig, HttpInventoryService, InventoryService, ServiceError, workflow,
};
use stockroom_core::{ItemId, PurchaseOrderId, RequirementId};
use stockroom_inventory::matches_query;
use stockroom_purchasing::InvoiceDraft;

mod args;
mod render;

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "Stock, requirement and purchase order client", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides STOCKROOM_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides STOCKROOM_AUTH_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Role of the signed-in user (overrides STOCKROOM_ROLE)
    #[arg(long, global = true)]
    role: Option<Role>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and print an access token
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "STOCKROOM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Stock items and levels
    #[command(subcommand)]
    Stock(StockCommand),

    /// Project requirements
    #[command(subcommand)]
    Requirement(RequirementCommand),

    /// Purchase orders
    #[command(subcommand)]
    Po(PoCommand),

    /// Items whose open demand exceeds stock, optionally ordering them
    ToBeOrdered(ToBeOrderedArgs),
}

#[derive(Subcommand)]
enum StockCommand {
    /// List stock levels
    List {
        /// Filter by name, code or description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List catalogue items with their stock status
    Items {
        /// Filter by name, code or description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Export the catalogue as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        out: Option<PathBuf>,
    },

    /// Import stock items from CSV
    Import {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum RequirementCommand {
    /// Evaluate a requirement against current stock
    Check { id: RequirementId },

    /// Issue a requirement, or a single item of it
    Issue {
        id: RequirementId,

        #[arg(long)]
        item: Option<ItemId>,
    },
}

#[derive(Subcommand)]
enum PoCommand {
    /// Show a purchase order
    Show { id: PurchaseOrderId },

    /// Receive goods against a purchase order
    Receive(ReceiveArgs),
}

#[derive(Args)]
struct ReceiveArgs {
    id: PurchaseOrderId,

    /// Quantity to receive now, as ITEM=QTY (repeatable)
    #[arg(long = "item", value_parser = args::parse_item_quantity, conflicts_with = "all")]
    items: Vec<(ItemId, i64)>,

    /// Receive everything still outstanding
    #[arg(long)]
    all: bool,

    /// Invoice as NUMBER:AMOUNT (repeatable)
    #[arg(long = "invoice", value_parser = args::parse_invoice)]
    invoices: Vec<(String, Decimal)>,

    /// Invoice date (defaults to now)
    #[arg(long, value_parser = args::parse_date)]
    invoice_date: Option<DateTime<Utc>>,
}

#[derive(Args)]
struct ToBeOrderedArgs {
    /// Raise a purchase order for these items (repeatable)
    #[arg(long = "order", requires_all = ["supplier", "due"])]
    order: Vec<ItemId>,

    #[arg(long)]
    supplier: Option<String>,

    /// Expected delivery date
    #[arg(long, value_parser = args::parse_date)]
    due: Option<DateTime<Utc>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    stockroom_observability::init();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(token) = cli.token {
        config = config.with_token(token);
    }
    if let Some(role) = cli.role {
        config = config.with_role(role);
    }
    let role = config.role;
    tracing::debug!(api_url = %config.api_url, authenticated = config.token.is_some(), "client configured");
    let service = HttpInventoryService::new(config).context("building HTTP client")?;
    let out = Output { json: cli.json };

    match cli.command {
        Commands::Login { username, password } => {
            let login = service
                .login(&username, &password)
                .await
                .context("signing in")?;
            if out.json {
                return out.emit(&login, String::new);
            }
            let role = login.user.role;
            let pages: Vec<&str> = navigation(role).iter().map(|p| p.label()).collect();
            println!("Signed in as {} ({role})", login.user.username);
            println!("Start page: {}", landing_page(role).path());
            println!("Pages: {}", pages.join(", "));
            println!("export STOCKROOM_AUTH_TOKEN={}", login.access_token);
            println!("export STOCKROOM_ROLE={role}");
            Ok(())
        }

        Commands::Stock(StockCommand::List { search }) => {
            let mut levels = service.list_stock().await.context("listing stock")?;
            if let Some(q) = search.as_deref() {
                levels.retain(|l| matches_query(&l.item, q));
            }
            out.emit(&levels, || render::stock_levels(&levels))
        }

        Commands::Stock(StockCommand::Items { search }) => {
            let mut items = service.list_items().await.context("listing items")?;
            if let Some(q) = search.as_deref() {
                items.retain(|item| matches_query(item, q));
            }
            out.emit(&items, || render::items(&items))
        }

        Commands::Stock(StockCommand::Export { out: path }) => {
            let csv = workflow::export_stock_csv(&service)
                .await
                .context("exporting stock")?;
            match path {
                Some(path) => std::fs::write(&path, csv)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{csv}"),
            }
            Ok(())
        }

        Commands::Stock(StockCommand::Import { file }) => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let report = workflow::import_stock_csv(&service, role, &text)
                .await
                .context("importing stock")?;
            print!("{}", render::import_report(&report));
            if report.failed > 0 {
                bail!("{} row(s) failed to import", report.failed);
            }
            Ok(())
        }

        Commands::Requirement(RequirementCommand::Check { id }) => {
            let check = workflow::check_requirement(&service, id)
                .await
                .with_context(|| format!("checking requirement {id}"))?;
            out.emit(&check.report, || render::requirement_check(&check))
        }

        Commands::Requirement(RequirementCommand::Issue { id, item }) => {
            let updated = match item {
                Some(item_id) => workflow::issue_item(&service, role, id, item_id).await,
                None => workflow::issue_requirement(&service, role, id).await,
            }
            .with_context(|| format!("issuing requirement {id}"))?;
            out.emit(&updated, || {
                format!("Requirement {} is {}\n", updated.id, updated.status.as_str())
            })
        }

        Commands::Po(PoCommand::Show { id }) => {
            let po = service
                .fetch_purchase_order(id)
                .await
                .with_context(|| format!("fetching purchase order {id}"))?;
            out.emit(&po, || render::purchase_order(&po))
        }

        Commands::Po(PoCommand::Receive(receive)) => {
            receive_order(&service, role, &out, receive).await
        }

        Commands::ToBeOrdered(args) => {
            if args.order.is_empty() {
                let rows = service.to_be_ordered().await.context("listing shortages")?;
                return out.emit(&rows, || render::shortages(&rows));
            }
            let (Some(supplier), Some(due)) = (args.supplier, args.due) else {
                bail!("--supplier and --due are required with --order");
            };
            let po = workflow::order_shortages(&service, role, &args.order, &supplier, due)
                .await
                .context("raising purchase order")?;
            out.emit(&po, || render::purchase_order(&po))
        }
    }
}

async fn receive_order(
    service: &HttpInventoryService,
    role: Option<Role>,
    out: &Output,
    args: ReceiveArgs,
) -> Result<()> {
    let invoice_date = args.invoice_date.unwrap_or_else(Utc::now);
    let invoices: Vec<InvoiceDraft> = args
        .invoices
        .into_iter()
        .map(|(number, amount)| InvoiceDraft::new(number, invoice_date, amount))
        .collect();

    let result = if args.all {
        workflow::receive_full(service, role, args.id, invoices).await
    } else {
        let requested = args::requested_quantities(args.items).map_err(anyhow::Error::msg)?;
        workflow::receive_partial(service, role, args.id, &requested, invoices).await
    };

    match result {
        Ok(po) => out.emit(&po, || render::purchase_order(&po)),
        Err(ServiceError::ReceiptBlocked(plan)) => {
            out.emit(&plan, || render::receipt_plan(&plan))?;
            bail!("receipt for purchase order {} was not applied", args.id)
        }
        Err(err) => Err(err).with_context(|| format!("receiving purchase order {}", args.id)),
    }
}

struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }
}
