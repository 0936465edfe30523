//! # Demo Data Seeder
//!
//! Fills a database with a small shop's worth of records for development.
//!
//! ## Usage
//! ```bash
//! # Seed the configured database
//! cargo run -p tally-db --bin seed
//!
//! # Specify database path
//! cargo run -p tally-db --bin seed -- --db ./data/tally_dev.db
//! ```
//!
//! ## Generated Records
//! - Five products across the three categories
//! - A cash sale, a card sale and an installment sale with one payment
//! - A restocking purchase paid by transfer
//! - A loan with a partial repayment
//! - An opening cash adjustment
//! - An active reinvestment goal for the current month

use chrono::{Datelike, Duration, Local, NaiveDate};
use std::env;
use tally_core::cash::NewMovement;
use tally_core::goal::NewGoal;
use tally_core::inventory::NewProduct;
use tally_core::loan::NewLoan;
use tally_core::payment::PaymentInput;
use tally_core::purchase::{NewPurchase, PurchaseLine};
use tally_core::sale::{NewSale, SaleLine};
use tally_core::{Category, Money, MovementType, PaymentMethod};
use tally_db::{AppConfig, Database, LedgerSession};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// (name, category, cost, price, stock)
const PRODUCTS: &[(&str, Category, i64, i64, i64)] = &[
    ("Denim jacket", Category::Clothing, 8_000, 15_000, 6),
    ("Cotton t-shirt", Category::Clothing, 1_500, 3_900, 20),
    ("Wireless earbuds", Category::Electronics, 6_500, 12_900, 4),
    ("Phone case", Category::Electronics, 1_000, 3_500, 15),
    ("Scented candle", Category::Misc, 900, 2_500, 2),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tally=debug,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config = AppConfig::load_or_default(None);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database.path = Some(args[i + 1].clone().into());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tally Demo Data Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: platform data dir)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let db_path = config.database_path();
    println!("Tally Demo Data Seeder");
    println!("======================");
    println!("Database: {}", db_path.display());
    println!();

    if let Some(dir) = db_path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let db = Database::new(config.db_config()).await?;
    let mut session = LedgerSession::open(db, config.ledger.clone()).await?;

    if !session.state().products().is_empty() {
        println!(
            "Database already has {} products; skipping seed.",
            session.state().products().len()
        );
        println!("Delete the database file to regenerate.");
        return Ok(());
    }

    let today = Local::now().date_naive();
    let month_start = today.with_day(1).unwrap_or(today);
    seed(&mut session, today, month_start).await?;
    info!("Seed complete");

    let state = session.state();
    let dashboard = state.dashboard(today);
    let symbol = &state.config().currency_symbol;
    println!();
    println!("Dashboard for {}", dashboard.today);
    println!(
        "  Sales this month:  {} {} ({} sales)",
        symbol,
        Money::from_cents(dashboard.month_sales.revenue_cents),
        dashboard.month_sales.sale_count
    );
    println!(
        "  Profit:            {} {} ({:.1}% margin)",
        symbol,
        Money::from_cents(dashboard.profit.total_profit_cents),
        dashboard.profit.margin_percent
    );
    println!(
        "  Cash:              {} {} electronic, {} {} physical",
        symbol,
        Money::from_cents(dashboard.cash.electronic_cents),
        symbol,
        Money::from_cents(dashboard.cash.physical_cash_cents)
    );
    println!(
        "  Loans pending:     {} {}",
        symbol,
        Money::from_cents(dashboard.profit.total_pending_cents)
    );
    println!("  Low stock:         {} products", dashboard.low_stock_count);
    for product in &dashboard.top_products {
        println!(
            "  Top seller:        {} x{} ({} {} profit)",
            product.product_name,
            product.quantity,
            symbol,
            Money::from_cents(product.profit_cents)
        );
    }
    if let Some(progress) = state.active_goal_progress() {
        println!(
            "  Reinvestment goal: {:.1}% realized",
            progress.percent_realized
        );
    }

    Ok(())
}

async fn seed(
    session: &mut LedgerSession,
    today: NaiveDate,
    month_start: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ids = Vec::with_capacity(PRODUCTS.len());
    for (name, category, cost, price, stock) in PRODUCTS {
        let product = session
            .add_product(NewProduct {
                name: name.to_string(),
                description: None,
                category: *category,
                cost_cents: *cost,
                price_cents: *price,
                quantity: *stock,
                supplier: Some("Central Wholesale".into()),
                acquired_on: month_start,
                notes: None,
            })
            .await?;
        ids.push(product.id);
    }
    println!("✓ Added {} products", ids.len());

    session
        .record_movement(NewMovement {
            movement_type: MovementType::AdjustmentInCash,
            description: "Opening float".into(),
            amount_cents: 20_000,
            date: month_start,
            sale_id: None,
            notes: None,
        })
        .await?;

    let cash_sale = session
        .create_sale(NewSale {
            items: vec![SaleLine::new(&ids[1], 2), SaleLine::new(&ids[3], 1)],
            customer_name: "Ana Souza".into(),
            customer_contact: Some("555-0101".into()),
            sale_date: today,
            payment_method: PaymentMethod::Cash,
            installment_count: 1,
            notes: None,
        })
        .await?;
    session
        .record_movement(NewMovement {
            movement_type: MovementType::SaleProceedsCash,
            description: format!("Sale {}", cash_sale.receipt_number),
            amount_cents: cash_sale.total_cents,
            date: today,
            sale_id: Some(cash_sale.id.clone()),
            notes: None,
        })
        .await?;

    session
        .create_sale(NewSale {
            items: vec![SaleLine::new(&ids[2], 1)],
            customer_name: "Bruno Lima".into(),
            customer_contact: None,
            sale_date: today,
            payment_method: PaymentMethod::Card,
            installment_count: 1,
            notes: None,
        })
        .await?;

    let installment_date = today - Duration::days(40);
    let installment_sale = session
        .create_sale(NewSale {
            items: vec![SaleLine::new(&ids[0], 1)],
            customer_name: "Carla Dias".into(),
            customer_contact: Some("555-0199".into()),
            sale_date: installment_date,
            payment_method: PaymentMethod::Installment,
            installment_count: 3,
            notes: Some("Pays on the 5th".into()),
        })
        .await?;
    session
        .pay_next_installment(&installment_sale.id, installment_date + Duration::days(30))
        .await?;
    println!("✓ Recorded 3 sales");

    session
        .create_purchase(NewPurchase {
            supplier: "Central Wholesale".into(),
            items: vec![
                PurchaseLine {
                    product_id: Some(ids[4].clone()),
                    product_name: None,
                    quantity: 10,
                    unit_cost_cents: 900,
                },
                PurchaseLine {
                    product_id: None,
                    product_name: Some("Gift bags".into()),
                    quantity: 50,
                    unit_cost_cents: 40,
                },
            ],
            purchase_date: today,
            payment_method: PaymentMethod::InstantTransfer,
            notes: None,
        })
        .await?;
    println!("✓ Recorded 1 purchase");

    let loan = session
        .create_loan(NewLoan {
            customer_name: "Diego Alves".into(),
            requested_cents: 30_000,
            loan_date: month_start,
            due_date: month_start + Duration::days(60),
            notes: None,
        })
        .await?;
    session
        .register_loan_payment(&loan.id, PaymentInput::new(10_000, today))
        .await?;
    println!("✓ Recorded 1 loan");

    session
        .create_goal(NewGoal {
            target_bps: 3_000,
            starts_on: month_start,
            ends_on: month_start + Duration::days(30),
            active: true,
            notes: None,
        })
        .await?;
    println!("✓ Created reinvestment goal");

    Ok(())
}
