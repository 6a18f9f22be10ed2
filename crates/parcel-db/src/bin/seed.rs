//! # Seed Data Generator
//!
//! Populates the database with users, a product catalog and orders for
//! development.
//!
//! ## Usage
//! ```bash
//! # Defaults: 20 users, 200 products, 2000 orders
//! cargo run -p parcel-db --bin seed
//!
//! # Custom amounts
//! cargo run -p parcel-db --bin seed -- --users 5 --products 50 --orders 300
//!
//! # Specify database path
//! cargo run -p parcel-db --bin seed -- --db ./data/parcel.db
//! ```
//!
//! ## Generated Data
//! - Users `user_0001`, `user_0002`, ...
//! - Products: base item × variant, value 5.00 - 84.99, weight 50g - 5kg
//! - Orders spread round-robin over users and products; roughly a third
//!   are moved on to `delivering` and a fifth to `arrived`, the rest stay
//!   in `shipping` for the robot dispatcher.
//!
//! Everything is written in one transaction, so an interrupted run leaves
//! the database untouched.

use std::env;

use parcel_core::ShippedStatus;
use parcel_db::query::SqlQuery;
use parcel_db::{Database, DbConfig, Dbtx, OrderRepository};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Base items with a short description.
const ITEMS: &[(&str, &str)] = &[
    ("Green Tea", "Loose leaf green tea"),
    ("Black Tea", "Strong breakfast blend"),
    ("Coffee Beans", "Medium roast, whole bean"),
    ("Tea Kettle", "Stainless steel, whistles when ready"),
    ("French Press", "Borosilicate glass"),
    ("Ceramic Mug", "Dishwasher safe"),
    ("Robot Vacuum", "Maps the room, returns to dock"),
    ("Desk Lamp", "Warm white LED"),
    ("Notebook", "Dotted pages, lay-flat binding"),
    ("Fountain Pen", "Fine nib, converter included"),
    ("Backpack", "Water resistant, laptop sleeve"),
    ("Water Bottle", "Keeps drinks cold for a day"),
    ("Cast Iron Pan", "Pre-seasoned"),
    ("Cutting Board", "End-grain walnut"),
    ("Chef Knife", "20cm, high carbon steel"),
    ("Headphones", "Closed back, wired"),
    ("USB Cable", "Braided, 2m"),
    ("Phone Stand", "Aluminium, adjustable angle"),
    ("Plant Pot", "Terracotta with saucer"),
    ("Yoga Mat", "Non-slip, 6mm"),
];

/// Variant suffix and weight multiplier (percent).
const VARIANTS: &[(&str, i64)] = &[
    ("Mini", 50),
    ("Classic", 100),
    ("Large", 180),
    ("Travel", 70),
    ("Gift Set", 250),
];

#[derive(Debug)]
struct SeedOptions {
    db_path: String,
    users: usize,
    products: usize,
    orders: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let Some(opts) = parse_args() else {
        return Ok(());
    };

    println!("🌱 Parcel Seed Data Generator");
    println!("=============================");
    println!("Database: {}", opts.db_path);
    println!("Users:    {}", opts.users);
    println!("Products: {}", opts.products);
    println!("Orders:   {}", opts.orders);
    println!();

    let db = Database::new(DbConfig::from_env(&opts.db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let tx = db.begin().await?;

    let mut user_ids = Vec::with_capacity(opts.users);
    for n in 1..=opts.users {
        let query = SqlQuery::new("INSERT INTO users (user_name) VALUES (?)")
            .bind(format!("user_{n:04}"));
        user_ids.push(tx.exec(&tx.rebind(query)).await?.last_insert_id);
    }
    println!("✓ Inserted {} users", user_ids.len());

    let mut product_ids = Vec::with_capacity(opts.products);
    for seed in 0..opts.products {
        let query = product_insert(seed);
        product_ids.push(tx.exec(&tx.rebind(query)).await?.last_insert_id);
    }
    println!("✓ Inserted {} products", product_ids.len());

    let mut delivering = Vec::new();
    let mut arrived = Vec::new();
    if !user_ids.is_empty() && !product_ids.is_empty() {
        let orders = OrderRepository::new(&tx);
        for n in 0..opts.orders {
            let user_id = user_ids[n % user_ids.len()];
            let product_id = product_ids[(n * 7) % product_ids.len()];
            let order_id: i64 = orders.create(user_id, product_id).await?.parse()?;

            match n % 15 {
                0 | 3 | 5 | 9 | 10 => delivering.push(order_id),
                6 | 12 | 14 => arrived.push(order_id),
                _ => {}
            }

            if (n + 1) % 500 == 0 {
                println!("  Created {} orders...", n + 1);
            }
        }

        orders
            .update_statuses(&delivering, ShippedStatus::Delivering.as_str())
            .await?;
        orders
            .update_statuses(&arrived, ShippedStatus::Arrived.as_str())
            .await?;
    } else if opts.orders > 0 {
        println!("⚠ No users or products, skipping orders");
    }

    tx.commit().await?;

    let elapsed = start.elapsed();
    info!(elapsed_ms = elapsed.as_millis() as u64, "Seed committed");

    let shipping = db.orders().get_shipping_orders().await?;
    println!();
    println!("✓ Seed complete in {:?}", elapsed);
    println!("  shipping:   {}", shipping.len());
    println!("  delivering: {}", delivering.len());
    println!("  arrived:    {}", arrived.len());

    Ok(())
}

/// `RUST_LOG` wins; otherwise info, with debug for this crate.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,parcel_db=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Parses command line flags; `None` when only help was requested.
fn parse_args() -> Option<SeedOptions> {
    let args: Vec<String> = env::args().collect();

    let mut opts = SeedOptions {
        db_path: String::from("./parcel_dev.db"),
        users: 20,
        products: 200,
        orders: 2000,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--db" | "-d" => {
                if let Some(v) = value {
                    opts.db_path = v.clone();
                    i += 1;
                }
            }
            "--users" | "-u" => {
                if let Some(v) = value {
                    opts.users = v.parse().unwrap_or(opts.users);
                    i += 1;
                }
            }
            "--products" | "-p" => {
                if let Some(v) = value {
                    opts.products = v.parse().unwrap_or(opts.products);
                    i += 1;
                }
            }
            "--orders" | "-o" => {
                if let Some(v) = value {
                    opts.orders = v.parse().unwrap_or(opts.orders);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Parcel Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>       Database file path (default: ./parcel_dev.db)");
                println!("  -u, --users <N>       Number of users (default: 20)");
                println!("  -p, --products <N>    Number of products (default: 200)");
                println!("  -o, --orders <N>      Number of orders (default: 2000)");
                println!("  -h, --help            Show this help message");
                return None;
            }
            _ => {}
        }
        i += 1;
    }

    Some(opts)
}

/// INSERT for the `seed`-th generated product.
fn product_insert(seed: usize) -> SqlQuery {
    let (item, description) = ITEMS[seed % ITEMS.len()];
    let (variant, weight_pct) = VARIANTS[(seed / ITEMS.len()) % VARIANTS.len()];
    let generation = seed / (ITEMS.len() * VARIANTS.len());

    let name = if generation == 0 {
        format!("{item} {variant}")
    } else {
        format!("{item} {variant} #{}", generation + 1)
    };

    // value 5.00 - 84.99, weight 50g - 5kg, both in minor units
    let value = 500 + ((seed * 37) % 8000) as i64;
    let weight = (100 + ((seed * 53) % 1900) as i64) * weight_pct / 100;
    let image = format!("/images/{}.png", item.to_lowercase().replace(' ', "-"));

    SqlQuery::new(
        "INSERT INTO products (name, value, weight, image, description) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(name)
    .bind(value)
    .bind(weight)
    .bind(image)
    .bind(description)
}
