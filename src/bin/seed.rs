//! Seed script for development -- populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires the `DATABASE_URL` environment variable (reads .env).

use cdn_ops::services::{deliveryservice_request, regex};
use serde_json::json;
use sqlx::PgPool;

const HOST_REGEXP_TYPE: &str = "HOST_REGEXP";

const SAMPLE_PATTERNS: &[&str] = &[r".*\.demo1\..*", r".*\.images\..*", r"^/live/.*\.m3u8$"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL")?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== CDN control-plane seed script ===");

    let type_id = seed_regex_type(&pool).await?;
    seed_regexes(&pool, type_id).await?;
    seed_delivery_service_request(&pool, type_id).await?;

    println!("\n=== Seed complete! ===");
    Ok(())
}

async fn seed_regex_type(pool: &PgPool) -> anyhow::Result<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO type (name, description, use_in_table)
         VALUES ($1, 'Host header regular expression', 'regex')
         ON CONFLICT (name) DO UPDATE SET description = EXCLUDED.description
         RETURNING id",
    )
    .bind(HOST_REGEXP_TYPE)
    .fetch_one(pool)
    .await?;

    println!("[done] Regex type {HOST_REGEXP_TYPE} has id {id}");
    Ok(id)
}

async fn seed_regexes(pool: &PgPool, type_id: i64) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM regex")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] {count} regexes already present");
        return Ok(());
    }

    for pattern in SAMPLE_PATTERNS {
        let payload = serde_json::to_vec(&json!({ "pattern": pattern, "type": type_id }))?;
        regex::create(pool, &payload).await?;
    }

    println!("[done] Created {} regexes", SAMPLE_PATTERNS.len());
    Ok(())
}

async fn seed_delivery_service_request(pool: &PgPool, type_id: i64) -> anyhow::Result<()> {
    let payload = serde_json::to_vec(&json!({
        "changeType": "create",
        "status": "draft",
        "deliveryService": {
            "xmlId": "demo1",
            "displayName": "Demo delivery service",
            "active": false,
            "cdnId": 1,
            "dscp": 0,
            "geoLimit": 0,
            "geoProvider": 0,
            "logsEnabled": true,
            "regionalGeoBlocking": false,
            "typeId": type_id
        }
    }))?;

    let request = deliveryservice_request::create(pool, &payload).await?;
    println!("[done] Created draft delivery service request {}", request.id());
    Ok(())
}
