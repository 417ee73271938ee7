use sqlx::{postgres::PgPoolOptions, sqlite::SqlitePoolOptions, PgPool, SqlitePool};
use std::{env, path::PathBuf};

const TABLES: [&str; 5] = ["listings", "requests", "pickups", "food_requests", "notifications"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Same fallback as the server: a SQLite file in DB_DIR
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            let dir = env::var("DB_DIR").unwrap_or_else(|_| ".".to_string());
            format!("sqlite://{}", PathBuf::from(dir).join("data.db").display())
        }
    };

    if database_url.starts_with("sqlite:") {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await?;
        check_sqlite(&pool).await
    } else {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await?;
        check_postgres(&pool).await
    }
}

async fn check_postgres(pool: &PgPool) -> anyhow::Result<()> {
    let mut present = Vec::new();
    for table in TABLES {
        let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(format!("public.{}", table))
            .fetch_one(pool)
            .await?;
        if exists {
            present.push(table);
        }
    }

    for table in TABLES {
        if !present.contains(&table) {
            print_missing(table);
            continue;
        }
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await?;
        println!("{:<14} {} row(s)", table, count);
    }

    if present.contains(&"notifications") {
        let unread: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE read = 0")
            .fetch_one(pool)
            .await?;
        println!("unread notifications: {}", unread);
    }

    Ok(())
}

async fn check_sqlite(pool: &SqlitePool) -> anyhow::Result<()> {
    let mut present = Vec::new();
    for table in TABLES {
        let matches: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(pool)
        .await?;
        if matches > 0 {
            present.push(table);
        }
    }

    for table in TABLES {
        if !present.contains(&table) {
            print_missing(table);
            continue;
        }
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await?;
        println!("{:<14} {} row(s)", table, count);
    }

    if present.contains(&"notifications") {
        let unread: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE read = 0")
            .fetch_one(pool)
            .await?;
        println!("unread notifications: {}", unread);
    }

    Ok(())
}

fn print_missing(table: &str) {
    println!("{:<14} missing (start the server once to run migrations)", table);
}
