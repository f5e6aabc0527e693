#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::Database;
use uuid::Uuid;

use engine::{Engine, User};
use migration::MigratorTrait;

pub async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .database(db)
        .password_cost(4)
        .build()
        .await
        .unwrap()
}

/// Engine plus two registered users, `alice` and `bob`.
pub async fn engine_with_users() -> (Engine, User, User) {
    let engine = engine().await;
    let alice = engine
        .register("alice", "alice@example.com", "alice-password")
        .await
        .unwrap();
    let bob = engine
        .register("bob", "bob@example.com", "bob-password")
        .await
        .unwrap();
    (engine, alice, bob)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `dec("12.34")`
pub fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

pub fn missing() -> Uuid {
    Uuid::new_v4()
}
