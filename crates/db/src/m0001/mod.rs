mod checkout;
mod services;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "car-doctor",
    "m0001",
    vec_box![],
    vec_box![
        services::CreateTable,
        services::CreateIdx1,
        checkout::CreateTable,
        checkout::CreateIdx1
    ]
);
