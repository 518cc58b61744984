use car_doctor_db::table::Checkout;
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde_json::Value;
use ulid::Ulid;

use super::{Document, DocumentRow, DeleteResult, InsertOneResult, UpdateResult, without_id};
use crate::access_control::OwnerScope;

const UPDATED_FIELD: &str = "isUpdated";

fn email_of(doc: &Document) -> Option<String> {
    doc.get("email").and_then(Value::as_str).map(str::to_owned)
}

pub async fn find_checkouts(
    pool: &sqlx::SqlitePool,
    scope: &OwnerScope,
) -> anyhow::Result<Vec<Document>> {
    let mut statment = Query::select()
        .columns([Checkout::Id, Checkout::Doc])
        .from(Checkout::Table)
        .order_by(Checkout::Id, Order::Asc)
        .to_owned();

    if let OwnerScope::Owner(email) = scope {
        statment.and_where(Expr::col(Checkout::Email).eq(email.as_str()));
    }

    let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, DocumentRow, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(DocumentRow::into_document).collect()
}

async fn find_checkout_by_id(
    conn: &mut sqlx::SqliteConnection,
    id: &str,
) -> anyhow::Result<Option<Document>> {
    let statment = Query::select()
        .columns([Checkout::Id, Checkout::Doc])
        .from(Checkout::Table)
        .and_where(Expr::col(Checkout::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, DocumentRow, _>(&sql, values)
        .fetch_optional(&mut *conn)
        .await?;

    row.map(DocumentRow::into_document).transpose()
}

async fn insert_with_id(
    conn: &mut sqlx::SqliteConnection,
    id: &str,
    doc: &Document,
) -> anyhow::Result<()> {
    let statment = Query::insert()
        .into_table(Checkout::Table)
        .columns([Checkout::Id, Checkout::Email, Checkout::Doc])
        .values_panic([
            id.into(),
            email_of(doc).into(),
            serde_json::to_string(doc)?.into(),
        ])
        .to_owned();

    let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    Ok(())
}

pub async fn insert_checkout(
    pool: &sqlx::SqlitePool,
    doc: Document,
) -> anyhow::Result<InsertOneResult> {
    let doc = without_id(doc);
    let id = Ulid::new().to_string();

    let mut conn = pool.acquire().await?;
    insert_with_id(&mut conn, &id, &doc).await?;

    tracing::info!(id = %id, email = email_of(&doc).as_deref().unwrap_or("<none>"), "Checkout inserted");

    Ok(InsertOneResult {
        acknowledged: true,
        inserted_id: id,
    })
}

pub async fn delete_checkout(pool: &sqlx::SqlitePool, id: &str) -> anyhow::Result<DeleteResult> {
    let statment = Query::delete()
        .from_table(Checkout::Table)
        .and_where(Expr::col(Checkout::Id).eq(id))
        .to_owned();

    let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(DeleteResult {
        acknowledged: true,
        deleted_count: result.rows_affected(),
    })
}

/// Set `isUpdated` on a booking, creating `{_id, isUpdated}` when the id is unknown
///
/// Runs under `BEGIN IMMEDIATE` so concurrent calls for the same unknown id
/// serialize on the write lock instead of racing to insert it.
pub async fn set_checkout_updated(
    pool: &sqlx::SqlitePool,
    id: &str,
    value: Value,
) -> anyhow::Result<UpdateResult> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let Some(mut doc) = find_checkout_by_id(&mut tx, id).await? else {
        let mut doc = Document::new();
        doc.insert(UPDATED_FIELD.to_owned(), value);
        insert_with_id(&mut tx, id, &doc).await?;
        tx.commit().await?;

        tracing::info!(id = %id, "Checkout upserted");

        return Ok(UpdateResult {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id.to_owned()),
        });
    };

    if doc.get(UPDATED_FIELD) == Some(&value) {
        tx.commit().await?;

        return Ok(UpdateResult {
            acknowledged: true,
            matched_count: 1,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        });
    }

    doc.insert(UPDATED_FIELD.to_owned(), value);
    let doc = without_id(doc);

    let statment = Query::update()
        .table(Checkout::Table)
        .values([(Checkout::Doc, serde_json::to_string(&doc)?.into())])
        .and_where(Expr::col(Checkout::Id).eq(id))
        .to_owned();

    let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;
    tx.commit().await?;

    Ok(UpdateResult {
        acknowledged: true,
        matched_count: 1,
        modified_count: result.rows_affected(),
        upserted_count: 0,
        upserted_id: None,
    })
}
