use car_doctor_db::table::Services;
use sea_query::{Expr, ExprTrait, LikeExpr, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde_json::Value;
use ulid::Ulid;

use super::{Document, DocumentRow, ID_FIELD, InsertOneResult, without_id};

/// Fields returned by the single service lookup
const DETAIL_PROJECTION: [&str; 4] = ["title", "price", "service_id", "img"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    /// Only `ascending` sorts ascending; anything else, including no value, is descending
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("ascending") => Self::Ascending,
            _ => Self::Descending,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ServiceFilter {
    pub search: Option<String>,
    pub sort: SortOrder,
}

fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{escaped}%")
}

fn title_of(doc: &Document) -> Option<String> {
    doc.get("title").and_then(Value::as_str).map(str::to_owned)
}

/// Prices show up both as numbers and as numeric strings
fn price_of(doc: &Document) -> Option<f64> {
    match doc.get("price")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub async fn find_services(
    pool: &sqlx::SqlitePool,
    filter: &ServiceFilter,
) -> anyhow::Result<Vec<Document>> {
    let mut statment = Query::select()
        .columns([Services::Id, Services::Doc])
        .from(Services::Table)
        .to_owned();

    if let Some(search) = filter.search.as_deref() {
        statment.and_where(
            Expr::col(Services::Title).like(LikeExpr::new(like_pattern(search)).escape('\\')),
        );
    }

    let order = match filter.sort {
        SortOrder::Ascending => Order::Asc,
        SortOrder::Descending => Order::Desc,
    };
    statment.order_by(Services::Price, order);

    let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, DocumentRow, _>(&sql, values)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(DocumentRow::into_document).collect()
}

pub async fn find_service_by_id(
    pool: &sqlx::SqlitePool,
    id: &str,
) -> anyhow::Result<Option<Document>> {
    let statment = Query::select()
        .columns([Services::Id, Services::Doc])
        .from(Services::Table)
        .and_where(Expr::col(Services::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);
    let Some(row) = sqlx::query_as_with::<_, DocumentRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let doc = row.into_document()?;
    let projected = doc
        .into_iter()
        .filter(|(key, _)| key == ID_FIELD || DETAIL_PROJECTION.contains(&key.as_str()))
        .collect();

    Ok(Some(projected))
}

pub async fn insert_service(
    pool: &sqlx::SqlitePool,
    doc: Document,
) -> anyhow::Result<InsertOneResult> {
    let doc = without_id(doc);
    let id = Ulid::new().to_string();

    let statment = Query::insert()
        .into_table(Services::Table)
        .columns([
            Services::Id,
            Services::Title,
            Services::Price,
            Services::Doc,
        ])
        .values_panic([
            id.to_owned().into(),
            title_of(&doc).into(),
            price_of(&doc).into(),
            serde_json::to_string(&doc)?.into(),
        ])
        .to_owned();

    let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    tracing::info!(id = %id, "Service inserted");

    Ok(InsertOneResult {
        acknowledged: true,
        inserted_id: id,
    })
}
