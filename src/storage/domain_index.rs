//! Per-domain metric rows (`domain_index_info`).
//!
//! The table holds one row per apex domain (unique index on `domain`).
//! Enrichment looks up the latest row and updates it in place, inserting only
//! when none exists. The insert itself resolves a concurrent insert of the same
//! domain into an update, so two overlapping enrichments never produce a
//! duplicate; field values are last-writer-wins.

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;

const SELECT_COLUMNS: &str = "id, domain, ext_backlinks, ref_domains, alexa_rank, ip, subnet,
    trust_flow, citation_flow, percentage, topical_trust_flow_topic_0,
    topical_trust_flow_value_0, fetched_at_ms, created_at_ms, updated_at_ms";

/// Normalized metrics for one domain, ready to be stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainMetrics {
    pub domain: String,
    pub ext_backlinks: i64,
    pub ref_domains: i64,
    /// Authority rank as text
    pub alexa_rank: String,
    pub ip: String,
    pub subnet: String,
    pub trust_flow: i64,
    pub citation_flow: i64,
    /// Derived `round(trust_flow / citation_flow * 100)`
    pub percentage: i64,
    pub topic: String,
    pub topic_value: i64,
}

/// A stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainIndexRecord {
    pub id: i64,
    pub metrics: DomainMetrics,
    pub fetched_at_ms: i64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// What [`upsert_domain_index`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpsertOutcome {
    Inserted(i64),
    Updated(i64),
}

impl UpsertOutcome {
    pub fn id(&self) -> i64 {
        match self {
            UpsertOutcome::Inserted(id) | UpsertOutcome::Updated(id) => *id,
        }
    }
}

fn record_from_row(row: &SqliteRow) -> DomainIndexRecord {
    DomainIndexRecord {
        id: row.get("id"),
        metrics: DomainMetrics {
            domain: row.get("domain"),
            ext_backlinks: row.get("ext_backlinks"),
            ref_domains: row.get("ref_domains"),
            alexa_rank: row.get("alexa_rank"),
            ip: row.get("ip"),
            subnet: row.get("subnet"),
            trust_flow: row.get("trust_flow"),
            citation_flow: row.get("citation_flow"),
            percentage: row.get("percentage"),
            topic: row.get("topical_trust_flow_topic_0"),
            topic_value: row.get("topical_trust_flow_value_0"),
        },
        fetched_at_ms: row.get("fetched_at_ms"),
        created_at_ms: row.get("created_at_ms"),
        updated_at_ms: row.get("updated_at_ms"),
    }
}

/// Most recently fetched row for `domain`.
pub async fn find_latest_for_domain(
    pool: &SqlitePool,
    domain: &str,
) -> Result<Option<DomainIndexRecord>, DatabaseError> {
    let row = sqlx::query(&format!(
        "SELECT {SELECT_COLUMNS} FROM domain_index_info
         WHERE domain = ?
         ORDER BY fetched_at_ms DESC, id DESC
         LIMIT 1"
    ))
    .bind(domain)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(record_from_row))
}

/// Overwrites the metrics of row `id` and marks it fetched at `now_ms`.
pub async fn update_domain_index(
    pool: &SqlitePool,
    id: i64,
    metrics: &DomainMetrics,
    now_ms: i64,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "UPDATE domain_index_info SET
            ext_backlinks = ?, ref_domains = ?, alexa_rank = ?, ip = ?, subnet = ?,
            trust_flow = ?, citation_flow = ?, percentage = ?,
            topical_trust_flow_topic_0 = ?, topical_trust_flow_value_0 = ?,
            fetched_at_ms = ?, updated_at_ms = ?, write_count = write_count + 1
         WHERE id = ?",
    )
    .bind(metrics.ext_backlinks)
    .bind(metrics.ref_domains)
    .bind(&metrics.alexa_rank)
    .bind(&metrics.ip)
    .bind(&metrics.subnet)
    .bind(metrics.trust_flow)
    .bind(metrics.citation_flow)
    .bind(metrics.percentage)
    .bind(&metrics.topic)
    .bind(metrics.topic_value)
    .bind(now_ms)
    .bind(now_ms)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Inserts a row for `metrics.domain`.
///
/// If another writer inserted the same domain in the meantime, that row is
/// updated instead and the outcome is [`UpsertOutcome::Updated`].
pub async fn insert_domain_index(
    pool: &SqlitePool,
    metrics: &DomainMetrics,
    now_ms: i64,
) -> Result<UpsertOutcome, DatabaseError> {
    let row = sqlx::query(
        "INSERT INTO domain_index_info (
            domain, ext_backlinks, ref_domains, alexa_rank, ip, subnet,
            trust_flow, citation_flow, percentage,
            topical_trust_flow_topic_0, topical_trust_flow_value_0,
            fetched_at_ms, created_at_ms, updated_at_ms
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(domain) DO UPDATE SET
            ext_backlinks = excluded.ext_backlinks,
            ref_domains = excluded.ref_domains,
            alexa_rank = excluded.alexa_rank,
            ip = excluded.ip,
            subnet = excluded.subnet,
            trust_flow = excluded.trust_flow,
            citation_flow = excluded.citation_flow,
            percentage = excluded.percentage,
            topical_trust_flow_topic_0 = excluded.topical_trust_flow_topic_0,
            topical_trust_flow_value_0 = excluded.topical_trust_flow_value_0,
            fetched_at_ms = excluded.fetched_at_ms,
            updated_at_ms = excluded.updated_at_ms,
            write_count = domain_index_info.write_count + 1
        RETURNING id, write_count",
    )
    .bind(&metrics.domain)
    .bind(metrics.ext_backlinks)
    .bind(metrics.ref_domains)
    .bind(&metrics.alexa_rank)
    .bind(&metrics.ip)
    .bind(&metrics.subnet)
    .bind(metrics.trust_flow)
    .bind(metrics.citation_flow)
    .bind(metrics.percentage)
    .bind(&metrics.topic)
    .bind(metrics.topic_value)
    .bind(now_ms)
    .bind(now_ms)
    .bind(now_ms)
    .fetch_one(pool)
    .await?;

    let id: i64 = row.get("id");
    let write_count: i64 = row.get("write_count");
    if write_count == 1 {
        Ok(UpsertOutcome::Inserted(id))
    } else {
        Ok(UpsertOutcome::Updated(id))
    }
}

/// Updates the latest row for the domain, or inserts one when there is none.
pub async fn upsert_domain_index(
    pool: &SqlitePool,
    metrics: &DomainMetrics,
    now_ms: i64,
) -> Result<UpsertOutcome, DatabaseError> {
    match find_latest_for_domain(pool, &metrics.domain).await? {
        Some(existing) => {
            update_domain_index(pool, existing.id, metrics, now_ms).await?;
            Ok(UpsertOutcome::Updated(existing.id))
        }
        None => insert_domain_index(pool, metrics, now_ms).await,
    }
}

/// Inserts every row whose domain is not stored yet; existing domains are left
/// untouched. Returns the number of rows inserted.
pub async fn insert_many_skip_duplicates(
    pool: &SqlitePool,
    rows: &[DomainMetrics],
    now_ms: i64,
) -> Result<u64, DatabaseError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;
    for metrics in rows {
        let result = sqlx::query(
            "INSERT INTO domain_index_info (
                domain, ext_backlinks, ref_domains, alexa_rank, ip, subnet,
                trust_flow, citation_flow, percentage,
                topical_trust_flow_topic_0, topical_trust_flow_value_0,
                fetched_at_ms, created_at_ms, updated_at_ms
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(domain) DO NOTHING",
        )
        .bind(&metrics.domain)
        .bind(metrics.ext_backlinks)
        .bind(metrics.ref_domains)
        .bind(&metrics.alexa_rank)
        .bind(&metrics.ip)
        .bind(&metrics.subnet)
        .bind(metrics.trust_flow)
        .bind(metrics.citation_flow)
        .bind(metrics.percentage)
        .bind(&metrics.topic)
        .bind(metrics.topic_value)
        .bind(now_ms)
        .bind(now_ms)
        .bind(now_ms)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }
    tx.commit().await?;

    Ok(inserted)
}

/// Stored rows for a domain, most recently fetched first.
pub async fn domain_history(
    pool: &SqlitePool,
    domain: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<DomainIndexRecord>, DatabaseError> {
    let rows = sqlx::query(&format!(
        "SELECT {SELECT_COLUMNS} FROM domain_index_info
         WHERE domain = ?
         ORDER BY fetched_at_ms DESC, id DESC
         LIMIT ? OFFSET ?"
    ))
    .bind(domain)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(record_from_row).collect())
}
