//! End-to-end store behaviour through the public service API.
//!
//! - Opening from config seeds the sample data once
//! - Pagination bounds and disjoint pages
//! - Business metrics and low-stock classification on the sample data
//! - KPI and trend computation over invoices
//! - Backup/restore replacing table contents
//! - Typed mutations feeding the audit log, raw SQL bypassing it

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Map, Value, json};

use dl_config::DatabaseConfig;
use dl_core::entities::NewInvoice;
use dl_core::enums::{AuditAction, InvoiceStatus};
use dl_core::kpi::{daily_trend, get_kpi_metrics};
use dl_core::responses::{BackupDocument, QueryOutcome};
use dl_db::repos::audit::AuditFilter;
use dl_db::repos::metrics::TransactionSource;
use dl_db::repos::query::ExecutionPolicy;
use dl_db::{DataLinkDb, DataLinkService};

async fn sample_service() -> DataLinkService {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
        ..Default::default()
    };
    let db = DataLinkDb::open(&config).await.unwrap();
    DataLinkService::from_db(db, "integration")
}

async fn run(service: &DataLinkService, sql: &str) -> QueryOutcome {
    service
        .execute(sql, None, ExecutionPolicy::UNRESTRICTED)
        .await
        .unwrap()
}

fn record(value: Value) -> Map<String, Value> {
    let Value::Object(map) = value else {
        panic!("expected object");
    };
    map
}

async fn add_paid_invoice(service: &DataLinkService, date: NaiveDate, amount: f64, customer: &str) {
    let invoice = service
        .add_invoice(&NewInvoice {
            invoice_number: None,
            customer_name: customer.to_string(),
            customer_email: None,
            amount,
            invoice_date: date,
            due_date: date,
            description: None,
        })
        .await
        .unwrap();
    service
        .update_invoice_status(&invoice.invoice_number, InvoiceStatus::Paid)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Opening
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reopening_a_file_does_not_duplicate_sample_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");
    let config = DatabaseConfig {
        url: path.to_string_lossy().into_owned(),
        ..Default::default()
    };

    for _ in 0..2 {
        let db = DataLinkDb::open(&config).await.unwrap();
        let service = DataLinkService::from_db(db, "integration");
        let overview = service.database_overview().await.unwrap();
        let customers = overview.iter().find(|t| t.name == "customers").unwrap();
        assert_eq!(customers.row_count, 3);
    }
}

// ---------------------------------------------------------------------------
// Browsing
// ---------------------------------------------------------------------------

#[rstest]
#[case(1, 1)]
#[case(2, 3)]
#[case(5, 1)]
#[case(100, 1)]
#[tokio::test]
async fn pages_are_bounded_and_disjoint(#[case] page_size: u64, #[case] page: u64) {
    let service = sample_service().await;
    let first = service.fetch_page("chart_of_accounts", page_size, page).await.unwrap();
    let second = service
        .fetch_page("chart_of_accounts", page_size, page + 1)
        .await
        .unwrap();

    assert!(first.result.len() as u64 <= page_size);
    assert!(second.result.len() as u64 <= page_size);
    assert_eq!(first.total_rows, 8);
    for row in &second.result.rows {
        assert!(!first.result.rows.contains(row));
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn low_stock_is_inclusive_of_the_reorder_point() {
    let service = sample_service().await;
    run(
        &service,
        "UPDATE inventory SET current_stock = reorder_point WHERE sku = 'PRT-003'",
    )
    .await;

    let skus: Vec<_> = service
        .low_stock_items()
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.sku)
        .collect();
    assert_eq!(skus, vec!["CHR-002", "PRT-003"]);
    assert_eq!(service.compute_business_metrics().await.low_stock_items, 2);
}

#[tokio::test]
async fn broken_metric_does_not_hide_the_others() {
    let service = sample_service().await;
    run(&service, "DROP TABLE projects").await;

    let metrics = service.compute_business_metrics().await;
    assert_eq!(metrics.active_projects, 0);
    assert_eq!(metrics.active_customers, 2);
    assert_eq!(metrics.total_employees, 3);
    assert_eq!(metrics.low_stock_items, 1);
}

#[tokio::test]
async fn kpis_and_trend_from_paid_invoices() {
    let service = sample_service().await;
    let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    add_paid_invoice(&service, day(1), 100.0, "ABC Corp").await;
    add_paid_invoice(&service, day(2), 200.0, "XYZ Ltd").await;
    add_paid_invoice(&service, day(3), 300.0, "ABC Corp").await;

    let transactions = service
        .load_transactions(&TransactionSource::default())
        .await
        .unwrap();
    assert_eq!(transactions.len(), 3);

    let kpis = get_kpi_metrics(&transactions);
    assert_eq!(kpis.total_revenue, 600.0);
    assert_eq!(kpis.total_orders, 3);
    assert_eq!(kpis.active_customers, 2);
    assert_eq!(kpis.avg_order_value, 200.0);

    let trend = daily_trend(&transactions, 2, 3);
    assert_eq!(trend.points.len(), 3);
    assert!(trend.slope > 0.0);
}

// ---------------------------------------------------------------------------
// Backup / restore
// ---------------------------------------------------------------------------

#[tokio::test]
async fn restore_over_five_rows_leaves_one() {
    let service = sample_service().await;
    run(&service, "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)").await;
    run(
        &service,
        "INSERT INTO people (name) VALUES ('a'), ('b'), ('c'), ('d'), ('e')",
    )
    .await;

    let mut document = BackupDocument::new();
    document.insert("people".into(), vec![record(json!({"id": 1, "name": "Ann"}))]);
    let report = service.restore(&document).await;
    assert!(report.any_restored());

    let page = service.fetch_page("people", 10, 1).await.unwrap();
    assert_eq!(page.total_rows, 1);
    assert_eq!(page.result.rows, vec![vec![json!(1), json!("Ann")]]);
}

#[tokio::test]
async fn customer_restore_requires_the_business_code() {
    let service = sample_service().await;
    let mut document = BackupDocument::new();
    document.insert("customers".into(), vec![record(json!({"id": 1, "name": "Ann"}))]);

    let report = service.restore(&document).await;
    assert!(!report.any_restored());
    assert!(report.failed[0].error.contains("NOT NULL"));
    assert_eq!(service.fetch_page("customers", 10, 1).await.unwrap().total_rows, 3);

    document.insert(
        "customers".into(),
        vec![record(json!({"id": 1, "customer_id": "CUST-0001", "name": "Ann"}))],
    );
    let report = service.restore(&document).await;
    assert_eq!(report.restored, vec!["customers"]);
    assert_eq!(service.fetch_page("customers", 10, 1).await.unwrap().total_rows, 1);
}

#[tokio::test]
async fn backup_round_trip_into_a_fresh_store() {
    let source = sample_service().await;
    let tables = ["customers", "chart_of_accounts", "employees"];
    let backup = source.backup(&tables).await;
    assert!(backup.failed.is_empty());

    let target = DataLinkService::new_local(":memory:", "integration").await.unwrap();
    let report = target.restore(&backup.document).await;
    assert_eq!(report.restored.len(), 3);
    assert_eq!(target.backup(&tables).await.document, backup.document);
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn only_typed_mutations_are_audited() {
    let service = sample_service().await;
    run(&service, "UPDATE customers SET notes = 'raw edit'").await;
    add_paid_invoice(&service, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), 50.0, "Raw").await;

    let entries = service.query_audit(&AuditFilter::default()).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.table_name == "invoices"));
    assert_eq!(entries[0].action, AuditAction::Update);
    assert_eq!(entries[1].action, AuditAction::Insert);
    assert!(entries.iter().all(|e| e.changed_by.as_deref() == Some("integration")));
}
