//! Assignment Distributor
//!
//! Splits the unassigned sales into consecutive chunks of
//! `ceil(n / k)` and hands chunk `i` to the `i`-th salesman, in the order
//! the salesmen were given. Already assigned sales are never moved.

use std::collections::HashSet;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{AssignSalesmenRequest, AssignmentReport, Salesman, SalesmanAssignment};
use sqlx::SqlitePool;

use crate::db::repository::{sale, salesman};
use crate::utils::validation::validate_payload;

pub const NOTHING_TO_ASSIGN: &str = "No unassigned customers found";
pub const ASSIGNED: &str = "Customers assigned to salesmen successfully";

/// `ceil(n / k)`, zero when there is nobody to assign to
pub fn chunk_size(n: usize, k: usize) -> usize {
    if k == 0 { 0 } else { n.div_ceil(k) }
}

/// Order-preserving near-even partition of `items` into `k` slices
///
/// Slice `i` covers `[i * chunk, min((i + 1) * chunk, n))`; trailing slices
/// may be shorter or empty.
pub fn partition<T>(items: &[T], k: usize) -> Vec<&[T]> {
    let n = items.len();
    let size = chunk_size(n, k);
    (0..k)
        .map(|i| {
            let start = (i * size).min(n);
            let end = ((i + 1) * size).min(n);
            &items[start..end]
        })
        .collect()
}

/// Distribute every unassigned sale across the requested salesmen
///
/// All writes happen in one transaction. An empty unassigned set is not an
/// error: the report simply carries no assignments.
pub async fn assign_salesmen(
    pool: &SqlitePool,
    request: &AssignSalesmenRequest,
) -> AppResult<AssignmentReport> {
    validate_payload(request)?;

    let ids = &request.salesman_ids;
    let mut seen = HashSet::with_capacity(ids.len());
    if let Some(dup) = ids.iter().find(|id| !seen.insert(**id)) {
        return Err(AppError::field_errors([(
            "salesman_ids",
            format!("salesman {dup} is listed more than once"),
        )]));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    // 写锁 + 存在性校验
    let matched = salesman::touch_many(&mut *tx, ids).await?;
    let mut salesmen: Vec<Salesman> = Vec::with_capacity(ids.len());
    for id in ids {
        match salesman::find_by_id(&mut *tx, *id).await? {
            Some(s) => salesmen.push(s),
            None => {
                return Err(AppError::new(ErrorCode::SalesmanNotFound).with_detail("id", *id));
            }
        }
    }
    debug_assert_eq!(matched as usize, salesmen.len());

    let unassigned = sale::find_unassigned(&mut *tx).await?;
    if unassigned.is_empty() {
        tracing::info!("Salesman assignment skipped: nothing unassigned");
        return Ok(AssignmentReport {
            message: NOTHING_TO_ASSIGN.to_string(),
            assignments: Vec::new(),
        });
    }

    let chunks = partition(&unassigned, salesmen.len());
    let mut assignments = Vec::with_capacity(salesmen.len());
    for (person, chunk) in salesmen.into_iter().zip(chunks) {
        let mut count = 0;
        for row in chunk {
            if sale::assign_salesman(&mut *tx, row.id, person.id).await? {
                count += 1;
            }
        }
        tracing::debug!(salesman_id = person.id, count, "Sales assigned");
        assignments.push(SalesmanAssignment {
            salesman: person,
            customer_count: count,
        });
    }

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(
        sales = unassigned.len(),
        salesmen = assignments.len(),
        "Unassigned sales distributed"
    );

    Ok(AssignmentReport {
        message: ASSIGNED.to_string(),
        assignments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{customer, product};
    use crate::ledger::SaleQuote;
    use shared::models::{CustomerInput, PricingMode, ProductCreate, SaleStatus, SalesmanCreate};

    #[test]
    fn test_partition_ten_over_three() {
        let sales: Vec<u32> = (0..10).collect();
        assert_eq!(chunk_size(10, 3), 4);
        let parts = partition(&sales, 3);
        assert_eq!(parts[0], &[0, 1, 2, 3]);
        assert_eq!(parts[1], &[4, 5, 6, 7]);
        assert_eq!(parts[2], &[8, 9]);
        assert_eq!(parts.iter().map(|p| p.len()).sum::<usize>(), 10);
    }

    #[test]
    fn test_partition_trailing_salesman_gets_nothing() {
        // chunk = ceil(4 / 3) = 2 -> 2, 2, 0
        let parts = partition(&[1, 2, 3, 4], 3);
        let sizes: Vec<usize> = parts.iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![2, 2, 0]);
    }

    #[test]
    fn test_partition_edge_cases() {
        let empty: [u8; 0] = [];
        assert!(partition(&empty, 2).iter().all(|p| p.is_empty()));
        assert!(partition(&[1, 2], 0).is_empty());
        assert_eq!(partition(&[1, 2, 3], 5).len(), 5);
        assert_eq!(chunk_size(3, 5), 1);
    }

    async fn setup(sales: usize) -> SqlitePool {
        let db = DbService::open_in_memory().await.unwrap();
        let pool = db.pool;
        let p = product::create(
            &pool,
            &ProductCreate {
                name: "Motorcycle".into(),
                price: 100.0,
            },
        )
        .await
        .unwrap();
        let quote = SaleQuote {
            mode: PricingMode::FlatProfit,
            price: 100.0,
            profit: 0.0,
            interest_rate: None,
            total: 100.0,
            down_payment: 0.0,
            monthly_installment: 10.0,
            duration: 10,
            status: SaleStatus::Active,
        };
        for i in 0..sales {
            let c = customer::upsert(
                &pool,
                &CustomerInput {
                    name: format!("Customer {i}"),
                    address: None,
                    phone: "0300-0000000".into(),
                    cnic: format!("35202-{i:07}-1"),
                },
                None,
            )
            .await
            .unwrap();
            sale::create(&pool, p.id, c.id, &quote).await.unwrap();
        }
        pool
    }

    async fn add_salesman(pool: &SqlitePool, name: &str) -> i64 {
        salesman::create(
            pool,
            &SalesmanCreate {
                name: name.into(),
                email: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_assign_distributes_in_given_order() {
        let pool = setup(10).await;
        let a = add_salesman(&pool, "Zafar").await;
        let b = add_salesman(&pool, "Asif").await;
        let c = add_salesman(&pool, "Kamran").await;

        let report = assign_salesmen(
            &pool,
            &AssignSalesmenRequest {
                salesman_ids: vec![c, a, b],
            },
        )
        .await
        .unwrap();
        assert_eq!(report.message, ASSIGNED);
        let counts: Vec<(i64, usize)> = report
            .assignments
            .iter()
            .map(|x| (x.salesman.id, x.customer_count))
            .collect();
        assert_eq!(counts, vec![(c, 4), (a, 4), (b, 2)]);

        assert!(sale::find_unassigned(&pool).await.unwrap().is_empty());
        assert_eq!(sale::find_by_salesman(&pool, c).await.unwrap().len(), 4);
        assert_eq!(sale::find_by_salesman(&pool, b).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_assign_with_nothing_unassigned() {
        let pool = setup(0).await;
        let a = add_salesman(&pool, "Zafar").await;
        let report = assign_salesmen(
            &pool,
            &AssignSalesmenRequest {
                salesman_ids: vec![a],
            },
        )
        .await
        .unwrap();
        assert_eq!(report.message, NOTHING_TO_ASSIGN);
        assert!(report.assignments.is_empty());
    }

    #[tokio::test]
    async fn test_assign_never_moves_assigned_sales() {
        let pool = setup(3).await;
        let a = add_salesman(&pool, "Zafar").await;
        let b = add_salesman(&pool, "Asif").await;
        assign_salesmen(
            &pool,
            &AssignSalesmenRequest {
                salesman_ids: vec![a],
            },
        )
        .await
        .unwrap();

        let report = assign_salesmen(
            &pool,
            &AssignSalesmenRequest {
                salesman_ids: vec![b],
            },
        )
        .await
        .unwrap();
        assert!(report.assignments.is_empty());
        assert_eq!(sale::find_by_salesman(&pool, a).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_assign_rejects_bad_requests() {
        let pool = setup(2).await;
        let a = add_salesman(&pool, "Zafar").await;

        let err = assign_salesmen(
            &pool,
            &AssignSalesmenRequest {
                salesman_ids: vec![],
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = assign_salesmen(
            &pool,
            &AssignSalesmenRequest {
                salesman_ids: vec![a, 999],
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::SalesmanNotFound);
        // nothing was assigned
        assert_eq!(sale::find_unassigned(&pool).await.unwrap().len(), 2);

        let err = assign_salesmen(
            &pool,
            &AssignSalesmenRequest {
                salesman_ids: vec![a, a],
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
