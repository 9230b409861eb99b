use log::{info, warn};
use crate::server::model::admin::{
    AdminOrder, AdminOrderItem, AdminSessionRequest, AuditTotals, PersonTotal, SessionLockRequest, SessionOrders,
};
use crate::server::model::money::Money;
use crate::server::remote::error::RemoteError;
use crate::server::remote::RemoteStore;

/// Read a session's orders. `admin_token` is forwarded as-is; whether it is
/// valid is for the remote store alone to decide.
pub(crate) async fn load<S: RemoteStore>(
    store: &S,
    session_id: &str,
    admin_token: &str,
) -> Result<SessionOrders, RemoteError> {
    store
        .admin_get_session_orders(&AdminSessionRequest {
            session_id: session_id.to_string(),
            admin_token: admin_token.to_string(),
        })
        .await
}

/// Lock or unlock a session, then reload so the caller sees the new state.
pub(crate) async fn set_lock<S: RemoteStore>(
    store: &S,
    session_id: &str,
    admin_token: &str,
    is_locked: bool,
) -> Result<SessionOrders, RemoteError> {
    store
        .set_session_lock(&SessionLockRequest {
            session_id: session_id.to_string(),
            admin_token: admin_token.to_string(),
            is_locked,
        })
        .await?;
    info!("session {} is_locked={}", session_id, is_locked);
    load(store, session_id, admin_token).await
}

/// `(base * qty) + (sum of option deltas) * qty`
fn item_total(item: &AdminOrderItem) -> Option<Money> {
    let deltas = item
        .options
        .iter()
        .try_fold(Money::ZERO, |acc, o| acc.checked_add(o.price_delta))?;
    item.unit_base_price
        .checked_scale(item.qty)?
        .checked_add(deltas.checked_scale(item.qty)?)
}

fn order_total(order: &AdminOrder) -> Result<Money, RemoteError> {
    order.items.iter().try_fold(Money::ZERO, |acc, item| {
        item_total(item)
            .and_then(|total| acc.checked_add(total))
            .ok_or_else(|| {
                RemoteError::new(format!(
                    "order of {} overflows at item {}, admin payload rejected",
                    order.display_name, item.order_item_id
                ))
            })
    })
}

/// Recompute per-person and grand totals from raw line data, independent of
/// any figure the remote computed. Where the remote did report a total, a
/// mismatch is logged. Amounts too large to add up are a bad payload.
pub(crate) fn recompute_totals(orders: &[AdminOrder]) -> Result<AuditTotals, RemoteError> {
    let per_person = orders
        .iter()
        .map(|order| {
            Ok(PersonTotal {
                display_name: order.display_name.clone(),
                total: order_total(order)?,
                server_total: order.total_cents,
                updated_at: order.updated_at,
            })
        })
        .collect::<Result<Vec<_>, RemoteError>>()?;

    for row in per_person.iter().filter(|row| row.divergent()) {
        warn!(
            "total mismatch for {}: recomputed={} server={}",
            row.display_name,
            row.total,
            row.server_total.unwrap_or_default()
        );
    }

    let grand_total = per_person
        .iter()
        .try_fold(Money::ZERO, |acc, row| acc.checked_add(row.total))
        .ok_or_else(|| RemoteError::new("session grand total overflows, admin payload rejected"))?;

    Ok(AuditTotals { grand_total, per_person })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::admin::{AdminOrderOption, SessionInfo};
    use crate::server::remote::mock::{Call, MockStore};

    fn item(id: &str, base: i64, qty: u32, deltas: &[i64]) -> AdminOrderItem {
        AdminOrderItem {
            order_item_id: id.to_string(),
            title_en: "Dish".to_string(),
            title_zh: "菜".to_string(),
            qty,
            unit_base_price: Money::from_cents(base),
            note: None,
            options: deltas
                .iter()
                .map(|&d| AdminOrderOption {
                    label_en: "Opt".to_string(),
                    label_zh: "选".to_string(),
                    price_delta: Money::from_cents(d),
                })
                .collect(),
        }
    }

    fn order(name: &str, items: Vec<AdminOrderItem>, server_total: Option<i64>) -> AdminOrder {
        AdminOrder {
            display_name: name.to_string(),
            updated_at: None,
            items,
            total_cents: server_total.map(Money::from_cents),
        }
    }

    fn sample_session() -> SessionOrders {
        SessionOrders {
            session: Some(SessionInfo { title: "Lunch".to_string(), is_locked: false }),
            orders: vec![order("Amy", vec![item("oi-1", 1200, 1, &[600, 0])], None)],
        }
    }

    #[test]
    fn grand_total_is_sum_of_people() {
        let orders = vec![
            order("Amy", vec![item("oi-1", 1200, 1, &[600, 0])], None),
            order("Bo", vec![item("oi-2", 1600, 1, &[300]), item("oi-3", 300, 1, &[])], None),
        ];
        let totals = recompute_totals(&orders).unwrap();
        assert_eq!(totals.grand_total, Money::from_cents(4000));
        assert_eq!(totals.per_person.len(), 2);
        assert_eq!(totals.per_person[0].display_name, "Amy");
        assert_eq!(totals.per_person[0].total, Money::from_cents(1800));
        assert_eq!(totals.per_person[1].total, Money::from_cents(2200));
    }

    #[test]
    fn option_deltas_scale_with_quantity() {
        let orders = vec![order("Amy", vec![item("oi-1", 1000, 3, &[200, 50])], None)];
        let totals = recompute_totals(&orders).unwrap();
        assert_eq!(totals.grand_total, Money::from_cents(3000 + 750));
    }

    #[test]
    fn empty_orders_total_zero() {
        let totals = recompute_totals(&[order("Amy", vec![], None)]).unwrap();
        assert_eq!(totals.grand_total, Money::ZERO);
        assert_eq!(recompute_totals(&[]), Ok(AuditTotals::default()));
    }

    #[test]
    fn server_totals_are_cross_checked() {
        let orders = vec![
            order("Amy", vec![item("oi-1", 1200, 1, &[600])], Some(1800)),
            order("Bo", vec![item("oi-2", 1200, 1, &[600])], Some(1200)),
        ];
        let totals = recompute_totals(&orders).unwrap();
        assert!(!totals.per_person[0].divergent());
        assert!(totals.per_person[1].divergent());
        assert_eq!(totals.per_person[1].total, Money::from_cents(1800));
    }

    #[test]
    fn oversized_amounts_are_rejected() {
        let orders = vec![order("Amy", vec![item("oi-1", 9_000_000_000, 4_000_000_000, &[])], None)];
        let err = recompute_totals(&orders).unwrap_err();
        assert!(err.to_string().contains("oi-1"));

        let orders = vec![
            order("Amy", vec![item("oi-1", i64::MAX, 1, &[])], None),
            order("Bo", vec![item("oi-2", 1, 1, &[])], None),
        ];
        assert!(recompute_totals(&orders).is_err());
    }

    #[tokio::test]
    async fn token_is_forwarded_untouched() {
        let store = MockStore::new().with_session_orders(sample_session());
        let loaded = load(&store, "sess-1", " tok en ").await.unwrap();
        assert_eq!(loaded.orders.len(), 1);
        assert_eq!(store.calls(), vec![Call::AdminSessionOrders(AdminSessionRequest {
            session_id: "sess-1".to_string(),
            admin_token: " tok en ".to_string(),
        })]);
    }

    #[tokio::test]
    async fn remote_rejection_is_verbatim() {
        let store = MockStore::new().failing_admin("invalid admin token");
        let err = load(&store, "sess-1", "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "invalid admin token");
    }

    #[tokio::test]
    async fn lock_then_reload() {
        let store = MockStore::new().with_session_orders(sample_session());
        let reloaded = set_lock(&store, "sess-1", "tok", true).await.unwrap();
        assert!(reloaded.session.unwrap().is_locked);

        let calls = store.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], Call::SetSessionLock(req) if req.is_locked));
        assert!(matches!(&calls[1], Call::AdminSessionOrders(_)));
    }

    #[tokio::test]
    async fn failed_lock_skips_reload() {
        let store = MockStore::new().failing_admin("invalid admin token");
        assert!(set_lock(&store, "sess-1", "tok", false).await.is_err());
        assert_eq!(store.calls().len(), 1);
    }
}
