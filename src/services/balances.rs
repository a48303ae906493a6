use crate::{
    db::DbPool,
    entities::{item, stock_ledger, MovementType},
    errors::ServiceError,
};
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Inward, outward and closing quantities for one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub in_qty: f64,
    pub out_qty: f64,
    pub closing: f64,
}

impl Balance {
    /// Sums a set of movements. Reserved movement types count toward neither
    /// total. No rounding is applied and a negative closing is kept as-is.
    pub fn from_movements<I>(movements: I) -> Self
    where
        I: IntoIterator<Item = (MovementType, f64)>,
    {
        let (in_qty, out_qty) =
            movements
                .into_iter()
                .fold((0.0, 0.0), |(inward, outward), (kind, quantity)| match kind {
                    MovementType::Inward => (inward + quantity, outward),
                    MovementType::Outward => (inward, outward + quantity),
                    MovementType::Receiving | MovementType::Challan => (inward, outward),
                });

        Self {
            in_qty,
            out_qty,
            closing: in_qty - out_qty,
        }
    }

    pub fn from_entries(entries: &[stock_ledger::Model]) -> Self {
        Self::from_movements(entries.iter().map(|e| (e.movement_type, e.quantity)))
    }
}

/// One dashboard/report row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBalance {
    pub item: item::Model,
    pub in_qty: f64,
    pub out_qty: f64,
    pub closing: f64,
    /// Set when the item has a minimum level and the closing quantity is under it
    pub below_min_level: bool,
}

impl ItemBalance {
    pub fn new(item: item::Model, entries: &[stock_ledger::Model]) -> Self {
        let balance = Balance::from_entries(entries);
        let below_min_level = item
            .min_level
            .map_or(false, |min_level| balance.closing < min_level);

        Self {
            item,
            in_qty: balance.in_qty,
            out_qty: balance.out_qty,
            closing: balance.closing,
            below_min_level,
        }
    }
}

/// Reads every item with its ledger and derives balances on each call.
#[derive(Clone)]
pub struct BalanceService {
    db_pool: Arc<DbPool>,
}

impl BalanceService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Balances for all items, ordered by item id.
    #[instrument(skip(self))]
    pub async fn list_item_balances(&self) -> Result<Vec<ItemBalance>, ServiceError> {
        let db = &*self.db_pool;

        let rows = item::Entity::find()
            .order_by_asc(item::Column::Id)
            .find_with_related(stock_ledger::Entity)
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to load items with ledger entries: {}", e);
                ServiceError::DatabaseError(e)
            })?;

        debug!(items = rows.len(), "aggregating closing balances");

        Ok(rows
            .into_iter()
            .map(|(item, entries)| ItemBalance::new(item, &entries))
            .collect())
    }
}
