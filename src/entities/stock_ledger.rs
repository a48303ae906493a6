use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a stock movement.
///
/// `Receiving` and `Challan` are reserved values: the column accepts them but
/// no intake path writes them, and balance aggregation ignores them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    #[sea_orm(string_value = "INWARD")]
    Inward,
    #[sea_orm(string_value = "OUTWARD")]
    Outward,
    #[sea_orm(string_value = "RECEIVING")]
    Receiving,
    #[sea_orm(string_value = "CHALLAN")]
    Challan,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Inward => "INWARD",
            MovementType::Outward => "OUTWARD",
            MovementType::Receiving => "RECEIVING",
            MovementType::Challan => "CHALLAN",
        }
    }
}

/// One append-only ledger row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_ledger")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    pub date: NaiveDate,
    #[sea_orm(column_name = "type")]
    pub movement_type: MovementType,
    pub quantity: f64,
    pub remarks: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
