use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::registry::EntityInfo;
use crate::repository::Resource;
use crate::schema::{EntitySchema, FieldDef, FieldKind};
use crate::store::create_table_sql;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Free text; the products page groups by it.
    pub category: String,
    pub in_stock: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Draft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

pub static SCHEMA: EntitySchema = EntitySchema {
    name: "products",
    table: "products",
    fields: &[
        FieldDef::new("id", "id", FieldKind::Integer).server_assigned(),
        FieldDef::new("name", "name", FieldKind::Text),
        FieldDef::new("description", "description", FieldKind::Text),
        FieldDef::new("price", "price", FieldKind::Number),
        FieldDef::new("category", "category", FieldKind::Text),
        FieldDef::new("inStock", "in_stock", FieldKind::Boolean),
    ],
};

inventory::submit! {
    EntityInfo {
        module_path: module_path!(),
        schema: &SCHEMA,
        create_table_fn: create_table_sql::<Entity>,
    }
}

impl Resource for Entity {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Draft = Draft;

    fn schema() -> &'static EntitySchema {
        &SCHEMA
    }

    fn id_column() -> Column {
        Column::Id
    }

    fn id_of(model: &Model) -> i32 {
        model.id
    }

    fn new_active(draft: Draft, _now: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            name: Set(draft.name),
            description: Set(draft.description),
            price: Set(draft.price),
            category: Set(draft.category),
            in_stock: Set(draft.in_stock),
        }
    }

    fn replace_active(current: Model, draft: Draft) -> ActiveModel {
        ActiveModel {
            id: Unchanged(current.id),
            name: Set(draft.name),
            description: Set(draft.description),
            price: Set(draft.price),
            category: Set(draft.category),
            in_stock: Set(draft.in_stock),
        }
    }

    fn to_draft(model: &Model) -> Draft {
        Draft {
            name: model.name.clone(),
            description: model.description.clone(),
            price: model.price,
            category: model.category.clone(),
            in_stock: model.in_stock,
        }
    }
}
