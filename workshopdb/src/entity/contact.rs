use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::registry::EntityInfo;
use crate::repository::Resource;
use crate::schema::{EntitySchema, FieldDef, FieldKind};
use crate::store::create_table_sql;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contacts")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Contact form values; also the insert/save payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Draft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
}

pub static SCHEMA: EntitySchema = EntitySchema {
    name: "contacts",
    table: "contacts",
    fields: &[
        FieldDef::new("id", "id", FieldKind::Integer).server_assigned(),
        FieldDef::new("name", "name", FieldKind::Text),
        FieldDef::new("email", "email", FieldKind::Text),
        FieldDef::new("phone", "phone", FieldKind::Text),
        FieldDef::new("company", "company", FieldKind::Text),
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
            email: Set(draft.email),
            phone: Set(draft.phone),
            company: Set(draft.company),
        }
    }

    fn replace_active(current: Model, draft: Draft) -> ActiveModel {
        ActiveModel {
            id: Unchanged(current.id),
            name: Set(draft.name),
            email: Set(draft.email),
            phone: Set(draft.phone),
            company: Set(draft.company),
        }
    }

    fn to_draft(model: &Model) -> Draft {
        Draft {
            name: model.name.clone(),
            email: model.email.clone(),
            phone: model.phone.clone(),
            company: model.company.clone(),
        }
    }
}
