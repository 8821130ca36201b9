use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::registry::EntityInfo;
use crate::repository::Resource;
use crate::schema::{EntitySchema, FieldDef, FieldKind};
use crate::store::create_table_sql;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[default]
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
}

impl Priority {
    pub const VALUES: &'static [&'static str] = &["low", "medium", "high"];
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Client-settable task fields. Anything omitted takes its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: Priority,
}

pub static SCHEMA: EntitySchema = EntitySchema {
    name: "tasks",
    table: "tasks",
    fields: &[
        FieldDef::new("id", "id", FieldKind::Integer).server_assigned(),
        FieldDef::new("title", "title", FieldKind::Text),
        FieldDef::new("description", "description", FieldKind::Text),
        FieldDef::new("completed", "completed", FieldKind::Boolean),
        FieldDef::new("priority", "priority", FieldKind::Enumerated(Priority::VALUES)),
        FieldDef::new("createdAt", "created_at", FieldKind::Timestamp).server_assigned(),
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

    fn new_active(draft: Draft, now: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            title: Set(draft.title),
            description: Set(draft.description),
            completed: Set(draft.completed),
            priority: Set(draft.priority),
            created_at: Set(now),
        }
    }

    fn replace_active(current: Model, draft: Draft) -> ActiveModel {
        ActiveModel {
            id: Unchanged(current.id),
            title: Set(draft.title),
            description: Set(draft.description),
            completed: Set(draft.completed),
            priority: Set(draft.priority),
            created_at: Unchanged(current.created_at),
        }
    }

    fn to_draft(model: &Model) -> Draft {
        Draft {
            title: model.title.clone(),
            description: model.description.clone(),
            completed: model.completed,
            priority: model.priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wire_shape_uses_schema_names() {
        let model = Model {
            id: 3,
            title: "Ship report".into(),
            description: String::new(),
            completed: false,
            priority: Priority::High,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&model).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        let mut expected: Vec<_> = SCHEMA.field_names().map(str::to_string).collect();
        expected.sort();
        assert_eq!(keys, expected);
        assert_eq!(json["priority"], "high");
    }

    #[test]
    fn test_draft_fills_omitted_fields() {
        let draft: Draft = serde_json::from_str(r#"{"title":"Only a title"}"#).unwrap();
        assert_eq!(draft.title, "Only a title");
        assert_eq!(draft.priority, Priority::Medium);
        assert!(!draft.completed);
        assert!(draft.description.is_empty());
    }

    #[test]
    fn test_save_keeps_server_assigned_fields() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let current = Model {
            id: 7,
            title: "old".into(),
            description: "d".into(),
            completed: true,
            priority: Priority::Low,
            created_at: created,
        };
        let active = Entity::replace_active(current, Draft::default());
        assert_eq!(active.id, Unchanged(7));
        assert_eq!(active.created_at, Unchanged(created));
        assert_eq!(active.completed, Set(false));
    }
}
