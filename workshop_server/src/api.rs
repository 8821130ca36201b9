//! REST surface over the store: one identical set of routes per entity.
//!
//! | Method   | Path                  | Result                      |
//! |----------|-----------------------|-----------------------------|
//! | `GET`    | `/api`                | installed entity schemas    |
//! | `GET`    | `/api/{entity}`       | list, filtered and ordered  |
//! | `GET`    | `/api/{entity}/count` | `{"count": n}`              |
//! | `POST`   | `/api/{entity}`       | created record, `201`       |
//! | `GET`    | `/api/{entity}/{id}`  | one record                  |
//! | `PUT`    | `/api/{entity}/{id}`  | replaced record             |
//! | `DELETE` | `/api/{entity}/{id}`  | `204`                       |
//!
//! List and count accept `field=value` equality filters. List also takes
//! `_sort=a,b` and `_order=asc,desc`; a missing direction means ascending.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use thiserror::Error;
use workshopdb::entity::{contact, product, task};
use workshopdb::{
    CrudRepository, Direction, EntitySchema, Filter, FindOptions, RepoError, Resource,
    SchemaError, Store,
};

const SORT_PARAM: &str = "_sort";
const ORDER_PARAM: &str = "_order";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Repo(RepoError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Repo(RepoError::Schema(_)) => StatusCode::BAD_REQUEST,
            ApiError::Repo(RepoError::Db(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Schema(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("request failed: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Build the application router.
pub fn router(store: Store) -> Router {
    Router::new()
        .route("/api", get(index))
        .nest(&mount_path::<task::Entity>(), resource_routes::<task::Entity>())
        .nest(&mount_path::<contact::Entity>(), resource_routes::<contact::Entity>())
        .nest(&mount_path::<product::Entity>(), resource_routes::<product::Entity>())
        .with_state(store)
}

fn mount_path<R: Resource>() -> String {
    format!("/api/{}", R::schema().name)
}

fn resource_routes<R: Resource>() -> Router<Store> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/count", get(count::<R>))
        .route("/:id", get(fetch::<R>).put(update::<R>).delete(remove::<R>))
}

fn describe(schema: &EntitySchema) -> Value {
    let fields: Vec<Value> = schema
        .fields
        .iter()
        .map(|f| {
            json!({
                "name": f.name,
                "type": f.kind.describe(),
                "serverAssigned": f.server_assigned,
            })
        })
        .collect();
    json!({ "name": schema.name, "fields": fields })
}

async fn index(State(store): State<Store>) -> Json<Value> {
    let entities: Vec<Value> = store.registry().all().into_iter().map(describe).collect();
    Json(json!({ "entities": entities }))
}

/// Split comma separated values, dropping empty items.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Translate query parameters into a filter and an ordering.
pub fn parse_params(
    schema: &EntitySchema,
    params: &[(String, String)],
) -> Result<FindOptions, ApiError> {
    let mut filter = Filter::new();
    let mut sort: Vec<&str> = Vec::new();
    let mut order: Vec<Direction> = Vec::new();

    for (key, value) in params {
        match key.as_str() {
            SORT_PARAM => sort.extend(split_list(value)),
            ORDER_PARAM => {
                for raw in split_list(value) {
                    order.push(raw.parse().map_err(ApiError::BadRequest)?);
                }
            }
            field => {
                let def = schema.require_field(field)?;
                filter.push(def.name, def.parse(value)?);
            }
        }
    }

    if order.len() > sort.len() {
        return Err(ApiError::BadRequest(format!(
            "`{ORDER_PARAM}` has {} entries but `{SORT_PARAM}` has {}",
            order.len(),
            sort.len()
        )));
    }

    let mut options = FindOptions::from(filter);
    for (i, field) in sort.into_iter().enumerate() {
        let def = schema.require_field(field)?;
        let direction = order.get(i).copied().unwrap_or_default();
        options = options.order_by(def.name, direction);
    }
    Ok(options)
}

async fn list<R: Resource>(
    State(store): State<Store>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<R::Model>>, ApiError> {
    let options = parse_params(R::schema(), &params)?;
    let records = store.repo::<R>().find(options).await?;
    Ok(Json(records))
}

async fn count<R: Resource>(
    State(store): State<Store>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ApiError> {
    let options = parse_params(R::schema(), &params)?;
    let count = store.repo::<R>().count(options.filter).await?;
    Ok(Json(json!({ "count": count })))
}

async fn fetch<R: Resource>(
    State(store): State<Store>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<R::Model>, ApiError> {
    let Path(id) = id?;
    Ok(Json(store.repo::<R>().get(id).await?))
}

async fn create<R: Resource>(
    State(store): State<Store>,
    draft: Result<Json<R::Draft>, JsonRejection>,
) -> Result<(StatusCode, Json<R::Model>), ApiError> {
    let Json(draft) = draft?;
    let created = store.repo::<R>().insert(draft).await?;
    log::info!("created {} {}", R::schema().name, R::id_of(&created));
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update<R: Resource>(
    State(store): State<Store>,
    id: Result<Path<i32>, PathRejection>,
    draft: Result<Json<R::Draft>, JsonRejection>,
) -> Result<Json<R::Model>, ApiError> {
    let Path(id) = id?;
    let Json(draft) = draft?;
    Ok(Json(store.repo::<R>().save(id, draft).await?))
}

async fn remove<R: Resource>(
    State(store): State<Store>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    store.repo::<R>().delete(id).await?;
    log::info!("deleted {} {id}", R::schema().name);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use workshopdb::FieldValue;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_filters_and_ordering() {
        let options = parse_params(
            &task::SCHEMA,
            &params(&[
                ("completed", "false"),
                ("_sort", "priority,createdAt"),
                ("_order", "desc"),
            ]),
        )
        .unwrap();
        assert_eq!(
            options.filter.terms(),
            &[("completed".to_string(), FieldValue::Boolean(false))]
        );
        assert_eq!(
            options.order_by,
            vec![
                ("priority".to_string(), Direction::Desc),
                ("createdAt".to_string(), Direction::Asc),
            ]
        );
    }

    #[test]
    fn test_column_names_map_to_wire_names() {
        let options =
            parse_params(&product::SCHEMA, &params(&[("in_stock", "true")])).unwrap();
        assert_eq!(
            options.filter.terms(),
            &[("inStock".to_string(), FieldValue::Boolean(true))]
        );
    }

    #[test]
    fn test_bad_params_are_client_errors() {
        let cases = [
            params(&[("colour", "red")]),
            params(&[("completed", "maybe")]),
            params(&[("_sort", "nope")]),
            params(&[("_sort", "title"), ("_order", "sideways")]),
            params(&[("_order", "asc")]),
        ];
        for case in cases {
            let err = parse_params(&task::SCHEMA, &case).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{case:?}");
        }
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(RepoError::NotFound {
            entity: "tasks",
            id: 9,
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
