//! Catalogue endpoints
//!
//! An in-memory item catalogue served through a query model builder:
//! `GET /api/v1/items` filters and sorts, `POST /api/v1/items` validates the
//! body before storing it.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::NaiveDate;
use rq_api::{ApiResult, QueryParams, ValidatedJson};
use rq_core::{AppConfig, QueryConfig, RestResult};
use rq_queries::sorts::sort_types;
use rq_queries::validators::{Length, NotEmpty, OneOf, Range};
use rq_queries::{
    filters, QueryElementModel, QueryModel, QueryModelBuilder, QueryValue, SortQueryElementModel,
    Validator,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use validator::{Validate, ValidationError};

pub const STATUSES: &[&str] = &["available", "discontinued"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub price: f64,
    pub created_on: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 64, message = "must be 1 to 64 characters"))]
    pub name: String,
    #[validate(custom = "validate_status")]
    pub status: String,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,
    pub created_on: Option<NaiveDate>,
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    if STATUSES.contains(&status) {
        return Ok(());
    }
    let mut error = ValidationError::new("unknown_status");
    error.message = Some(format!("must be one of: {}", STATUSES.join(", ")).into());
    Err(error)
}

#[derive(Serialize)]
struct ItemCollection {
    #[serde(rename = "_type")]
    type_name: &'static str,
    count: usize,
    elements: Vec<Item>,
    query: QueryModel,
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub items: Arc<RwLock<Vec<Item>>>,
    pub item_query: Arc<QueryModelBuilder>,
}

impl AppState {
    pub fn new(config: AppConfig, items: Vec<Item>) -> RestResult<Self> {
        let item_query = item_query(config.query.clone())?;
        Ok(Self {
            config: Arc::new(config),
            items: Arc::new(RwLock::new(items)),
            item_query: Arc::new(item_query),
        })
    }
}

/// Query parameters and sort keys accepted by `GET /api/v1/items`
pub fn item_query(config: QueryConfig) -> RestResult<QueryModelBuilder> {
    let non_negative: Arc<dyn Validator> = Arc::new(Range::at_least(0.0));

    QueryModelBuilder::with_config(config)
        .add_query_element_model(
            QueryElementModel::new("status")?
                .with_filter(filters::lowercase)
                .with_validator(OneOf::new(STATUSES.iter().copied()))
                .on_validation_failed(|event| {
                    info!(value = %event.value, "Ignoring unknown status filter");
                }),
        )
        .add_query_element_model(
            QueryElementModel::new("name")?
                .with_filter(filters::trim)
                .with_validator(NotEmpty)
                .with_validator(Length::max(64)),
        )
        .add_query_element_model(
            QueryElementModel::new("min_price")?
                .with_filter(filters::float)
                .with_shared_validator(non_negative.clone()),
        )
        .add_query_element_model(
            QueryElementModel::new("max_price")?
                .with_filter(filters::float)
                .with_shared_validator(non_negative),
        )
        .add_query_element_model(QueryElementModel::new("created_after")?.with_filter(filters::date))
        .add_sort_query_element("name")?
        .add_sort_query_element_model(
            SortQueryElementModel::new("price")?.with_type(sort_types::NUMBER),
        )?
        .add_sort_query_element_model(
            SortQueryElementModel::new("created_on")?.with_type(sort_types::DATE),
        )?
        // declared last so it only breaks ties
        .add_sort_query_element_model(
            SortQueryElementModel::new("id")?
                .with_type(sort_types::INTEGER)
                .with_default(true),
        )
}

/// Filter and order items according to a built query model
pub fn apply(model: &QueryModel, items: &[Item]) -> Vec<Item> {
    let mut selected: Vec<Item> = items
        .iter()
        .filter(|item| matches(model, item))
        .cloned()
        .collect();

    let order = model.sort_order();
    selected.sort_by(|a, b| order.compare(a, b, compare));
    selected
}

fn matches(model: &QueryModel, item: &Item) -> bool {
    if let Some(status) = model.get("status").and_then(QueryValue::as_str) {
        if item.status != status {
            return false;
        }
    }
    if let Some(name) = model.get("name").and_then(QueryValue::as_str) {
        if !item.name.to_lowercase().contains(&name.to_lowercase()) {
            return false;
        }
    }
    if let Some(min) = model.get("min_price").and_then(QueryValue::as_f64) {
        if item.price < min {
            return false;
        }
    }
    if let Some(max) = model.get("max_price").and_then(QueryValue::as_f64) {
        if item.price > max {
            return false;
        }
    }
    if let Some(after) = model.get("created_after").and_then(QueryValue::as_date) {
        if item.created_on <= after {
            return false;
        }
    }
    true
}

fn compare(attribute: &str, a: &Item, b: &Item) -> Ordering {
    match attribute {
        "id" => a.id.cmp(&b.id),
        "name" => a.name.cmp(&b.name),
        "price" => a.price.total_cmp(&b.price),
        "created_on" => a.created_on.cmp(&b.created_on),
        _ => Ordering::Equal,
    }
}

/// GET /api/v1/items
pub async fn list_items(
    State(state): State<AppState>,
    QueryParams(params): QueryParams,
) -> ApiResult<impl IntoResponse> {
    let model = state.item_query.build_from_query_parameters_bag(&params)?;
    let items = state.items.read().await;
    let elements = apply(&model, &items);

    Ok(Json(ItemCollection {
        type_name: "Collection",
        count: elements.len(),
        elements,
        query: model,
    }))
}

/// POST /api/v1/items
pub async fn create_item(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateItemRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut items = state.items.write().await;
    let item = Item {
        id: items.iter().map(|i| i.id).max().unwrap_or(0) + 1,
        name: request.name,
        status: request.status,
        price: request.price,
        created_on: request
            .created_on
            .unwrap_or_else(|| chrono::Utc::now().date_naive()),
    };
    items.push(item.clone());
    info!(id = item.id, name = %item.name, "Item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Items the server starts with
pub fn sample_items() -> Vec<Item> {
    let item = |id, name: &str, status: &str, price, (y, m, d)| Item {
        id,
        name: name.to_string(),
        status: status.to_string(),
        price,
        created_on: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
    };

    vec![
        item(1, "Desk lamp", "available", 39.0, (2024, 1, 12)),
        item(2, "Office chair", "available", 189.5, (2024, 2, 3)),
        item(3, "Standing desk", "discontinued", 420.0, (2023, 11, 20)),
        item(4, "Monitor arm", "available", 89.0, (2024, 3, 18)),
        item(5, "Desk mat", "available", 39.0, (2024, 4, 1)),
    ]
}
