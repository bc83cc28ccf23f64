//! Query Model Builder
//!
//! Declares the query elements and sort keys an endpoint accepts, then
//! resolves request parameters against those declarations.
//!
//! Declarations are fail-fast: an empty key or a disallowed sort type rejects
//! the whole call. Resolution never mutates the declarations, so one builder
//! can serve concurrent requests from behind an `Arc`.

use rq_core::{QueryConfig, RestError, RestResult};
use tracing::{debug, warn};

use crate::bag::{ParameterBag, QueryParameters};
use crate::element::QueryElementModel;
use crate::model::{QueryElement, QueryModel, RejectedQueryElement, SortElement};
use crate::sorts::{SortDirection, SortQueryElementModel};
use crate::value::QueryValue;

#[derive(Debug, Default, Clone)]
pub struct QueryModelBuilder {
    config: QueryConfig,
    query_elements: Vec<QueryElementModel>,
    sort_elements: Vec<SortQueryElementModel>,
}

impl QueryModelBuilder {
    /// Create a builder with the default [`QueryConfig`]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn query_element_models(&self) -> &[QueryElementModel] {
        &self.query_elements
    }

    pub fn sort_query_element_models(&self) -> &[SortQueryElementModel] {
        &self.sort_elements
    }

    // Declaration

    /// Accept a plain query parameter (no filter, no validators)
    pub fn add_query_element(mut self, key: impl Into<String>) -> RestResult<Self> {
        self.query_elements.push(QueryElementModel::new(key)?);
        Ok(self)
    }

    /// Accept several plain query parameters, in order
    pub fn add_query_element_list<I, S>(mut self, keys: I) -> RestResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let models = keys
            .into_iter()
            .map(QueryElementModel::new)
            .collect::<RestResult<Vec<_>>>()?;
        self.query_elements.extend(models);
        Ok(self)
    }

    /// Accept a pre-configured query element
    pub fn add_query_element_model(mut self, model: QueryElementModel) -> Self {
        self.query_elements.push(model);
        self
    }

    /// Accept an ascending, non-default sort key of type `string`
    pub fn add_sort_query_element(self, key: impl Into<String>) -> RestResult<Self> {
        let model = SortQueryElementModel::new(key)?;
        self.add_sort_query_element_model(model)
    }

    /// Accept a sort key of type `string` that is always included
    pub fn add_default_sort_query_element(self, key: impl Into<String>) -> RestResult<Self> {
        let model = SortQueryElementModel::new(key)?.with_default(true);
        self.add_sort_query_element_model(model)
    }

    pub fn add_sort_query_element_list<I, S>(self, keys: I) -> RestResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_sort_query_element_models(keys, false)
    }

    pub fn add_default_sort_query_element_list<I, S>(self, keys: I) -> RestResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_sort_query_element_models(keys, true)
    }

    /// Accept a pre-configured sort key; its type must be allowed by the config
    pub fn add_sort_query_element_model(mut self, model: SortQueryElementModel) -> RestResult<Self> {
        self.ensure_sort_type_allowed(model.sort_type())?;
        self.sort_elements.push(model);
        Ok(self)
    }

    fn add_sort_query_element_models<I, S>(mut self, keys: I, is_default: bool) -> RestResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let models = keys
            .into_iter()
            .map(|key| Ok(SortQueryElementModel::new(key)?.with_default(is_default)))
            .collect::<RestResult<Vec<_>>>()?;
        for model in &models {
            self.ensure_sort_type_allowed(model.sort_type())?;
        }
        self.sort_elements.extend(models);
        Ok(self)
    }

    fn ensure_sort_type_allowed(&self, sort_type: &str) -> RestResult<()> {
        if self.config.is_sort_key_type_allowed(sort_type) {
            Ok(())
        } else {
            Err(RestError::SortTypeNotAllowed {
                sort_type: sort_type.to_string(),
                allowed: self.config.allowed_sort_key_types_display(),
            })
        }
    }

    // Resolution

    pub fn build_from_request<B>(&self, request: &http::Request<B>) -> RestResult<QueryModel> {
        self.build_from_query_parameters_bag(&QueryParameters::from_uri(request.uri()))
    }

    pub fn build_from_parts(&self, parts: &http::request::Parts) -> RestResult<QueryModel> {
        self.build_from_query_parameters_bag(&QueryParameters::from_uri(&parts.uri))
    }

    /// Resolve a parameter bag against the declarations.
    ///
    /// Validator rejections exclude the element and are reported on the model;
    /// only a failing filter turns into an error.
    pub fn build_from_query_parameters_bag<P>(&self, bag: &P) -> RestResult<QueryModel>
    where
        P: ParameterBag + ?Sized,
    {
        let (query_elements, rejected) = self.resolve_query_elements(bag)?;
        let sort_elements = self.resolve_sort_elements(bag);
        Ok(QueryModel::new(query_elements, sort_elements, rejected))
    }

    fn resolve_query_elements<P>(
        &self,
        bag: &P,
    ) -> RestResult<(Vec<QueryElement>, Vec<RejectedQueryElement>)>
    where
        P: ParameterBag + ?Sized,
    {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for model in &self.query_elements {
            let Some(raw) = bag.get(model.query_key()) else {
                continue;
            };

            let value = match model.filter() {
                Some(filter) => filter(raw).map_err(|source| RestError::Filter {
                    query_key: model.query_key().to_string(),
                    source,
                })?,
                None => QueryValue::String(raw.to_string()),
            };

            let failed = model
                .validators()
                .iter()
                .find(|validator| !validator.is_valid(&value));

            match failed {
                Some(validator) => {
                    debug!(
                        query_key = model.query_key(),
                        validator = validator.name(),
                        value_type = value.type_name(),
                        "Query element rejected"
                    );
                    model.fire_validation_failed(validator.as_ref(), &value);
                    rejected.push(RejectedQueryElement {
                        key: model.query_key().to_string(),
                        validator: validator.name().to_string(),
                        message: validator.message(),
                        value,
                    });
                }
                None => accepted.push(QueryElement {
                    key: model.query_key().to_string(),
                    value,
                }),
            }
        }

        Ok((accepted, rejected))
    }

    fn resolve_sort_elements<P>(&self, bag: &P) -> Vec<SortElement>
    where
        P: ParameterBag + ?Sized,
    {
        let (requested, direction) = match bag.get(self.config.sort_by_key()) {
            Some(value) => (Some(value), SortDirection::Asc),
            None => (
                bag.get(self.config.sort_by_descending_key()),
                SortDirection::Desc,
            ),
        };
        let requested: Vec<&str> = requested
            .map(|value| value.split(',').collect())
            .unwrap_or_default();

        debug!(?requested, direction = direction.as_str(), "Resolving sort elements");

        self.sort_elements
            .iter()
            .filter_map(|model| {
                // defensive: unreachable while QueryConfig stays immutable,
                // every type is already checked at declaration
                if !self.config.is_sort_key_type_allowed(model.sort_type()) {
                    warn!(
                        sort_key = model.query_key(),
                        sort_type = model.sort_type(),
                        "Sort element type no longer allowed, skipping"
                    );
                    return None;
                }

                let is_requested = requested.contains(&model.query_key());
                if !is_requested && !model.is_default() {
                    return None;
                }

                Some(SortElement {
                    key: model.query_key().to_string(),
                    sort_type: model.sort_type().to_string(),
                    direction: if is_requested { direction } else { model.direction() },
                    is_default: model.is_default(),
                    requested: is_requested,
                })
            })
            .collect()
    }
}
