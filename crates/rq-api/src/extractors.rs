//! Axum extractors for API handlers

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use rq_contracts::{
    DenormalizationFinished, DenormalizationListener, Listener, RuleValidator, Validatable,
};
use rq_queries::QueryParameters;
use serde::de::DeserializeOwned;
use std::convert::Infallible;

use crate::error::ApiError;

/// Decoded query-string parameters, ready for `build_from_query_parameters_bag`
#[derive(Debug, Clone, Default)]
pub struct QueryParams(pub QueryParameters);

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(QueryParams(QueryParameters::from_uri(&parts.uri)))
    }
}

impl std::ops::Deref for QueryParams {
    type Target = QueryParameters;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// JSON body whose top-level object passed its validation rules.
///
/// Malformed bodies are rejected with 400, rule violations with 422 and the
/// ordered `{field, message}` list.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validatable + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        DenormalizationListener::<RuleValidator>::default()
            .on_event(&DenormalizationFinished::validatable(0, &value))?;

        Ok(ValidatedJson(value))
    }
}

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
