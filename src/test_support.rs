//! In-process upstream doubles shared by the unit tests.

use crate::clients::error::ProviderError;
use crate::clients::{DataSource, IndicatorSource};
use crate::normalize::indicator::normalize_indicator;
use crate::types::city_profile::CityProfile;
use crate::types::readings::EconomicIndicator;
use async_trait::async_trait;
use axum::http::StatusCode;
use axum::routing::any;
use axum::{Json, Router};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;

/// An address nothing listens on.
pub(crate) const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9";

pub(crate) struct MockRoute {
    path: String,
    status: StatusCode,
    body: Value,
}

impl MockRoute {
    pub(crate) fn ok(path: &str, body: Value) -> Self {
        Self::status(path, 200, body)
    }

    pub(crate) fn status(path: &str, status: u16, body: Value) -> Self {
        Self {
            path: path.to_string(),
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        }
    }
}

/// Serves each route's canned JSON for any method; returns the base URL.
pub(crate) async fn serve_json(routes: Vec<MockRoute>) -> std::io::Result<String> {
    let mut router = Router::new();
    for MockRoute { path, status, body } in routes {
        router = router.route(
            &path,
            any(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
    }
    serve_router(router).await
}

pub(crate) async fn serve_router(router: Router) -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{addr}"))
}

type Outcome<T> = Box<dyn Fn() -> Result<T, ProviderError> + Send + Sync>;

/// A [`DataSource`] with a fixed outcome that counts its calls.
pub(crate) struct FakeSource<T> {
    name: &'static str,
    outcome: Outcome<T>,
    calls: AtomicUsize,
}

impl<T: Clone + Send + Sync + 'static> FakeSource<T> {
    pub(crate) fn ok(name: &'static str, value: T) -> Self {
        Self {
            name,
            outcome: Box::new(move || Ok(value.clone())),
            calls: AtomicUsize::new(0),
        }
    }
}

impl<T> FakeSource<T> {
    pub(crate) fn failing(name: &'static str, error: impl Fn() -> ProviderError + Send + Sync + 'static) -> Self {
        Self {
            name,
            outcome: Box::new(move || Err(error())),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Send + 'static> DataSource for FakeSource<T> {
    type Output = T;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _city: &CityProfile) -> Result<T, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }
}

/// Indicator source answering from canned envelopes keyed by indicator code.
/// Codes without an envelope behave like an unreachable provider.
#[derive(Default)]
pub(crate) struct FakeIndicators {
    envelopes: HashMap<String, Value>,
    calls: AtomicUsize,
}

impl FakeIndicators {
    pub(crate) fn with(mut self, code: &str, envelope: Value) -> Self {
        self.envelopes.insert(code.to_string(), envelope);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IndicatorSource for FakeIndicators {
    async fn fetch_indicator(
        &self,
        _country_code: &str,
        indicator_code: &str,
    ) -> Result<EconomicIndicator, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.envelopes.get(indicator_code) {
            Some(envelope) => Ok(normalize_indicator(indicator_code, envelope)?),
            None => Err(ProviderError::not_configured("indicators", "offline")),
        }
    }
}
