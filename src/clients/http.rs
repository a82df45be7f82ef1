use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{
    AddCartItemRequest, ApiEnvelope, CreateOrderRequest, CsrfToken, DashboardStats, PaymentReceipt,
    PaymentRequest, QrCodePayload,
};
use crate::clients::{CartApi, OrderApi, PaymentApi, ReportApi};
use crate::domain::{CartSnapshot, Invoice, Order, OrderStatus};
use crate::error::RemoteError;

/// The real backend: one shared `reqwest` client against the configured
/// base URL. Mutating requests carry the anti-forgery pair when one was
/// supplied by the hosting page.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    csrf: Option<CsrfToken>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, csrf: Option<CsrfToken>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the anti-forgery pair. Absence is tolerated; presence is
    /// always forwarded.
    fn with_csrf(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.csrf {
            Some(pair) => request.header(&pair.header, &pair.token),
            None => request,
        }
    }

    /// Send a request and unwrap the `{success, message, data}` envelope.
    ///
    /// Session expiry is told apart from ordinary rejection: a 401, or a
    /// 403 whose message mentions the anti-forgery token, means the page
    /// must be reloaded rather than retried.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        let status = response.status();
        debug!(%status, "backend responded");

        if status == StatusCode::UNAUTHORIZED {
            return Err(RemoteError::SessionExpired);
        }

        let envelope: ApiEnvelope<T> = response.json().await.map_err(|e| {
            if status.is_success() {
                RemoteError::Decode(e.to_string())
            } else {
                RemoteError::Transport(format!("backend returned status {status}"))
            }
        })?;

        if status == StatusCode::FORBIDDEN
            && envelope
                .message
                .as_deref()
                .is_some_and(|m| m.contains("CSRF"))
        {
            return Err(RemoteError::SessionExpired);
        }

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("request failed with status {status}"));
            return Err(RemoteError::Rejected(message));
        }

        Ok(envelope)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        self.dispatch(request)
            .await?
            .data
            .ok_or_else(|| RemoteError::Decode("response envelope carried no data".to_string()))
    }

    /// Like [`fetch`](Self::fetch) for endpoints whose payload we do not
    /// care about.
    async fn acknowledge(&self, request: RequestBuilder) -> Result<(), RemoteError> {
        self.dispatch::<serde_json::Value>(request).await.map(|_| ())
    }
}

#[async_trait]
impl CartApi for HttpBackend {
    async fn fetch_cart(&self) -> Result<CartSnapshot, RemoteError> {
        self.fetch(self.http.get(self.url("/cart"))).await
    }

    async fn add_cart_item(&self, request: AddCartItemRequest) -> Result<CartSnapshot, RemoteError> {
        let builder = self.http.post(self.url("/cart/add")).json(&request);
        self.fetch(self.with_csrf(builder)).await
    }

    async fn update_cart_quantity(
        &self,
        menu_id: i64,
        quantity: u32,
    ) -> Result<CartSnapshot, RemoteError> {
        let builder = self
            .http
            .put(self.url(&format!("/cart/update/{menu_id}")))
            .query(&[("quantity", quantity)]);
        self.fetch(self.with_csrf(builder)).await
    }

    async fn remove_cart_item(&self, menu_id: i64) -> Result<CartSnapshot, RemoteError> {
        let builder = self.http.delete(self.url(&format!("/cart/remove/{menu_id}")));
        self.fetch(self.with_csrf(builder)).await
    }

    async fn clear_cart(&self) -> Result<(), RemoteError> {
        let builder = self.http.delete(self.url("/cart/clear"));
        self.acknowledge(self.with_csrf(builder)).await
    }
}

#[async_trait]
impl OrderApi for HttpBackend {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, RemoteError> {
        let builder = self.http.post(self.url("/orders")).json(&request);
        self.fetch(self.with_csrf(builder)).await
    }

    async fn fetch_order(&self, order_number: &str) -> Result<Order, RemoteError> {
        self.fetch(self.http.get(self.url(&format!("/orders/{order_number}"))))
            .await
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<Order, RemoteError> {
        let builder = self
            .http
            .put(self.url(&format!("/orders/{order_id}/status")))
            .query(&[("status", status.to_string())]);
        self.fetch(self.with_csrf(builder)).await
    }

    async fn fetch_qr_code(&self, order_number: &str) -> Result<QrCodePayload, RemoteError> {
        self.fetch(
            self.http
                .get(self.url(&format!("/orders/{order_number}/qr-code"))),
        )
        .await
    }
}

#[async_trait]
impl PaymentApi for HttpBackend {
    async fn submit_payment(&self, request: PaymentRequest) -> Result<PaymentReceipt, RemoteError> {
        let builder = self.http.post(self.url("/payments")).json(&request);
        self.fetch(self.with_csrf(builder)).await
    }
}

#[async_trait]
impl ReportApi for HttpBackend {
    async fn invoices_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Invoice>, RemoteError> {
        self.fetch(
            self.http
                .get(self.url("/invoices/by-date"))
                .query(&[("startDate", start.to_string()), ("endDate", end.to_string())]),
        )
        .await
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, RemoteError> {
        self.fetch(self.http.get(self.url("/dashboard/stats"))).await
    }
}
