use crate::domain::payment::{
    BankDetails, CheckoutSession, Payment, PaymentStats, PaymentStatus,
};
use crate::domain::ports::{PaymentApi, PaymentId, RoutineApi};
use crate::domain::routine::Routine;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

/// The REST adapter for both ports.
///
/// Every request carries the session's bearer token when one is present.
/// Non-2xx responses become [`AppError::Api`] with the backend's message
/// body; transport failures become [`AppError::Http`]. No retries and no
/// client-side timeouts beyond reqwest's defaults.
///
/// `Clone` shares the underlying connection pool.
#[derive(Clone)]
pub struct RestBackend {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitiatePayment {
    routine_id: u32,
    client_id: u32,
}

#[derive(Deserialize)]
struct CreatedPayment {
    id: PaymentId,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn post_empty(&self, path: &str) -> Result<()> {
        let response = self.request(Method::POST, path).send().await?;
        Self::expect_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RoutineApi for RestBackend {
    async fn routine(&self, routine_id: u32) -> Result<Option<Routine>> {
        let response = self
            .request(Method::GET, &format!("/api/routines/{}", routine_id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::expect_success(response).await?;
        Ok(Some(response.json().await?))
    }

    async fn client_routines(&self, client_id: u32) -> Result<Vec<Routine>> {
        let response = self
            .request(Method::GET, &format!("/api/clients/{}/routines", client_id))
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PaymentApi for RestBackend {
    async fn create_checkout(&self, routine_id: u32, client_id: u32) -> Result<CheckoutSession> {
        let response = self
            .request(Method::POST, "/api/payments/checkout")
            .json(&InitiatePayment {
                routine_id,
                client_id,
            })
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }

    async fn bank_details(&self, trainer_id: u32) -> Result<BankDetails> {
        let response = self
            .request(
                Method::GET,
                &format!("/api/trainers/{}/bank-details", trainer_id),
            )
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }

    async fn create_transfer(&self, routine_id: u32, client_id: u32) -> Result<PaymentId> {
        let response = self
            .request(Method::POST, "/api/payments/transfer")
            .json(&InitiatePayment {
                routine_id,
                client_id,
            })
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        let created: CreatedPayment = response.json().await?;
        Ok(created.id)
    }

    async fn confirm_transfer(&self, payment_id: PaymentId) -> Result<()> {
        self.post_empty(&format!("/api/payments/{}/confirm-transfer", payment_id))
            .await
    }

    async fn mark_seen(&self, payment_id: PaymentId) -> Result<()> {
        self.post_empty(&format!("/api/payments/{}/seen", payment_id))
            .await
    }

    async fn payments(
        &self,
        trainer_id: u32,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Payment>> {
        let mut request = self.request(
            Method::GET,
            &format!("/api/trainers/{}/payments", trainer_id),
        );
        if let Some(status) = status {
            request = request.query(&[("status", status.as_wire())]);
        }
        let response = Self::expect_success(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn stats(&self, trainer_id: u32) -> Result<PaymentStats> {
        let response = self
            .request(
                Method::GET,
                &format!("/api/trainers/{}/payments/stats", trainer_id),
            )
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }

    async fn approve(&self, payment_id: PaymentId) -> Result<Payment> {
        let response = self
            .request(Method::POST, &format!("/api/payments/{}/approve", payment_id))
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }

    async fn reject(&self, payment_id: PaymentId) -> Result<Payment> {
        let response = self
            .request(Method::POST, &format!("/api/payments/{}/reject", payment_id))
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }
}
