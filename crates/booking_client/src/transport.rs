use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::{
    domain::{Doctor, DoctorId, Slot, SpecialtyId},
    protocol::{
        GetDoctorsParams, GetSlotsParams, RpcRequest, RpcResponse, GET_DOCTORS_PATH,
        GET_SLOTS_PATH,
    },
};
use tracing::debug;
use url::Url;

use crate::error::BookingError;

/// Remote lookups the booking form depends on.
///
/// `seq` is the caller's request sequence number; adapters may forward it as
/// the JSON-RPC id.
#[async_trait]
pub trait BookingService: Send + Sync {
    async fn list_doctors(
        &self,
        specialty_id: &SpecialtyId,
        seq: u64,
    ) -> Result<Vec<Doctor>, BookingError>;
    async fn list_slots(
        &self,
        doctor_id: &DoctorId,
        date: &str,
        seq: u64,
    ) -> Result<Vec<Slot>, BookingError>;
}

pub struct MissingBookingService;

#[async_trait]
impl BookingService for MissingBookingService {
    async fn list_doctors(
        &self,
        _specialty_id: &SpecialtyId,
        _seq: u64,
    ) -> Result<Vec<Doctor>, BookingError> {
        Err(BookingError::Unavailable)
    }

    async fn list_slots(
        &self,
        _doctor_id: &DoctorId,
        _date: &str,
        _seq: u64,
    ) -> Result<Vec<Slot>, BookingError> {
        Err(BookingError::Unavailable)
    }
}

pub struct HttpBookingService {
    http: Client,
    base_url: Url,
}

impl HttpBookingService {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, BookingError> {
        let mut base_url = Url::parse(server_url.trim())
            .map_err(|_| BookingError::InvalidServerUrl(server_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(BookingError::InvalidServerUrl(server_url.to_string()));
        }
        // Keep any path prefix when the endpoint paths are joined.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, BookingError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| BookingError::InvalidServerUrl(self.base_url.to_string()))
    }

    async fn call<P, T>(&self, path: &str, params: P, seq: u64) -> Result<T, BookingError>
    where
        P: Serialize + Send,
        T: serde::de::DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("booking: rpc call url={url} seq={seq}");
        let res = self
            .http
            .post(url)
            .json(&RpcRequest::call(params, seq))
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            return Err(BookingError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
        let envelope: RpcResponse = res.json().await?;
        Ok(envelope.into_result()?)
    }
}

#[async_trait]
impl BookingService for HttpBookingService {
    async fn list_doctors(
        &self,
        specialty_id: &SpecialtyId,
        seq: u64,
    ) -> Result<Vec<Doctor>, BookingError> {
        self.call(
            GET_DOCTORS_PATH,
            GetDoctorsParams {
                specialty_id: specialty_id.clone(),
            },
            seq,
        )
        .await
    }

    async fn list_slots(
        &self,
        doctor_id: &DoctorId,
        date: &str,
        seq: u64,
    ) -> Result<Vec<Slot>, BookingError> {
        self.call(
            GET_SLOTS_PATH,
            GetSlotsParams {
                doctor_id: doctor_id.clone(),
                date: date.to_string(),
            },
            seq,
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
