use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{DoctorId, SpecialtyId},
    error::RpcFailure,
};

pub const JSONRPC_VERSION: &str = "2.0";
pub const JSONRPC_METHOD: &str = "call";

pub const GET_DOCTORS_PATH: &str = "/appointments/booking/get_doctors";
pub const GET_SLOTS_PATH: &str = "/appointments/booking/get_slots";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest<P> {
    pub jsonrpc: String,
    pub method: String,
    pub params: P,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl<P> RpcRequest<P> {
    pub fn call(params: P, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: JSONRPC_METHOD.to_string(),
            params,
            id: Some(id),
        }
    }
}

/// Response envelope. Exactly one of `result` or `error` is expected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    Rpc(RpcFailure),
    Malformed(String),
}

impl RpcResponse {
    pub fn success(result: impl Serialize, id: Option<u64>) -> serde_json::Result<Self> {
        Ok(Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id: id.map(Value::from),
            result: Some(serde_json::to_value(result)?),
            error: None,
        })
    }

    pub fn failure(error: RpcFailure, id: Option<u64>) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id: id.map(Value::from),
            result: None,
            error: Some(error),
        }
    }

    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, EnvelopeError> {
        if let Some(error) = self.error {
            return Err(EnvelopeError::Rpc(error));
        }
        // A null result is indistinguishable from a missing one on the wire.
        match self.result {
            Some(Value::Null) | None => Err(EnvelopeError::Malformed(
                "response envelope has neither result nor error".to_string(),
            )),
            Some(value) => serde_json::from_value(value)
                .map_err(|err| EnvelopeError::Malformed(format!("unexpected result shape: {err}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetDoctorsParams {
    pub specialty_id: SpecialtyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetSlotsParams {
    pub doctor_id: DoctorId,
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Doctor, Slot};

    #[test]
    fn request_envelope_matches_wire_shape() {
        let request = RpcRequest::call(
            GetDoctorsParams {
                specialty_id: SpecialtyId::new("CARD"),
            },
            1,
        );
        let encoded = serde_json::to_value(&request).expect("encode");
        assert_eq!(
            encoded,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "call",
                "params": {"specialty_id": "CARD"},
                "id": 1
            })
        );
    }

    #[test]
    fn into_result_decodes_payload_in_order() {
        let response: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":null,"result":[{"id":"d1","name":"Dr. A"},{"id":"d2","name":"Dr. B"}]}"#,
        )
        .expect("envelope");
        let doctors: Vec<Doctor> = response.into_result().expect("doctors");
        assert_eq!(
            doctors,
            vec![Doctor::new("d1", "Dr. A"), Doctor::new("d2", "Dr. B")]
        );
    }

    #[test]
    fn empty_result_list_is_not_an_error() {
        let response: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","result":[]}"#).expect("envelope");
        let slots: Vec<Slot> = response.into_result().expect("slots");
        assert!(slots.is_empty());
    }

    #[test]
    fn error_member_wins_over_result() {
        let response = RpcResponse::failure(RpcFailure::new(200, "boom"), Some(3));
        let err = response.into_result::<Vec<Slot>>().expect_err("must fail");
        assert_eq!(err, EnvelopeError::Rpc(RpcFailure::new(200, "boom")));
    }

    #[test]
    fn missing_result_is_malformed() {
        let response: RpcResponse = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).expect("envelope");
        assert!(matches!(
            response.into_result::<Vec<Slot>>(),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn wrong_result_shape_is_malformed() {
        let response: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","result":{"doctors":[]}}"#).expect("envelope");
        assert!(matches!(
            response.into_result::<Vec<Doctor>>(),
            Err(EnvelopeError::Malformed(_))
        ));
    }
}
