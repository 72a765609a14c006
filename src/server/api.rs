// Wire protocol: length-prefixed JSON request/response frames over TCP

use crate::error::{Result, WheelhouseError};
use crate::query::Filters;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Maximum frame size (1MB); catalog payloads are tiny, anything larger is
/// a broken or hostile client.
const MAX_FRAME_SIZE: u32 = 1024 * 1024;

/// API operations, mirroring the marketplace's REST surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ApiRequest {
    /// Interpret a free-text query into a filter record
    ParseQuery { query: Option<String> },
    /// Search the catalog with an explicit filter record
    SearchCars {
        #[serde(default)]
        filters: Filters,
    },
    /// Interpret and search in one round trip
    NaturalSearch { query: Option<String> },
    /// Full catalog listing
    ListCars,
    /// Single vehicle by id
    GetCar { id: i64 },
    Register {
        email: String,
        password: String,
        name: Option<String>,
    },
    Login {
        email: String,
        password: String,
    },
    Logout {
        token: String,
    },
    Favorites {
        token: String,
    },
    ToggleFavorite {
        token: String,
        car_id: i64,
    },
    AddReview {
        token: String,
        car_id: i64,
        rating: i64,
        body: String,
    },
    ListReviews {
        car_id: i64,
    },
    CreatePost {
        token: String,
        title: String,
        body: String,
    },
    ListPosts,
    /// Service and database statistics
    Status,
}

/// Response frame sent back to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    /// Successful response with a payload
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Error response with a client-facing message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Read one length-prefixed JSON frame
pub async fn read_frame<T, S>(stream: &mut S) -> Result<T>
where
    T: DeserializeOwned,
    S: AsyncRead + Unpin,
{
    let length = stream.read_u32().await.map_err(|e| WheelhouseError::Io {
        source: e,
        context: "Failed to read frame length".to_string(),
    })?;

    if length > MAX_FRAME_SIZE {
        return Err(WheelhouseError::Server(format!(
            "Frame too large: {} bytes (max: {})",
            length, MAX_FRAME_SIZE
        )));
    }

    let mut buffer = vec![0u8; length as usize];
    stream
        .read_exact(&mut buffer)
        .await
        .map_err(|e| WheelhouseError::Io {
            source: e,
            context: "Failed to read frame payload".to_string(),
        })?;

    serde_json::from_slice(&buffer).map_err(|e| WheelhouseError::Json {
        source: e,
        context: "Failed to deserialize frame".to_string(),
    })
}

/// Write one length-prefixed JSON frame
pub async fn write_frame<T, S>(stream: &mut S, value: &T) -> Result<()>
where
    T: Serialize,
    S: AsyncWrite + Unpin,
{
    let payload = serde_json::to_vec(value).map_err(|e| WheelhouseError::Json {
        source: e,
        context: "Failed to serialize frame".to_string(),
    })?;

    if payload.len() > MAX_FRAME_SIZE as usize {
        return Err(WheelhouseError::Server(format!(
            "Frame too large: {} bytes (max: {})",
            payload.len(),
            MAX_FRAME_SIZE
        )));
    }

    stream
        .write_u32(payload.len() as u32)
        .await
        .map_err(|e| WheelhouseError::Io {
            source: e,
            context: "Failed to write frame length".to_string(),
        })?;
    stream
        .write_all(&payload)
        .await
        .map_err(|e| WheelhouseError::Io {
            source: e,
            context: "Failed to write frame payload".to_string(),
        })?;
    stream.flush().await.map_err(|e| WheelhouseError::Io {
        source: e,
        context: "Failed to flush frame".to_string(),
    })?;

    Ok(())
}

/// Client for sending one request to a running server
pub struct ApiClient {
    addr: String,
}

impl ApiClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Connect, send a request, and wait for the response
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let mut stream =
            TcpStream::connect(&self.addr)
                .await
                .map_err(|e| WheelhouseError::Io {
                    source: e,
                    context: format!("Failed to connect to server at {}", self.addr),
                })?;

        write_frame(&mut stream, request).await?;
        read_frame(&mut stream).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ApiRequest::NaturalSearch {
            query: Some("семейный кроссовер до 2 млн".to_string()),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"op\":\"natural_search\""));

        let deserialized: ApiRequest = serde_json::from_str(&json).unwrap();
        match deserialized {
            ApiRequest::NaturalSearch { query } => {
                assert_eq!(query.unwrap(), "семейный кроссовер до 2 млн")
            }
            _ => panic!("Wrong request type"),
        }
    }

    #[test]
    fn test_non_string_query_is_rejected_by_decoding() {
        let err = serde_json::from_str::<ApiRequest>(r#"{"op":"parse_query","query":42}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_absent_query_decodes_to_none() {
        let request: ApiRequest = serde_json::from_str(r#"{"op":"parse_query"}"#).unwrap();
        match request {
            ApiRequest::ParseQuery { query } => assert!(query.is_none()),
            _ => panic!("Wrong request type"),
        }
    }

    #[test]
    fn test_response_creation() {
        let ok = ApiResponse::ok(serde_json::json!({"items": []}));
        assert!(ok.success);
        assert!(ok.message.is_none());

        let error = ApiResponse::error("Car not found: 99");
        assert!(!error.success);
        assert_eq!(error.message.unwrap(), "Car not found: 99");
    }
}
