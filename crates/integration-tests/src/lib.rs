//! Integration tests for Snowdex.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p snowdex-integration-tests
//! ```
//!
//! No network access or API key is needed: the Gemini API is replaced either
//! by [`ScriptedGateway`] or by [`MockGemini`], a loopback axum server that
//! replays canned responses and records what the client sent.
//!
//! # Test Categories
//!
//! - `capture_pipeline` - Collection manager over a file store
//! - `gemini_client` - Wire format and error mapping of the HTTP client
//! - `local_store` - On-disk record layout and corruption handling
//! - `profiles` - Profile registry persistence

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::Value;
use snowdex::config::GeminiConfig;
use snowdex::gemini::{GeminiError, SnowmanGateway};
use snowdex_core::{AnalysisResult, ImageData, Rarity, SnowmanStats};
use tokio::net::TcpListener;

/// Smallest byte strings the image sniffer accepts.
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\x00\x10JFIF\x00\x01";
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

/// A high-entropy key that passes config validation.
pub const TEST_API_KEY: &str = "AIzaSyD4x9Qk2LmN7pR3tV8wZ1bC6eF0gH5jK";

#[must_use]
pub fn photo() -> ImageData {
    ImageData::from_bytes(JPEG_BYTES.to_vec()).expect("valid jpeg")
}

#[must_use]
pub fn sticker() -> ImageData {
    ImageData::from_bytes(PNG_BYTES.to_vec()).expect("valid png")
}

/// The canonical happy-path analysis.
#[must_use]
pub fn frosty() -> AnalysisResult {
    named("Frosty")
}

/// Frosty's analysis under another name.
#[must_use]
pub fn named(name: &str) -> AnalysisResult {
    AnalysisResult {
        name: name.to_string(),
        description: "A cheerful sentinel of the schoolyard.".to_string(),
        kind: "Ice".to_string(),
        rarity: Rarity::Rare,
        stats: SnowmanStats::new(80, 90, 40, 95, 60).expect("stats in range"),
        fun_fact: "Wears a borrowed scarf.".to_string(),
    }
}

/// Frosty as the model would return it.
#[must_use]
pub fn frosty_json() -> Value {
    serde_json::json!({
        "name": "Frosty",
        "description": "A cheerful sentinel of the schoolyard.",
        "type": "Ice",
        "rarity": "Rare",
        "stats": {
            "creativity": 80,
            "roundness": 90,
            "accessories": 40,
            "chillFactor": 95,
            "durability": 60
        },
        "funFact": "Wears a borrowed scarf."
    })
}

/// Gemini config pointing at `base_url`.
///
/// # Panics
///
/// Panics if `base_url` is not a valid URL.
#[must_use]
pub fn gemini_config(base_url: &str) -> GeminiConfig {
    GeminiConfig {
        api_key: SecretString::from(TEST_API_KEY),
        base_url: url::Url::parse(base_url).expect("valid base url"),
        analysis_model: "gemini-3-flash-preview".to_string(),
        sticker_model: "gemini-2.5-flash-image".to_string(),
    }
}

// =============================================================================
// Scripted gateway
// =============================================================================

type Queue<T> = Mutex<VecDeque<Result<T, GeminiError>>>;

/// In-process gateway replaying queued results.
///
/// An exhausted analysis queue answers `EmptyResponse`; an exhausted sticker
/// queue answers "no sticker".
#[derive(Default)]
pub struct ScriptedGateway {
    analyses: Queue<AnalysisResult>,
    stickers: Queue<Option<ImageData>>,
    analyze_calls: AtomicUsize,
    sticker_calls: AtomicUsize,
}

impl ScriptedGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn analysis(self, result: Result<AnalysisResult, GeminiError>) -> Self {
        lock(&self.analyses).push_back(result);
        self
    }

    #[must_use]
    pub fn sticker(self, result: Result<Option<ImageData>, GeminiError>) -> Self {
        lock(&self.stickers).push_back(result);
        self
    }

    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn sticker_calls(&self) -> usize {
        self.sticker_calls.load(Ordering::SeqCst)
    }
}

impl SnowmanGateway for ScriptedGateway {
    async fn analyze(&self, _image: &ImageData) -> Result<AnalysisResult, GeminiError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        let next = lock(&self.analyses).pop_front();
        next.unwrap_or(Err(GeminiError::EmptyResponse))
    }

    async fn generate_sticker(&self, _image: &ImageData) -> Result<Option<ImageData>, GeminiError> {
        self.sticker_calls.fetch_add(1, Ordering::SeqCst);
        let next = lock(&self.stickers).pop_front();
        next.unwrap_or(Ok(None))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Loopback Gemini server
// =============================================================================

/// A canned HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockResponse {
    /// 200 with a JSON body.
    #[must_use]
    pub fn ok(body: &Value) -> Self {
        Self::status(200, body)
    }

    /// Arbitrary status with a JSON body.
    #[must_use]
    pub fn status(status: u16, body: &Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    /// 200 whose first candidate holds `text`.
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self::ok(&serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        }))
    }

    /// 200 whose first candidate holds an inline image.
    #[must_use]
    pub fn image(image: &ImageData) -> Self {
        Self::ok(&serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "Here is your sticker!"},
                    {"inlineData": {"mimeType": image.mime_type(), "data": image.to_base64()}}
                ]},
                "finishReason": "STOP"
            }]
        }))
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// A request as received by [`MockGemini`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercased.
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl RecordedRequest {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response =
            (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response();
        for (name, value) in self.headers {
            if let (Ok(name), Ok(value)) =
                (HeaderName::try_from(name), HeaderValue::try_from(value))
            {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Loopback HTTP server answering every request with the next scripted
/// response.
pub struct MockGemini {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: tokio::task::JoinHandle<()>,
}

impl MockGemini {
    /// Bind to an ephemeral port and serve `responses` in order.
    ///
    /// Requests beyond the script get a 500.
    ///
    /// # Panics
    ///
    /// Panics if the loopback socket cannot be bound.
    pub async fn start(responses: Vec<MockResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");

        let state = MockState {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = Arc::clone(&state.requests);
        let app = Router::new().fallback(reply).with_state(state);

        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    /// API root to configure the client with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Record the request, then answer with the next scripted response.
async fn reply(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            Some((name.as_str().to_string(), value.to_str().ok()?.to_string()))
        })
        .collect();
    lock(&state.requests).push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers,
        body,
    });

    let next = lock(&state.responses).pop_front();
    next.map_or_else(
        || (StatusCode::INTERNAL_SERVER_ERROR, "no scripted response left").into_response(),
        IntoResponse::into_response,
    )
}
