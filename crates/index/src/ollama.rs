//! Embedder backed by an Ollama server's `/api/embeddings` endpoint.
//!
//! The call is blocking: query encoding is the one latency-bearing step of a
//! turn and is treated as an opaque synchronous call. Transport failures,
//! non-success statuses, and malformed bodies all surface as
//! [`EmbeddingError`] so the assistant can degrade to its fallback reply.

use std::time::Duration;

use campusbuddy_core::embedding::Embedder;
use campusbuddy_core::error::EmbeddingError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    dimensions: usize,
    timeout: Duration,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    /// Create an embedder with a known output width.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::NotConfigured(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimensions,
            timeout,
            client,
        })
    }

    /// Create an embedder and learn its width by encoding a probe text.
    pub fn probe(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let mut embedder = Self::new(base_url, model, 0, timeout)?;
        let vector = embedder.request("dimension probe")?;
        embedder.dimensions = vector.len();
        debug!(model = %embedder.model, dimensions = embedder.dimensions, "Probed Ollama embedding width");
        Ok(embedder)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/api/embeddings", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingError::Timeout(self.timeout.as_secs())
                } else {
                    EmbeddingError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Embedding service returned error");
            return Err(EmbeddingError::Request(format!(
                "{url} returned HTTP {}",
                status.as_u16()
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        if parsed.embedding.is_empty() {
            return Err(EmbeddingError::InvalidResponse(
                "response contained no embedding".into(),
            ));
        }
        Ok(parsed.embedding)
    }
}

impl Embedder for OllamaEmbedder {
    fn name(&self) -> &str {
        "ollama"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.request(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Port 9 (discard) is not served on loopback in test environments.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let embedder =
            OllamaEmbedder::new("http://localhost:11434/", "nomic-embed-text", 768, Duration::from_secs(1))
                .unwrap();
        assert_eq!(embedder.base_url, "http://localhost:11434");
        assert_eq!(embedder.dimensions(), 768);
        assert_eq!(embedder.model(), "nomic-embed-text");
    }

    #[test]
    fn unreachable_server_is_an_embedding_error() {
        let embedder =
            OllamaEmbedder::new(UNREACHABLE, "nomic-embed-text", 768, Duration::from_secs(2)).unwrap();
        let err = embedder.encode("pizza").unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::Request(_) | EmbeddingError::Timeout(_)
        ));
    }

    #[test]
    fn probe_fails_without_server() {
        let result = OllamaEmbedder::probe(UNREACHABLE, "nomic-embed-text", Duration::from_secs(2));
        assert!(result.is_err());
    }
}
