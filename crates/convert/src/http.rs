//! HTTP client for the remote conversion service.

use crate::config::ConverterConfig;
use crate::{check_pdf_payload, Converter, PPTX_MIME};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use slidepick_core::ConversionError;

/// Longest response text carried into an error message.
const MAX_MESSAGE_LEN: usize = 512;

/// Converts presentations by POSTing them to a conversion endpoint.
///
/// Each call is a single blocking request bounded by the configured timeout.
/// Transport failures and 429/502/503/504 responses are retried up to
/// `max_retries` times with linear backoff; any other non-200 response fails
/// immediately.
#[derive(Debug)]
pub struct HttpConverter {
    client: Client,
    endpoint: Url,
    config: ConverterConfig,
}

/// Outcome of one request.
enum AttemptError {
    Status { status: u16, message: String },
    Transport(String),
    Payload(ConversionError),
}

impl AttemptError {
    fn is_transient(&self) -> bool {
        match self {
            AttemptError::Transport(_) => true,
            AttemptError::Status { status, .. } => matches!(*status, 429 | 502 | 503 | 504),
            AttemptError::Payload(_) => false,
        }
    }

    fn into_error(self, attempts: u32) -> ConversionError {
        match self {
            AttemptError::Status { status, message } => ConversionError::Rejected { status, message },
            AttemptError::Transport(message) => ConversionError::Unavailable { attempts, message },
            AttemptError::Payload(e) => e,
        }
    }
}

impl HttpConverter {
    /// Create a converter for the configured endpoint.
    pub fn new(config: ConverterConfig) -> Result<Self, ConversionError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            ConversionError::Config(format!("invalid endpoint '{}': {}", config.endpoint, e))
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConversionError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    fn send_once(&self, presentation: &[u8]) -> Result<Vec<u8>, AttemptError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/octet-stream")
            .header("Content-Type-Actual", PPTX_MIME)
            .body(presentation.to_vec())
            .send()
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().unwrap_or_default();
            return Err(AttemptError::Status {
                status: status.as_u16(),
                message: truncate(message.trim()),
            });
        }

        let body = response
            .bytes()
            .map_err(|e| AttemptError::Transport(e.to_string()))?;
        check_pdf_payload(&body).map_err(AttemptError::Payload)?;

        Ok(body.to_vec())
    }
}

impl Converter for HttpConverter {
    fn convert(&self, presentation: &[u8]) -> Result<Vec<u8>, ConversionError> {
        let max_attempts = self.config.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            log::info!(
                "Converting {} byte(s) via {} (attempt {}/{})",
                presentation.len(),
                self.endpoint,
                attempt,
                max_attempts
            );

            match self.send_once(presentation) {
                Ok(pdf) => {
                    log::info!("Received {} byte(s) of PDF", pdf.len());
                    return Ok(pdf);
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.config.backoff_for(attempt);
                    log::warn!(
                        "Conversion attempt {} failed ({}), retrying in {:?}",
                        attempt,
                        e.into_error(attempt),
                        delay
                    );
                    std::thread::sleep(delay);
                }
                Err(e) => return Err(e.into_error(attempt)),
            }
        }
    }
}

fn truncate(message: &str) -> String {
    match message.char_indices().nth(MAX_MESSAGE_LEN) {
        Some((idx, _)) => format!("{}...", &message[..idx]),
        None => message.to_string(),
    }
}
