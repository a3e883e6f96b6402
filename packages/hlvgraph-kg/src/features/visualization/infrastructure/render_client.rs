//! Remote graph rendering
//!
//! Instance sub-graphs are drawn by the RDF Grapher web service: the Turtle
//! document is posted as a form (`rdf`, `from=ttl`, `to=png`) and the response
//! body is the PNG image.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::RenderConfig;
use crate::errors::{KgError, Result};
use crate::shared::utils::write_atomic;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Error)]
pub enum RenderError {
    /// Connect failure, timeout or HTTP 5xx; worth one more attempt
    #[error("transient failure: {0}")]
    Transient(String),

    #[error("{0}")]
    Permanent(String),
}

impl RenderError {
    pub fn is_transient(&self) -> bool {
        matches!(self, RenderError::Transient(_))
    }
}

/// Turns a Turtle document into a PNG image
pub trait ImageRenderer {
    fn render_png(&self, turtle: &str) -> std::result::Result<Vec<u8>, RenderError>;
}

/// RDF Grapher HTTP client
#[derive(Debug, Clone)]
pub struct RdfGrapherClient {
    client: Client,
    endpoint: String,
}

impl RdfGrapherClient {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KgError::Render {
                path: config.endpoint.clone().into(),
                message: format!("cannot create HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

fn classify(err: reqwest::Error) -> RenderError {
    if err.is_timeout() || err.is_connect() {
        RenderError::Transient(err.to_string())
    } else {
        RenderError::Permanent(err.to_string())
    }
}

impl ImageRenderer for RdfGrapherClient {
    fn render_png(&self, turtle: &str) -> std::result::Result<Vec<u8>, RenderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("rdf", turtle), ("from", "ttl"), ("to", "png")])
            .send()
            .map_err(classify)?;

        let status = response.status();
        if status.is_server_error() {
            return Err(RenderError::Transient(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(RenderError::Permanent(format!("HTTP {}", status)));
        }

        let body = response.bytes().map_err(classify)?;
        if !body.starts_with(PNG_SIGNATURE) {
            return Err(RenderError::Permanent(format!(
                "response is not a PNG image ({} bytes)",
                body.len()
            )));
        }
        debug!(bytes = body.len(), "image rendered");
        Ok(body.to_vec())
    }
}

/// Run `op`, and run it once more if the first failure was transient
pub fn with_single_retry<T, F>(mut op: F) -> std::result::Result<T, RenderError>
where
    F: FnMut() -> std::result::Result<T, RenderError>,
{
    match op() {
        Err(err) if err.is_transient() => {
            warn!(error = %err, "render failed, retrying once");
            op()
        }
        other => other,
    }
}

/// Render and write the image. On failure nothing is written and the error
/// names the target path.
pub fn render_to_file(renderer: &dyn ImageRenderer, turtle: &str, path: &Path) -> Result<()> {
    let png = with_single_retry(|| renderer.render_png(turtle)).map_err(|e| KgError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write_atomic(path, |w| {
        w.write_all(&png)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Replays a fixed sequence of outcomes
    struct ScriptedRenderer {
        outcomes: RefCell<Vec<std::result::Result<Vec<u8>, RenderError>>>,
        calls: RefCell<usize>,
    }

    impl ScriptedRenderer {
        fn new(mut outcomes: Vec<std::result::Result<Vec<u8>, RenderError>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: RefCell::new(outcomes),
                calls: RefCell::new(0),
            }
        }
    }

    impl ImageRenderer for ScriptedRenderer {
        fn render_png(&self, _turtle: &str) -> std::result::Result<Vec<u8>, RenderError> {
            *self.calls.borrow_mut() += 1;
            self.outcomes
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(RenderError::Permanent("exhausted".into())))
        }
    }

    fn png() -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(b"data");
        bytes
    }

    #[test]
    fn test_retries_once_on_transient() {
        let renderer = ScriptedRenderer::new(vec![
            Err(RenderError::Transient("timeout".into())),
            Ok(png()),
        ]);
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("instance/a_b_d.png");

        render_to_file(&renderer, "", &path).unwrap();
        assert_eq!(*renderer.calls.borrow(), 2);
        assert_eq!(std::fs::read(&path).unwrap(), png());
    }

    #[test]
    fn test_no_second_retry() {
        let renderer = ScriptedRenderer::new(vec![
            Err(RenderError::Transient("HTTP 503".into())),
            Err(RenderError::Transient("HTTP 503".into())),
            Ok(png()),
        ]);
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a_b_d.png");

        let err = render_to_file(&renderer, "", &path).unwrap_err();
        assert_eq!(*renderer.calls.borrow(), 2);
        assert!(err.to_string().contains("a_b_d.png"));
        assert!(!path.exists());
    }

    #[test]
    fn test_permanent_error_not_retried() {
        let renderer =
            ScriptedRenderer::new(vec![Err(RenderError::Permanent("HTTP 400".into())), Ok(png())]);
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a_b_d.png");

        assert!(render_to_file(&renderer, "", &path).is_err());
        assert_eq!(*renderer.calls.borrow(), 1);
    }
}
