//! Scan orchestration: payload decoding, OCR call and field extraction.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{error, info, warn};

use crate::error::{OcrError, Result, ScanError};
use crate::models::config::ExtractionConfig;
#[cfg(feature = "native")]
use crate::models::config::DlscanConfig;
use crate::models::license::{ExtractionResult, LicenseInfo};
use crate::ocr::{OcrProvider, TextDocument};

use super::{LicenseExtractor, RuleBasedExtractor};

/// Scans license images into structured fields.
///
/// The OCR collaborator is injected at construction. A scanner without one
/// still extracts from text but fails every image scan.
pub struct LicenseScanner {
    provider: Option<Arc<dyn OcrProvider>>,
    extractor: RuleBasedExtractor,
    timeout: Option<Duration>,
}

impl LicenseScanner {
    /// Create a scanner around an OCR collaborator.
    pub fn new(provider: Arc<dyn OcrProvider>) -> Self {
        Self {
            provider: Some(provider),
            extractor: RuleBasedExtractor::new(),
            timeout: None,
        }
    }

    /// Create a scanner with no OCR collaborator.
    pub fn unconfigured() -> Self {
        Self {
            provider: None,
            extractor: RuleBasedExtractor::new(),
            timeout: None,
        }
    }

    /// Create a scanner backed by the native OCR engine.
    ///
    /// If the engine cannot be loaded the scanner is returned unconfigured,
    /// so image scans report the collaborator as unavailable.
    #[cfg(feature = "native")]
    pub fn from_config(config: &DlscanConfig) -> Self {
        let scanner = match crate::ocr::PureOcrEngine::from_config(&config.ocr) {
            Ok(engine) => Self::new(Arc::new(engine)),
            Err(e) => {
                warn!("OCR engine not initialized: {}", e);
                Self::unconfigured()
            }
        };

        let scanner = scanner.with_extraction_config(config.extraction.clone());
        match config.ocr.timeout_ms {
            Some(ms) => scanner.with_timeout(Duration::from_millis(ms)),
            None => scanner,
        }
    }

    /// Use the given extraction settings.
    pub fn with_extraction_config(mut self, config: ExtractionConfig) -> Self {
        self.extractor = self.extractor.with_config(config);
        self
    }

    /// Replace the extraction pipeline.
    pub fn with_extractor(mut self, extractor: RuleBasedExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Bound the OCR call by a deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether an OCR collaborator is configured.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Scan a base64-encoded image.
    pub fn scan_base64(&self, payload: &str) -> ExtractionResult {
        self.try_scan_base64(payload).into()
    }

    /// Scan raw image bytes.
    pub fn scan_bytes(&self, image: &[u8]) -> ExtractionResult {
        self.try_scan_bytes(image).into()
    }

    /// Extract fields from text that was already recognized.
    pub fn extract_from_text(&self, text: &str) -> ExtractionResult {
        ExtractionResult::success(self.extractor.extract_from_text(text))
    }

    /// Scan a base64-encoded image, returning typed errors.
    pub fn try_scan_base64(&self, payload: &str) -> Result<LicenseInfo> {
        let image = decode_payload(payload).inspect_err(|e| warn!("{}", e))?;
        self.try_scan_bytes(&image)
    }

    /// Scan raw image bytes, returning typed errors.
    pub fn try_scan_bytes(&self, image: &[u8]) -> Result<LicenseInfo> {
        let start = Instant::now();
        info!("Scanning image ({} bytes)", image.len());

        let document = self.recognize(image).map_err(|e| {
            error!("OCR failed: {}", e);
            ScanError::from(e)
        })?;
        info!("OCR returned {} lines", document.lines.len());
        if document.is_empty() {
            warn!("OCR returned no text");
        }

        let info = self.extractor.extract(&document);
        info!(
            "Scan complete in {}ms, confidence {:.2}",
            start.elapsed().as_millis(),
            info.confidence_score
        );

        Ok(info)
    }

    fn recognize(&self, image: &[u8]) -> std::result::Result<TextDocument, OcrError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| OcrError::Unavailable("no OCR provider configured".to_string()))?;

        let Some(timeout) = self.timeout else {
            return provider.recognize(image);
        };

        let (tx, rx) = mpsc::channel();
        let worker = Arc::clone(provider);
        let image = image.to_vec();
        thread::spawn(move || {
            // The receiver is gone if the deadline already passed
            let _ = tx.send(worker.recognize(&image));
        });

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(OcrError::Timeout(timeout.as_millis() as u64)),
            Err(RecvTimeoutError::Disconnected) => Err(OcrError::Service(format!(
                "{} worker exited without a result",
                provider.name()
            ))),
        }
    }
}

/// Decode a base64 payload, tolerating whitespace and a `data:` URL prefix.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let trimmed = payload.trim();
    let encoded = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| ScanError::InputDecode("malformed data URL".to_string()))?,
        None => trimmed,
    };

    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(ScanError::InputDecode("empty payload".to_string()));
    }

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ScanError::InputDecode(e.to_string()))
}
