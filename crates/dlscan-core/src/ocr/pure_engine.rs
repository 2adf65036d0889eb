//! Native OCR engine using `pure-onnx-ocr`.

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use image::GenericImageView;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{OcrProvider, TextDocument, TextRegion, sort_by_reading_order};

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: Mutex<pure_onnx_ocr::engine::OcrEngine>,
    keep_unk: bool,
}

impl PureOcrEngine {
    /// Create an engine from the model files named in the configuration.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = config.model_path(&config.detection_model);
        let rec_path = config.model_path(&config.recognition_model);
        let dict_path = config.model_path(&config.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            require_file(path)?;
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::Unavailable(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine: Mutex::new(engine),
            keep_unk: config.keep_unk,
        })
    }

    /// Create an engine from a model directory with default file names.
    pub fn from_dir(model_dir: &Path) -> Result<Self, OcrError> {
        Self::from_config(&OcrConfig {
            model_dir: model_dir.to_path_buf(),
            ..OcrConfig::default()
        })
    }

    fn clean_text(&self, text: &str) -> String {
        if self.keep_unk {
            text.to_string()
        } else {
            text.replace("[UNK]", " ").trim().to_string()
        }
    }
}

impl OcrProvider for PureOcrEngine {
    fn name(&self) -> &str {
        "pure-onnx-ocr"
    }

    fn recognize(&self, image: &[u8]) -> Result<TextDocument, OcrError> {
        let start = Instant::now();

        let image = image::load_from_memory(image)
            .map_err(|e| OcrError::Document(e.to_string()))?;
        let (width, height) = image.dimensions();
        debug!("Decoded image: {}x{}", width, height);

        let results = {
            let engine = self
                .engine
                .lock()
                .map_err(|_| OcrError::Service("engine lock poisoned".to_string()))?;
            engine
                .run_from_image(&image)
                .map_err(|e| OcrError::Service(format!("pure-onnx-ocr: {}", e)))?
        };

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut regions: Vec<TextRegion> = results
            .iter()
            .map(|r| TextRegion {
                rect: polygon_to_rect(&r.bounding_box),
                text: self.clean_text(&r.text),
                confidence: r.confidence,
            })
            .filter(|r| !r.text.is_empty())
            .collect();

        sort_by_reading_order(&mut regions);

        info!(
            "OCR complete: {} lines in {}ms",
            regions.len(),
            start.elapsed().as_millis()
        );

        Ok(TextDocument::new(
            regions.into_iter().map(|r| r.text).collect(),
        ))
    }
}

fn require_file(path: &Path) -> Result<(), OcrError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(OcrError::Unavailable(format!(
            "model file not found: {}",
            path.display()
        )))
    }
}

/// Axis-aligned bounds of a detection polygon.
fn polygon_to_rect(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32, f32, f32) {
    polygon.exterior().coords().fold(
        (f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        |(min_x, min_y, max_x, max_y), c| {
            let (x, y) = (c.x as f32, c.y as f32);
            (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
        },
    )
}
