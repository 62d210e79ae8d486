//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use medbill_core::models::config::MedbillConfig;
use medbill_core::{Document, DocumentKind, MedbillError, OcrProvider, PdfError, PureOcrEngine};

/// Load configuration from `--config`, else the default location, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<MedbillConfig> {
    if let Some(path) = config_path {
        return Ok(MedbillConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(MedbillConfig::from_file(&default_path)?)
    } else {
        Ok(MedbillConfig::default())
    }
}

/// Load the OCR engine from `--model-dir` or the configured directory.
pub fn load_engine(
    model_dir: Option<&PathBuf>,
    config: &MedbillConfig,
) -> anyhow::Result<PureOcrEngine> {
    let model_dir = model_dir.unwrap_or(&config.ocr.model_dir);

    if !config.ocr.models_present(model_dir) {
        anyhow::bail!(
            "OCR models not found at {}.\n\n\
             Place {}, {} and {} there, or pass --model-dir.",
            model_dir.display(),
            config.ocr.detection_model,
            config.ocr.recognition_model,
            config.ocr.dictionary
        );
    }

    PureOcrEngine::from_dir(model_dir, &config.ocr)
        .map_err(|e| anyhow::anyhow!("Failed to load OCR models: {}", e))
}

/// OCR engine loaded on first use. A failed load is remembered so it is
/// attempted at most once per run.
pub struct LazyEngine<'a> {
    model_dir: Option<&'a PathBuf>,
    config: &'a MedbillConfig,
    engine: Option<Result<PureOcrEngine, String>>,
}

impl<'a> LazyEngine<'a> {
    pub fn new(model_dir: Option<&'a PathBuf>, config: &'a MedbillConfig) -> Self {
        Self {
            model_dir,
            config,
            engine: None,
        }
    }

    pub fn get(&mut self) -> anyhow::Result<&dyn OcrProvider> {
        let (model_dir, config) = (self.model_dir, self.config);
        let loaded = self
            .engine
            .get_or_insert_with(|| load_engine(model_dir, config).map_err(|e| e.to_string()));

        match loaded {
            Ok(engine) => Ok(&*engine),
            Err(msg) => Err(anyhow::anyhow!("{}", msg)),
        }
    }
}

/// Read a bill file, loading the OCR engine only when the file needs it.
///
/// Images always need OCR. PDFs are first read for embedded text and fall
/// back to OCR of their page images.
pub fn load_document(path: &Path, engine: &mut LazyEngine<'_>) -> anyhow::Result<Document> {
    if DocumentKind::from_path(path).is_some_and(|k| k.needs_ocr()) {
        return Ok(Document::from_path(path, Some(engine.get()?))?);
    }

    match Document::from_path(path, None) {
        Err(MedbillError::Pdf(PdfError::NoText)) => {
            info!("{} has no embedded text, using OCR", path.display());
            Ok(Document::from_path(path, Some(engine.get()?))?)
        }
        other => Ok(other?),
    }
}
