//! ONNX Runtime embedding provider.
//!
//! Loads a local sentence-transformer (MiniLM-class) via the `ort` crate
//! (v2): hash tokenization, batch-of-one inference, mean pooling, L2
//! normalization.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use sieve_core::errors::{EmbeddingError, SieveResult};
use sieve_core::traits::IEmbeddingProvider;
use tracing::debug;

/// ONNX-based embedding provider.
///
/// `Session::run` needs `&mut self`, so the session sits in a Mutex to
/// satisfy the `&self` trait surface.
pub struct OnnxProvider {
    session: Mutex<Session>,
    dimensions: usize,
    model_name: String,
}

impl OnnxProvider {
    /// Load an ONNX model from the given path.
    ///
    /// # Errors
    /// Returns `EmbeddingError::ModelLoadFailed` if the file is missing or
    /// the session cannot be built.
    pub fn load(model_path: &str, dimensions: usize) -> SieveResult<Self> {
        let path = Path::new(model_path);
        if !path.exists() {
            return Err(EmbeddingError::ModelLoadFailed {
                path: model_path.to_string(),
                reason: "model file not found".to_string(),
            }
            .into());
        }

        let load_err = |e: ort::Error| EmbeddingError::ModelLoadFailed {
            path: model_path.to_string(),
            reason: e.to_string(),
        };
        let session = Session::builder()
            .map_err(load_err)?
            .with_intra_threads(2)
            .map_err(load_err)?
            .commit_from_file(model_path)
            .map_err(load_err)?;

        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx-model")
            .to_string();

        debug!(model = %model_name, dims = dimensions, "ONNX model loaded");

        Ok(Self {
            session: Mutex::new(session),
            dimensions,
            model_name,
        })
    }

    fn infer(&self, text: &str) -> SieveResult<Vec<f32>> {
        let token_ids = Self::tokenize(text);
        let seq_len = token_ids.len();

        let input_ids: Vec<i64> = token_ids.iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = vec![1i64; seq_len];

        let ids_tensor = Self::sequence_tensor(seq_len, input_ids)?;
        let mask_tensor = Self::sequence_tensor(seq_len, attention_mask)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("session lock poisoned: {e}"),
            })?;

        let outputs = session
            .run(ort::inputs![ids_tensor, mask_tensor])
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let (_name, output) =
            outputs
                .iter()
                .next()
                .ok_or_else(|| EmbeddingError::InferenceFailed {
                    reason: "no output tensor".to_string(),
                })?;

        let (shape, data) =
            output
                .try_extract_tensor::<f32>()
                .map_err(|e| EmbeddingError::InferenceFailed {
                    reason: format!("tensor extraction failed: {e}"),
                })?;

        // Mean pool across the sequence dimension.
        let embedding = match shape[..] {
            // [batch=1, seq, dims]
            [_, seq, dims] => {
                let (seq, dims) = (seq as usize, dims as usize);
                let mut pooled = vec![0.0f32; dims];
                for row in data.chunks_exact(dims).take(seq) {
                    for (p, x) in pooled.iter_mut().zip(row) {
                        *p += x;
                    }
                }
                for v in &mut pooled {
                    *v /= seq as f32;
                }
                pooled
            }
            // [batch=1, dims], already pooled.
            [_, dims] => data[..dims as usize].to_vec(),
            _ => {
                return Err(EmbeddingError::InferenceFailed {
                    reason: format!("unexpected output shape: {shape:?}"),
                }
                .into());
            }
        };

        // L2 normalize and fit to the configured width.
        let mut result = embedding;
        let norm: f32 = result.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut result {
                *v /= norm;
            }
        }
        result.resize(self.dimensions, 0.0);
        Ok(result)
    }

    /// Wrap a token sequence as a `[1, seq_len]` input tensor.
    fn sequence_tensor(seq_len: usize, data: Vec<i64>) -> SieveResult<Tensor<i64>> {
        let tensor = Tensor::from_array((vec![1i64, seq_len as i64], data)).map_err(|e| {
            EmbeddingError::InferenceFailed {
                reason: format!("tensor creation error: {e}"),
            }
        })?;
        Ok(tensor)
    }

    /// Hash words into a BERT-style vocab range, bracketed by [CLS]/[SEP].
    fn tokenize(text: &str) -> Vec<u32> {
        if text.is_empty() {
            return vec![101, 102];
        }
        let mut ids = vec![101u32];
        for word in text.split(|c: char| !c.is_alphanumeric() && c != '_') {
            if word.is_empty() {
                continue;
            }
            let mut h: u32 = 0x811c9dc5;
            for b in word.to_lowercase().as_bytes() {
                h ^= *b as u32;
                h = h.wrapping_mul(0x01000193);
            }
            ids.push(1 + (h % 29999));
        }
        ids.push(102);
        ids
    }
}

impl IEmbeddingProvider for OnnxProvider {
    fn embed(&self, text: &str) -> SieveResult<Vec<f32>> {
        self.infer(text)
    }

    fn embed_batch(&self, texts: &[String]) -> SieveResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.infer(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model_name
    }

    fn is_available(&self) -> bool {
        true
    }
}
