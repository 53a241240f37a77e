//! The classifier capability and its process-lifetime cache.
//!
//! The pretrained digit classifier is consumed as an opaque capability: a
//! forward pass over the fixed input tensor producing a 10-class score row.
//! [`ModelCache`] owns the exactly-once loading of that capability. The first
//! access performs I/O and deserializes the artifact; every later access
//! returns the same shared handle without touching storage again.

use crate::core::errors::DigitError;
use crate::core::inference::OrtInfer;
use crate::core::tensor::{Tensor2D, Tensor4D};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::info;

/// A shared, read-only handle to a loaded classifier.
pub type ModelHandle = Arc<dyn ClassifierModel>;

/// The opaque classifier capability.
///
/// Implementations run a single forward pass over a `1 x 28 x 28 x 1` input
/// tensor and return the raw score matrix (`batch x classes`). The production
/// implementation is [`OrtInfer`]; tests substitute deterministic stubs so
/// that pipeline correctness is decoupled from model quality.
pub trait ClassifierModel: Send + Sync + std::fmt::Debug {
    /// Runs inference on the given input tensor.
    ///
    /// # Arguments
    ///
    /// * `input` - The preprocessed input tensor.
    ///
    /// # Returns
    ///
    /// A Result containing the raw output scores or a DigitError.
    fn infer(&self, input: &Tensor4D) -> Result<Tensor2D, DigitError>;
}

impl ClassifierModel for OrtInfer {
    fn infer(&self, input: &Tensor4D) -> Result<Tensor2D, DigitError> {
        self.infer_2d(input)
    }
}

/// Loader closure producing a classifier handle.
type ModelLoader = Box<dyn Fn() -> Result<ModelHandle, DigitError> + Send + Sync>;

/// Process-lifetime cache for the loaded classifier.
///
/// The cache has exactly two states: unloaded (initial) and loaded (terminal
/// for the lifetime of the process). The first call to [`ModelCache::get`]
/// runs the loader under a mutex, so concurrent first-access attempts
/// converge on a single load; once the slot is filled, reads are lock-free
/// and have no side effects. There is no transition back to unloaded; a
/// reload requires a new process.
///
/// A failed load is surfaced to the caller and leaves the cache unloaded, so
/// a later call observes the same storage state and fails the same way until
/// an operator intervenes.
pub struct ModelCache {
    loader: ModelLoader,
    slot: OnceLock<ModelHandle>,
    load_lock: Mutex<()>,
}

impl ModelCache {
    /// Creates a cache that loads an ONNX artifact from the given path.
    ///
    /// # Arguments
    ///
    /// * `common` - Common builder configuration (session knobs, model name).
    /// * `model_path` - The path to the ONNX model file.
    pub fn from_common(
        common: &crate::core::config::CommonBuilderConfig,
        model_path: &Path,
    ) -> Self {
        let common = common.clone();
        let path = model_path.to_path_buf();
        Self::with_loader(move || {
            let engine = OrtInfer::from_common(&common, &path)?;
            Ok(Arc::new(engine) as ModelHandle)
        })
    }

    /// Creates a cache around an arbitrary loader.
    ///
    /// This is the injection seam for tests: a stub loader can count its own
    /// invocations and return a deterministic classifier.
    ///
    /// # Arguments
    ///
    /// * `loader` - Closure that loads the classifier.
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn() -> Result<ModelHandle, DigitError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            slot: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// Returns the loaded classifier handle, loading it on first access.
    ///
    /// # Returns
    ///
    /// A Result containing the shared handle or the loader's DigitError.
    pub fn get(&self) -> Result<ModelHandle, DigitError> {
        // Fast path: already loaded, no locking.
        if let Some(model) = self.slot.get() {
            return Ok(model.clone());
        }

        let _guard = self.load_lock.lock().map_err(|_| {
            DigitError::inference("model cache lock poisoned by a previous panic")
        })?;

        // A concurrent caller may have finished the load while we waited.
        if let Some(model) = self.slot.get() {
            return Ok(model.clone());
        }

        let model = (self.loader)()?;
        info!("classifier artifact loaded");
        let _ = self.slot.set(model.clone());
        Ok(model)
    }

    /// Returns true if the artifact has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl std::fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCache")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct NullModel;

    impl ClassifierModel for NullModel {
        fn infer(&self, _input: &Tensor4D) -> Result<Tensor2D, DigitError> {
            Ok(Tensor2D::zeros((1, 10)))
        }
    }

    #[test]
    fn test_loader_runs_exactly_once_across_sequential_gets() {
        let loads = Arc::new(AtomicUsize::new(0));
        let probe = loads.clone();
        let cache = ModelCache::with_loader(move || {
            probe.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(NullModel) as ModelHandle)
        });

        assert!(!cache.is_loaded());
        for _ in 0..5 {
            cache.get().unwrap();
        }
        assert!(cache.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_first_access_converges_on_a_single_load() {
        let loads = Arc::new(AtomicUsize::new(0));
        let probe = loads.clone();
        let cache = Arc::new(ModelCache::with_loader(move || {
            probe.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(NullModel) as ModelHandle)
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.get().map(|_| ()))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_leaves_cache_unloaded() {
        let cache = ModelCache::with_loader(|| {
            Err(DigitError::artifact_load(
                "missing.onnx",
                "model file not found",
                None,
                None::<std::io::Error>,
            ))
        });

        assert!(matches!(
            cache.get(),
            Err(DigitError::ArtifactLoad { .. })
        ));
        assert!(!cache.is_loaded());
    }
}
