//! Operation tree transformers, their pipeline and registry

pub mod insert_between;

pub use insert_between::InsertBetween;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{TransformError, TransformResult};
use crate::operation::OperationPtr;

/// Configuration options for transformers
///
/// Holds the enabled flag plus free-form string options that individual
/// transformers may interpret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformerConfig {
    /// Whether this transformer is enabled
    pub enabled: bool,
    /// Transformer-specific options
    pub options: HashMap<String, String>,
}

impl TransformerConfig {
    /// Create a new, enabled configuration
    pub fn new() -> Self {
        Self {
            enabled: true,
            options: HashMap::new(),
        }
    }

    /// Create a disabled configuration
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            options: HashMap::new(),
        }
    }

    /// Set a configuration option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Get a configuration option
    pub fn get_option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(|s| s.as_str())
    }
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A rewriting pass over the operation tree
///
/// Transformers own no tree state, so one instance can be shared and run on
/// many plans.
///
/// # Examples
/// - Ordering the feature extrusions of every extruder plan
/// - Inserting travel routes between disconnected operations
pub trait PrintOperationTransformer: Send + Sync {
    /// Get the name/identifier of this transformer
    fn name(&self) -> &str;

    /// Get a description of what this transformer does
    fn description(&self) -> &str;

    /// Rewrite the tree rooted at `operation` in place
    fn process(&self, operation: &OperationPtr) -> TransformResult<()>;

    /// Check if this transformer is enabled
    fn is_enabled(&self) -> bool {
        self.config().enabled
    }

    /// Get the configuration for this transformer
    fn config(&self) -> &TransformerConfig {
        static DEFAULT_CONFIG: std::sync::OnceLock<TransformerConfig> = std::sync::OnceLock::new();
        DEFAULT_CONFIG.get_or_init(TransformerConfig::new)
    }
}

/// Arc-wrapped transformer for sharing
pub type TransformerHandle = Arc<dyn PrintOperationTransformer>;

/// Ordered list of transformers applied to a plan
///
/// # Example
/// ```ignore
/// let mut pipeline = TransformerPipeline::new();
/// pipeline.register(Arc::new(ExtruderPlanScheduler::new()));
/// pipeline.register(Arc::new(TravelMovesInserter::new(scene)));
///
/// pipeline.process(&print_plan)?;
/// ```
pub struct TransformerPipeline {
    transformers: Vec<TransformerHandle>,
    config: TransformerConfig,
}

impl TransformerPipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            transformers: Vec::new(),
            config: TransformerConfig::new(),
        }
    }

    /// Register a transformer; transformers run in registration order
    pub fn register(&mut self, transformer: TransformerHandle) -> &mut Self {
        self.transformers.push(transformer);
        self
    }

    /// Register multiple transformers at once
    pub fn register_all(&mut self, transformers: Vec<TransformerHandle>) -> &mut Self {
        self.transformers.extend(transformers);
        self
    }

    /// Get the number of registered transformers
    pub fn transformer_count(&self) -> usize {
        self.transformers.len()
    }

    /// Get a transformer by index
    pub fn get_transformer(&self, index: usize) -> Option<&TransformerHandle> {
        self.transformers.get(index)
    }

    /// Get a transformer by name
    pub fn get_transformer_by_name(&self, name: &str) -> Option<&TransformerHandle> {
        self.transformers.iter().find(|t| t.name() == name)
    }

    /// List all registered transformers as (name, description, enabled)
    pub fn list_transformers(&self) -> Vec<(&str, &str, bool)> {
        self.transformers
            .iter()
            .map(|t| (t.name(), t.description(), t.is_enabled()))
            .collect()
    }

    /// Run every enabled transformer on `operation`, stopping at the first error
    pub fn process(&self, operation: &OperationPtr) -> TransformResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        for transformer in &self.transformers {
            if !transformer.is_enabled() {
                tracing::debug!("Skipping disabled transformer '{}'", transformer.name());
                continue;
            }

            tracing::debug!("Running transformer '{}'", transformer.name());
            if let Err(e) = transformer.process(operation) {
                tracing::warn!("Transformer '{}' failed: {}", transformer.name(), e);
                return Err(e);
            }
        }

        Ok(())
    }

    /// Clear all transformers from the pipeline
    pub fn clear(&mut self) {
        self.transformers.clear();
    }

    /// Get mutable access to the pipeline configuration
    pub fn config_mut(&mut self) -> &mut TransformerConfig {
        &mut self.config
    }

    /// Get the pipeline configuration
    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }
}

impl Default for TransformerPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of transformer factories, for building pipelines by name
pub struct TransformerRegistry {
    factories: HashMap<String, Arc<dyn Fn() -> TransformerHandle + Send + Sync>>,
}

impl TransformerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a transformer factory
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> TransformerHandle + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Create a transformer by name
    pub fn create(&self, name: &str) -> Option<TransformerHandle> {
        self.factories.get(name).map(|f| f())
    }

    /// Create a pipeline with the given transformer names, in order
    pub fn create_pipeline(&self, names: &[&str]) -> TransformResult<TransformerPipeline> {
        let mut pipeline = TransformerPipeline::new();

        for name in names {
            match self.create(name) {
                Some(transformer) => {
                    pipeline.register(transformer);
                }
                None => {
                    return Err(TransformError::UnknownTransformer(name.to_string()));
                }
            }
        }

        Ok(pipeline)
    }

    /// List all registered transformer names, sorted
    pub fn list_registered(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
