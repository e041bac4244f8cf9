//! A small linear text classifier that decides whether a short description is a soup.
//!
//! Training counts word tokens, weights them by inverse document frequency and fits a
//! hinge-loss linear model with stochastic gradient descent. Fitted classifiers can be
//! evaluated on held-out data, persisted with [`ModelStore`] and reused for scoring.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ladle::{evaluate, Classifier, Record, RecordSet};
//!
//! let training = RecordSet::new(vec![
//!     Record::new("tomato bisque", true),
//!     Record::new("chicken noodle", true),
//!     Record::new("leather boots", false),
//!     Record::new("wool sweater", false),
//! ]);
//!
//! let classifier = Classifier::builder()
//!     .with_max_epochs(5)
//!     .with_alpha(1e-3)
//!     .with_seed(42)
//!     .fit(&training)?;
//!
//! let test = RecordSet::new(vec![
//!     Record::new("chicken bisque", true),
//!     Record::new("wool boots", false),
//! ]);
//! let report = evaluate(&classifier, &test)?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```
//!
//! # Persistence
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ladle::{ModelStore, ScoringService, Settings, StaticSource};
//!
//! let store = ModelStore::new_default();
//! let classifier = store.load()?;
//! let service = ScoringService::new(classifier, StaticSource::default(), Settings::from_env());
//! let labels = service.predict_all(&["split pea soup", "rain jacket"])?;
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod dataset;
pub mod evaluation;
pub mod model_store;
pub mod prompt;
pub mod scoring;
pub mod settings;
pub mod workflow;

pub use classifier::{Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, SgdConfig};
pub use dataset::{read_records, DatasetError, Record, RecordReader, RecordSet};
pub use evaluation::{evaluate, ClassMetrics, ClassificationReport};
pub use model_store::{ModelError, ModelStore};
pub use prompt::{Confirm, FixedAnswer, StdinPrompt};
pub use scoring::{CsvRecordSource, RecordSource, ScoringError, ScoringService, SourceError, StaticSource};
pub use settings::Settings;

/// Initializes `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
