//! Deterministic co-simulation driving and validation.
//!
//! This crate re-exports the engine ([`cosim_core`]) and the reference
//! simulated components ([`cosim_components`]) behind a single dependency.
//! A typical drive builds a [`runner::Runner`] from a model description, a
//! component factory and the tabular scenario data, then executes the
//! configured number of independent runs:
//!
//! ```rust,ignore
//! use cosim::components::feedthrough;
//! use cosim::loader;
//! use cosim::runner::RunnerBuilder;
//!
//! let runner = RunnerBuilder::new()
//!     .with_model(feedthrough::model_description())
//!     .with_factory(Box::new(feedthrough::FeedthroughFactory))
//!     .with_inputs(loader::table_from_csv(inputs_csv)?)
//!     .with_expected(loader::table_from_csv(expected_csv)?)
//!     .build()?;
//! let reports = runner.run_all();
//! ```

pub use cosim_core::component;
pub use cosim_core::errors;
pub use cosim_core::loader;
pub use cosim_core::runner;
pub use cosim_core::table;
pub use cosim_core::validation;
pub use cosim_core::value;
pub use cosim_core::variable;

pub use cosim_components::components;
