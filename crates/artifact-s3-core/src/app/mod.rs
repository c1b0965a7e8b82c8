//! App - application layer
//!
//! Combines the domain and the ports into the step itself.
//!
//! # Components
//! - **inputs**: InputResolver, Environment snapshot
//! - **assembler**: ConfigAssembler / RequestBuilder
//! - **orchestrator**: UploadOrchestrator (the single uploader call)
//! - **reporter**: Reporter (outputs, warnings, failure state)
//! - **runner**: `run`, wiring all of the above in order

pub mod assembler;
pub mod inputs;
pub mod orchestrator;
pub mod reporter;
pub mod runner;

pub use self::assembler::{Assembled, assemble};
pub use self::inputs::{Environment, InputResolver, RawInputs};
pub use self::orchestrator::UploadOrchestrator;
pub use self::reporter::{Reporter, RunStatus};
pub use self::runner::run;
