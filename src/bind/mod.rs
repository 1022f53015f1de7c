//! Binding generation: everything between a loaded symbol table and the
//! text of the generated artifacts.
//!
//! - [`printer`]: indenting text buffers
//! - [`preamble`]: fixed artifact headers and footers
//! - [`partition`]: target vs. external types, once-only tracking
//! - [`convert`]: per-type conversions across the boundary
//! - [`emit`]: per-declaration emitters
//! - [`imports`]: packages the glue actually names
//! - [`output`]: flushing buffers to disk

pub mod codec;
pub mod convert;
pub mod emit;
pub mod errors;
pub mod handle;
pub mod imports;
pub mod output;
pub mod partition;
pub mod preamble;
pub mod printer;
pub mod section;

pub use convert::{BindContext, Conversion, ResolveError};
pub use errors::{BindError, ErrorList, GenerateError};
pub use handle::{HandleConfig, HandleKind};
pub use imports::GoImports;
pub use partition::{Emitted, TargetSet};
pub use printer::Printer;
pub use section::{Section, SECTION_ORDER};
