// Module structure for the gclog parser.

// Core
pub mod error;
pub mod event;
pub mod parser;
pub mod model;
pub mod reader;

// Process wiring
pub mod conf;
pub mod runtime;

pub use error::{GcLogError, GcLogResult};
pub use event::{Category, GcEvent, GcEventType, Generation, HeapOccupancy};
pub use model::{GcModel, Stats};
pub use parser::GcFormat;
pub use reader::GcLogReader;
