//! Conf module: reader configuration model and loading.

pub mod model;
pub mod load;

pub use model::ReaderConfig;
