// Core modules implementing decode dispatch, path lookup, and error modeling.
pub mod decode;
pub mod error;
pub mod path;
