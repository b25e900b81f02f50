//! Lowering of parsed syntax trees into the owned data model.

pub mod go;
