pub mod active_space;
pub mod ao2mo;
pub mod atom;
pub mod basis;
pub mod config;
pub mod error;
pub mod fcidump;
pub mod hf;
pub mod integrals;
pub mod localize;
pub mod matio;
pub mod molecule;
pub mod pairing;
pub mod periodic_table;

mod diis;

pub use error::Error;
