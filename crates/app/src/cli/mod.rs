pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Entries, Health, Init, Login, Seed, Serve};
