mod dtime;
mod duuid;

pub use dtime::DTime;
pub use duuid::DUuid;
