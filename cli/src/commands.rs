pub mod ensemble;
pub mod short_burst;
pub mod sweep;

mod io;
