pub mod analysis;
pub mod deriver;
