pub mod alerts;
pub mod ratios;
pub mod rubric;
