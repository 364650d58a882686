pub mod distractors;

pub use distractors::{option_set, sample_distractors, shuffle};
