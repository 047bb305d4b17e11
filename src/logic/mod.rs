//! Bracket engine logic: seeding, bracket building, advancement, validation.

mod advancement;
mod builder;
mod double_elimination;
mod lifecycle;
mod roster;
mod round_robin;
mod seeding;
mod single_elimination;
mod standings;
mod validation;

pub use advancement::{apply_result, start_match, AppliedResult};
pub use builder::build_bracket;
pub use lifecycle::{delete_bracket, generate_bracket, generate_bracket_with_rng, submit_result};
pub use roster::{import_participants, read_participants};
pub use seeding::{assign_seeds, assign_seeds_with_rng, generate_seed_order, SeedingMethod};
pub use standings::{standings, Standing};
pub use validation::{validate_result, wins_needed};
