mod seed;
mod stats;

pub use seed::cmd_seed;
pub use stats::cmd_stats;
