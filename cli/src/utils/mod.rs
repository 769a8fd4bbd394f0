// agricredit/cli/src/utils/mod.rs

pub mod output;
