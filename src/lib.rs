// Library root
// -----------
// The binary (`main.rs`) only parses arguments and sets up logging; the
// registration/submission flow lives here so it can be tested.
//
// Module responsibilities:
// - `api`: HTTP calls to the hiring gateway and the `Submitter` seam.
// - `classify`: odd/even question rule for the registration number.
// - `cli`: clap argument definitions.
// - `config`: merges flags, env vars and `bfhl.toml` into `Settings`.
// - `sql`: loads the final SQL answer.
// - `ui`: spinners, prompts and console helpers.
// - `workflow`: the end-to-end run with its two-attempt submission.
pub mod api;
pub mod classify;
pub mod cli;
pub mod config;
pub mod sql;
pub mod ui;
pub mod workflow;

#[cfg(test)]
mod test_support;
