// Copyright (c) 2024 Mike Tsao

//! Reports which build of this crate is running. Prefers a version-control
//! identifier baked in at build time, then falls back to the crate version.

// https://stackoverflow.com/a/65972328/344467
/// A string that's useful for displaying build information to end users.
pub fn app_version() -> &'static str {
    option_env!("GIT_DESCRIBE")
        .or(option_env!("GIT_REV_PARSE"))
        .unwrap_or(env!("CARGO_PKG_VERSION"))
}
