//! Researcher resolution for `research submit`.
//!
//! A report names the worker who filed it. The request's own
//! `researcherUsername` is authoritative; the defaults below only fill in a
//! request that leaves it empty:
//!
//! 1. `--as <username>`: explicit per-command override
//! 2. `researcherUsername` in the request file itself
//! 3. `TIDELINE_RESEARCHER` env var: process/session level
//! 4. `researcher` in `~/.tideline/config.toml`: global default

use std::env;

use crate::config::Config;

/// Environment variable naming the acting researcher.
pub const RESEARCHER_ENV: &str = "TIDELINE_RESEARCHER";

/// Error message shown when the researcher cannot be resolved.
pub const RESEARCHER_REQUIRED: &str = "researcher required: pass --as <username>, \
    set TIDELINE_RESEARCHER, add `researcher = \"...\"` to ~/.tideline/config.toml, \
    or set researcherUsername in the request";

/// Resolve the acting researcher from the tiered resolution chain.
///
/// `from_request` is the username carried by the request payload. Only `--as`
/// outranks it; env and config apply when it is empty.
pub fn resolve_researcher(
    explicit: Option<&str>,
    config: &Config,
    from_request: &str,
) -> Result<String, String> {
    resolve_with(
        explicit,
        env::var(RESEARCHER_ENV).ok(),
        config,
        from_request,
    )
}

fn resolve_with(
    explicit: Option<&str>,
    from_env: Option<String>,
    config: &Config,
    from_request: &str,
) -> Result<String, String> {
    // 1. Explicit --as flag.
    if let Some(name) = explicit {
        return Ok(name.to_string());
    }

    // 2. The request itself.
    if !from_request.is_empty() {
        return Ok(from_request.to_string());
    }

    // 3. TIDELINE_RESEARCHER environment variable.
    if let Some(name) = from_env.filter(|s| !s.is_empty()) {
        return Ok(name);
    }

    // 4. ~/.tideline/config.toml.
    if let Some(name) = config.researcher.as_deref().filter(|s| !s.is_empty()) {
        return Ok(name.to_string());
    }

    Err(RESEARCHER_REQUIRED.to_string())
}
