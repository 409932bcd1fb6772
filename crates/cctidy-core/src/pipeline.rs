//! End-to-end processing of one file's bytes.
//!
//! Decode, rewrite (sweep for settings files, path cleaning for the root
//! file), canonicalize, encode. Sweeping always runs before
//! canonicalization; callers compare the returned bytes against the input
//! to decide whether anything needs writing.

use tokio_util::sync::CancellationToken;

use crate::canon;
use crate::root;
use crate::sweep::{
    self,
    SweepContext,
    SweepResult,
};
use crate::util::check::PathChecker;
use crate::util::error::{
    Error,
    ErrorContext as _,
};

/// Sweeps and canonicalizes one settings file.
pub async fn process_settings(ctx: &SweepContext, bytes: &[u8]) -> Result<(Vec<u8>, SweepResult), Error> {
    let mut settings: serde_json::Value =
        serde_json::from_slice(bytes).context("settings file is not valid JSON")?;

    let result = sweep::sweep_settings(ctx, &mut settings).await?;
    canon::canonicalize(&mut settings, true);

    Ok((canon::to_canonical_bytes(&settings)?, result))
}

/// Cleans and canonicalizes the root config file.
///
/// The sweeper pipeline is skipped here, and so is array sorting: the host
/// writes some root-file arrays in a meaningful order.
pub async fn process_root_config(
    checker: &dyn PathChecker,
    token: &CancellationToken,
    bytes: &[u8],
) -> Result<Vec<u8>, Error> {
    let mut config: serde_json::Value =
        serde_json::from_slice(bytes).context("root config file is not valid JSON")?;

    root::clean_root_config(checker, token, &mut config).await?;
    canon::canonicalize(&mut config, false);

    canon::to_canonical_bytes(&config)
}
