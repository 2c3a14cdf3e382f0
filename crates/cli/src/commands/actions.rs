//! Inspect what a Blink server advertises.
//!
//! # Usage
//!
//! ```bash
//! blink-shop actions --base-url https://blinks.example.com
//! ```

use std::io::Write;

use blink_checkout_client::BlinkClient;
use blink_checkout_core::{ActionGetResponse, ActionsJson};
use tracing::info;

use super::{CommandError, SelectionArgs, load_session};
use crate::render;

/// Fetch the manifest and checkout metadata and describe them.
///
/// # Errors
///
/// Returns error if either request fails or a response has the wrong shape.
pub async fn list(out: &mut impl Write, args: &SelectionArgs) -> Result<(), CommandError> {
    let (config, session) = load_session(args)?;
    let client = BlinkClient::new(&config)?;

    let (manifest, metadata) = tokio::try_join!(
        client.fetch_manifest(&session),
        client.fetch_metadata(&session)
    )?;
    info!(
        manifest_ms = manifest.trace.response.elapsed_ms,
        metadata_ms = metadata.trace.response.elapsed_ms,
        "Fetched action documents"
    );

    let manifest: ActionsJson = manifest.decode().map_err(|source| CommandError::Decode {
        endpoint: "actions.json",
        source,
    })?;
    let metadata: ActionGetResponse =
        metadata.decode().map_err(|source| CommandError::Decode {
            endpoint: "GET /api/actions/checkout",
            source,
        })?;

    render::actions(out, &session, &manifest, &metadata)?;
    Ok(())
}
