//! Offline commands: the catalog and the payment sheet.
//!
//! # Usage
//!
//! ```bash
//! # List what the shop sells
//! blink-shop catalog
//!
//! # Preview the payment sheet for three stickers
//! blink-shop sheet --sku sticker --qty 3
//! ```

use std::io::Write;

use tracing::debug;

use super::{CommandError, SelectionArgs, load_session};
use crate::render;

/// List the catalog.
///
/// # Errors
///
/// Returns error if the configuration is invalid or output fails.
pub fn catalog(out: &mut impl Write, args: &SelectionArgs) -> Result<(), CommandError> {
    let (_, session) = load_session(args)?;
    render::catalog(out, session.selected())?;
    Ok(())
}

/// Show the payment sheet without contacting the server.
///
/// # Errors
///
/// Returns error if the configuration is invalid or output fails.
pub fn sheet(out: &mut impl Write, args: &SelectionArgs) -> Result<(), CommandError> {
    let (_, session) = load_session(args)?;
    debug!(checkout_url = %session.checkout_url(), "Rendering payment sheet");
    render::sheet(out, &session)?;
    Ok(())
}
