use tracing::debug;

use crate::error::Error;
use crate::format::Format;

/// Decodes `input` as `from` and re-encodes it as `to`.
///
/// The whole output is built in memory, so a failure in either step never
/// leaves a partial document behind.
pub fn convert(input: &[u8], from: Format, to: Format) -> Result<Vec<u8>, Error> {
    let value = from.decode(input)?;
    debug!(%from, kind = value.kind(), "decoded {} bytes", input.len());
    let output = to.encode(&value)?;
    debug!(%to, "encoded {} bytes", output.len());
    Ok(output)
}
