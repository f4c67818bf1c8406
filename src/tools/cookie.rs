//! Session check tool.

use crate::api::XhsApi;
use crate::session;

/// Executes the check_cookie tool.
///
/// Returns `cookie有效` or `cookie已失效`; probe failures are folded into the
/// latter, so this never errors.
pub async fn execute_check_cookie(api: &dyn XhsApi) -> crate::Result<String> {
    tracing::info!("check_cookie");
    let status = session::probe(api).await;
    Ok(status.message().to_string())
}
