use serde_json::Value;
use tauri::State;

use crate::state::AppState;

/// Route a bridge call to its registered operation.
///
/// Failures are reported inside the envelope, so this never returns `Err`.
#[tauri::command]
pub async fn dispatch(
    state: State<'_, AppState>,
    name: String,
    args: Option<Vec<Value>>,
) -> Result<Value, String> {
    Ok(state
        .dispatcher()
        .dispatch(&name, args.unwrap_or_default())
        .await)
}
