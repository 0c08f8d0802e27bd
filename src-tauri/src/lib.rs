use std::sync::{Arc, Mutex};

use tauri_plugin_opener::OpenerExt;

use arbor_core::detail::{detail_for, NodeDetail};
use arbor_suggest::{Assistant, ChatMessage, LlmGenerator};
use arbor_viz::scene::Scene;
use arbor_viz::viewport::Viewport;
use arbor_viz::{NodeId, TreeView};

/// Managed state wrapping the renderer's layout arena.
struct ViewState(Mutex<TreeView<'static>>);

/// Currently displayed node; defaults to the tree root, updated only by
/// node clicks.
struct SelectionState(Mutex<NodeId>);

/// Append-only chat transcript for this session.
struct TranscriptState(Mutex<Vec<ChatMessage>>);

struct AssistantState(Arc<Assistant<LlmGenerator>>);

const GREETING: &str =
    "Hi! Describe your situation, and I can recommend the right option for you.";

#[tauri::command]
fn get_taxonomy() -> Result<serde_json::Value, String> {
    serde_json::to_value(arbor_core::builtin_taxonomy()).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_scene(view: tauri::State<'_, ViewState>) -> Scene {
    view.0.lock().unwrap().scene()
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ClickResponse {
    scene: Scene,
    /// False when the click hit a node no longer visible (stale event).
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<NodeDetail>,
}

#[tauri::command]
fn click_node(
    id: usize,
    view: tauri::State<'_, ViewState>,
    selection: tauri::State<'_, SelectionState>,
) -> ClickResponse {
    let mut view = view.0.lock().unwrap();
    match view.click(id) {
        Some(outcome) => {
            *selection.0.lock().unwrap() = outcome.selected;
            let detail = view.data(outcome.selected).map(detail_for);
            ClickResponse {
                scene: view.scene(),
                changed: true,
                detail,
            }
        }
        None => ClickResponse {
            scene: view.scene(),
            changed: false,
            detail: None,
        },
    }
}

#[tauri::command]
fn resize(width: f64, height: f64, view: tauri::State<'_, ViewState>) -> Scene {
    let mut view = view.0.lock().unwrap();
    view.resize(width, height);
    view.scene()
}

#[tauri::command]
fn pan(dx: f64, dy: f64, view: tauri::State<'_, ViewState>) -> Viewport {
    let mut view = view.0.lock().unwrap();
    view.viewport.pan(dx, dy);
    view.viewport
}

#[tauri::command]
fn zoom(factor: f64, cx: f64, cy: f64, view: tauri::State<'_, ViewState>) -> Viewport {
    let mut view = view.0.lock().unwrap();
    view.viewport.zoom_at(factor, cx, cy);
    view.viewport
}

#[tauri::command]
fn get_detail(
    view: tauri::State<'_, ViewState>,
    selection: tauri::State<'_, SelectionState>,
) -> Result<NodeDetail, String> {
    let view = view.0.lock().unwrap();
    let id = *selection.0.lock().unwrap();
    view.data(id)
        .map(detail_for)
        .ok_or_else(|| format!("unknown node id: {id}"))
}

#[tauri::command]
fn get_transcript(transcript: tauri::State<'_, TranscriptState>) -> Vec<ChatMessage> {
    transcript.0.lock().unwrap().clone()
}

/// Submit one user message. Local rejections (blank input, request already
/// in flight) come back as `Err` and leave the transcript untouched; every
/// other outcome appends the user message and the assistant's reply.
#[tauri::command]
async fn send_message(
    text: String,
    assistant: tauri::State<'_, AssistantState>,
    transcript: tauri::State<'_, TranscriptState>,
) -> Result<Vec<ChatMessage>, String> {
    let reply = assistant.0.respond(&text).await?;
    let mut log = transcript.0.lock().unwrap();
    log.push(ChatMessage::user(text.trim()));
    log.push(reply);
    Ok(log.clone())
}

#[tauri::command]
fn get_ai_settings() -> Result<serde_json::Value, String> {
    let settings = arbor_core::AiSettings::from_env();
    // Mask the API key — only report whether it's set.
    Ok(serde_json::json!({
        "provider": settings.provider,
        "model": settings.model,
        "hasKey": !settings.api_key.is_empty(),
        "configured": arbor_core::ai_configured(&settings),
    }))
}

/// Open a selected node's external reference in the system browser.
#[tauri::command]
fn open_reference(app: tauri::AppHandle, url: String) -> Result<(), String> {
    app.opener()
        .open_url(url, None::<&str>)
        .map_err(|e| e.to_string())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let root = arbor_core::builtin_taxonomy();
    let settings = arbor_core::AiSettings::from_env();
    let assistant = Assistant::new(root, settings.clone(), LlmGenerator::new(settings));

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(ViewState(Mutex::new(TreeView::new(root, 800.0, 600.0))))
        .manage(SelectionState(Mutex::new(0)))
        .manage(TranscriptState(Mutex::new(vec![ChatMessage::assistant(
            GREETING,
        )])))
        .manage(AssistantState(Arc::new(assistant)))
        .invoke_handler(tauri::generate_handler![
            get_taxonomy,
            get_scene,
            click_node,
            resize,
            pan,
            zoom,
            get_detail,
            get_transcript,
            send_message,
            get_ai_settings,
            open_reference,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
