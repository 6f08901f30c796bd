//! In-process fake automation server for tests.
//!
//! [`FakeServer`] speaks enough of the WebDriver/Appium HTTP protocol to run
//! scripted UI flows without a device: sessions, element lookup by
//! accessibility id, class name and simple UiSelector expressions, clicks,
//! text entry, focus movement via the TAB key-code, and screenshots.
//! Clicks, key-codes and session deletion can be made to fail.
//!
//! Screens are described as a flat list of [`FakeElement`]s. An element can
//! reveal further elements when clicked, which is how navigation is modelled.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use base64::Engine;
use droid_protocol::{ELEMENT_KEY, KeyCode};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// Bytes served for every screenshot: a PNG signature and nothing else.
pub const FAKE_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

const EDIT_TEXT: &str = "android.widget.EditText";
const BUTTON: &str = "android.widget.Button";

/// An on-screen widget.
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
	pub class: String,
	pub description: Option<String>,
	pub text: String,
	/// Text entry fails with "invalid element state".
	pub rejects_input: bool,
	/// Clicks fail with "element not interactable".
	pub rejects_click: bool,
	/// Elements appended to the screen the first time this one is clicked.
	pub reveals: Vec<FakeElement>,
}

impl FakeElement {
	pub fn new(class: impl Into<String>) -> Self {
		Self {
			class: class.into(),
			..Self::default()
		}
	}

	pub fn edit_text() -> Self {
		Self::new(EDIT_TEXT)
	}

	pub fn button(text: impl Into<String>) -> Self {
		Self::new(BUTTON).text(text)
	}

	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.text = text.into();
		self
	}

	pub fn rejects_input(mut self) -> Self {
		self.rejects_input = true;
		self
	}

	pub fn rejects_click(mut self) -> Self {
		self.rejects_click = true;
		self
	}

	pub fn reveals(mut self, elements: Vec<FakeElement>) -> Self {
		self.reveals = elements;
		self
	}

	fn is_editable(&self) -> bool {
		self.class == EDIT_TEXT
	}

	fn label(&self) -> String {
		match &self.description {
			Some(d) => d.clone(),
			None if !self.text.is_empty() => self.text.clone(),
			None => self.class.clone(),
		}
	}
}

struct Node {
	id: String,
	element: FakeElement,
}

#[derive(Default)]
struct FakeState {
	nodes: Vec<Node>,
	next_element: u64,
	focused: Option<usize>,
	session: Option<String>,
	sessions_created: u32,
	sessions_deleted: u32,
	capabilities: Option<Value>,
	clicks: Vec<String>,
	keycodes: Vec<u32>,
	failing_keycodes: Vec<u32>,
	fail_delete: bool,
	screenshots: u32,
}

impl FakeState {
	fn push(&mut self, element: FakeElement) {
		self.next_element += 1;
		self.nodes.push(Node {
			id: format!("el-{}", self.next_element),
			element,
		});
	}

	fn index_of(&self, id: &str) -> Option<usize> {
		self.nodes.iter().position(|n| n.id == id)
	}
}

type Shared = Arc<Mutex<FakeState>>;

/// A running fake server bound to an ephemeral local port.
///
/// The server task is aborted on drop.
pub struct FakeServer {
	url: String,
	state: Shared,
	handle: JoinHandle<()>,
}

impl FakeServer {
	/// Starts a server whose screen initially shows `screen`.
	pub async fn start(screen: Vec<FakeElement>) -> Self {
		let mut state = FakeState::default();
		for element in screen {
			state.push(element);
		}
		let state: Shared = Arc::new(Mutex::new(state));

		let app = Router::new()
			.route("/session", post(create_session))
			.route("/session/{sid}", delete(delete_session))
			.route("/session/{sid}/element", post(find_element))
			.route("/session/{sid}/elements", post(find_elements))
			.route("/session/{sid}/element/active", get(active_element))
			.route("/session/{sid}/element/{eid}/click", post(click))
			.route("/session/{sid}/element/{eid}/value", post(send_keys))
			.route("/session/{sid}/element/{eid}/text", get(element_text))
			.route("/session/{sid}/appium/device/press_keycode", post(press_keycode))
			.route("/session/{sid}/screenshot", get(screenshot))
			.with_state(Arc::clone(&state));

		let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
			.await
			.expect("bind fake server");
		let addr = listener.local_addr().expect("fake server address");
		let handle = tokio::spawn(async move {
			let _ = axum::serve(listener, app).await;
		});

		Self {
			url: format!("http://{addr}"),
			state,
			handle,
		}
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	fn state(&self) -> MutexGuard<'_, FakeState> {
		lock(&self.state)
	}

	pub fn sessions_created(&self) -> u32 {
		self.state().sessions_created
	}

	pub fn sessions_deleted(&self) -> u32 {
		self.state().sessions_deleted
	}

	/// `alwaysMatch` capabilities of the most recent new-session request.
	pub fn capabilities(&self) -> Option<Value> {
		self.state().capabilities.clone()
	}

	/// Labels of clicked elements, in order.
	pub fn clicks(&self) -> Vec<String> {
		self.state().clicks.clone()
	}

	/// Makes every later press of `code` fail. The press is still recorded.
	pub fn fail_keycode(&self, code: u32) {
		self.state().failing_keycodes.push(code);
	}

	/// Makes session deletion fail; the session stays live.
	pub fn fail_delete(&self) {
		self.state().fail_delete = true;
	}

	/// Every key-code pressed, in order, including ones that failed.
	pub fn keycodes(&self) -> Vec<u32> {
		self.state().keycodes.clone()
	}

	pub fn screenshots(&self) -> u32 {
		self.state().screenshots
	}

	/// Current contents of the `n`th text field on screen.
	pub fn field_text(&self, n: usize) -> Option<String> {
		self.state()
			.nodes
			.iter()
			.filter(|node| node.element.is_editable())
			.nth(n)
			.map(|node| node.element.text.clone())
	}
}

impl Drop for FakeServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

fn lock(state: &Shared) -> MutexGuard<'_, FakeState> {
	state.lock().unwrap_or_else(|e| e.into_inner())
}

fn ok(value: Value) -> Response {
	Json(json!({ "value": value })).into_response()
}

fn fail(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
	let body = json!({ "value": { "error": error, "message": message.into(), "stacktrace": "" } });
	(status, Json(body)).into_response()
}

fn element_ref(id: &str) -> Value {
	json!({ ELEMENT_KEY: id })
}

fn check_session(state: &FakeState, sid: &str) -> Result<(), Response> {
	match &state.session {
		Some(active) if active == sid => Ok(()),
		_ => Err(fail(
			StatusCode::NOT_FOUND,
			"invalid session id",
			format!("session {sid} does not exist"),
		)),
	}
}

fn matches(element: &FakeElement, using: &str, value: &str) -> bool {
	match using {
		"accessibility id" => element.description.as_deref() == Some(value),
		"class name" => element.class == value,
		"-android uiautomator" => match parse_selector(value) {
			Some((method, needle)) if method == "descriptionContains" => {
				element.description.as_deref().is_some_and(|d| d.contains(&needle))
			}
			Some((method, needle)) if method == "textContains" => element.text.contains(&needle),
			_ => false,
		},
		_ => false,
	}
}

/// Parses `new UiSelector().method("arg")` into `(method, arg)`.
fn parse_selector(expr: &str) -> Option<(String, String)> {
	let call = expr.strip_prefix("new UiSelector().")?;
	let (method, rest) = call.split_once('(')?;
	let arg = rest.strip_suffix(')')?.strip_prefix('"')?.strip_suffix('"')?;
	Some((method.to_string(), arg.replace("\\\"", "\"").replace("\\\\", "\\")))
}

fn locator(body: &Value) -> (String, String) {
	let field = |name: &str| body.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
	(field("using"), field("value"))
}

async fn create_session(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
	let mut state = lock(&state);
	state.sessions_created += 1;
	let sid = format!("fake-session-{}", state.sessions_created);
	state.session = Some(sid.clone());
	state.capabilities = body.pointer("/capabilities/alwaysMatch").cloned();
	let capabilities = state.capabilities.clone().unwrap_or(Value::Null);
	ok(json!({ "sessionId": sid, "capabilities": capabilities }))
}

async fn delete_session(State(state): State<Shared>, Path(sid): Path<String>) -> Response {
	let mut state = lock(&state);
	if let Err(resp) = check_session(&state, &sid) {
		return resp;
	}
	if state.fail_delete {
		return fail(StatusCode::INTERNAL_SERVER_ERROR, "unknown error", "session teardown failed");
	}
	state.session = None;
	state.sessions_deleted += 1;
	ok(Value::Null)
}

async fn find_element(State(state): State<Shared>, Path(sid): Path<String>, Json(body): Json<Value>) -> Response {
	let state = lock(&state);
	if let Err(resp) = check_session(&state, &sid) {
		return resp;
	}
	let (using, value) = locator(&body);
	match state.nodes.iter().find(|n| matches(&n.element, &using, &value)) {
		Some(node) => ok(element_ref(&node.id)),
		None => fail(
			StatusCode::NOT_FOUND,
			"no such element",
			format!("An element could not be located on the page using the given search parameters ({using}={value})"),
		),
	}
}

async fn find_elements(State(state): State<Shared>, Path(sid): Path<String>, Json(body): Json<Value>) -> Response {
	let state = lock(&state);
	if let Err(resp) = check_session(&state, &sid) {
		return resp;
	}
	let (using, value) = locator(&body);
	let found: Vec<Value> = state
		.nodes
		.iter()
		.filter(|n| matches(&n.element, &using, &value))
		.map(|n| element_ref(&n.id))
		.collect();
	ok(Value::Array(found))
}

async fn active_element(State(state): State<Shared>, Path(sid): Path<String>) -> Response {
	let state = lock(&state);
	if let Err(resp) = check_session(&state, &sid) {
		return resp;
	}
	match state.focused {
		Some(idx) => ok(element_ref(&state.nodes[idx].id)),
		None => fail(StatusCode::NOT_FOUND, "no such element", "no element has focus"),
	}
}

async fn click(State(state): State<Shared>, Path((sid, eid)): Path<(String, String)>) -> Response {
	let mut state = lock(&state);
	if let Err(resp) = check_session(&state, &sid) {
		return resp;
	}
	let Some(idx) = state.index_of(&eid) else {
		return fail(StatusCode::NOT_FOUND, "stale element reference", format!("{eid} is gone"));
	};

	if state.nodes[idx].element.rejects_click {
		return fail(StatusCode::BAD_REQUEST, "element not interactable", "element cannot be clicked");
	}

	let label = state.nodes[idx].element.label();
	state.clicks.push(label);
	if state.nodes[idx].element.is_editable() {
		state.focused = Some(idx);
	}
	let revealed = std::mem::take(&mut state.nodes[idx].element.reveals);
	for element in revealed {
		state.push(element);
	}
	ok(Value::Null)
}

async fn send_keys(
	State(state): State<Shared>,
	Path((sid, eid)): Path<(String, String)>,
	Json(body): Json<Value>,
) -> Response {
	let mut state = lock(&state);
	if let Err(resp) = check_session(&state, &sid) {
		return resp;
	}
	let Some(idx) = state.index_of(&eid) else {
		return fail(StatusCode::NOT_FOUND, "stale element reference", format!("{eid} is gone"));
	};
	if state.nodes[idx].element.rejects_input {
		return fail(StatusCode::BAD_REQUEST, "invalid element state", "element does not accept input");
	}

	let text = body.get("text").and_then(Value::as_str).unwrap_or_default().to_string();
	state.nodes[idx].element.text.push_str(&text);
	state.focused = Some(idx);
	ok(Value::Null)
}

async fn element_text(State(state): State<Shared>, Path((sid, eid)): Path<(String, String)>) -> Response {
	let state = lock(&state);
	if let Err(resp) = check_session(&state, &sid) {
		return resp;
	}
	match state.index_of(&eid) {
		Some(idx) => ok(Value::String(state.nodes[idx].element.text.clone())),
		None => fail(StatusCode::NOT_FOUND, "stale element reference", format!("{eid} is gone")),
	}
}

async fn press_keycode(State(state): State<Shared>, Path(sid): Path<String>, Json(body): Json<Value>) -> Response {
	let mut state = lock(&state);
	if let Err(resp) = check_session(&state, &sid) {
		return resp;
	}
	let Some(code) = body.get("keycode").and_then(Value::as_u64) else {
		return fail(StatusCode::BAD_REQUEST, "invalid argument", "keycode is required");
	};
	let code = code as u32;
	state.keycodes.push(code);
	if state.failing_keycodes.contains(&code) {
		return fail(StatusCode::INTERNAL_SERVER_ERROR, "unknown error", format!("key-code {code} was not delivered"));
	}

	if KeyCode(code) == KeyCode::TAB {
		let start = state.focused.map_or(0, |i| i + 1);
		let next = (start..state.nodes.len()).find(|&i| state.nodes[i].element.is_editable());
		if next.is_some() {
			state.focused = next;
		}
	}
	ok(Value::Null)
}

async fn screenshot(State(state): State<Shared>, Path(sid): Path<String>) -> Response {
	let mut state = lock(&state);
	if let Err(resp) = check_session(&state, &sid) {
		return resp;
	}
	state.screenshots += 1;
	ok(Value::String(base64::prelude::BASE64_STANDARD.encode(FAKE_PNG)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_uiselector_expressions() {
		assert_eq!(
			parse_selector(r#"new UiSelector().descriptionContains("Sign Up")"#),
			Some(("descriptionContains".into(), "Sign Up".into()))
		);
		assert_eq!(
			parse_selector(r#"new UiSelector().textContains("a \"b\"")"#),
			Some(("textContains".into(), "a \"b\"".into()))
		);
		assert_eq!(parse_selector("new UiSelector().clickable(true)"), None);
	}

	#[test]
	fn matching_by_strategy() {
		let el = FakeElement::button("Create Account").description("Create Account button");
		assert!(matches(&el, "class name", BUTTON));
		assert!(matches(&el, "accessibility id", "Create Account button"));
		assert!(!matches(&el, "accessibility id", "Create Account"));
		assert!(matches(&el, "-android uiautomator", r#"new UiSelector().textContains("Account")"#));
		assert!(matches(&el, "-android uiautomator", r#"new UiSelector().descriptionContains("button")"#));
		assert!(!matches(&el, "xpath", "//*"));
	}
}
