//! WASM snapshot client using the browser `fetch` API

use crate::config::Config;
use crate::core::{Completion, FetchError, FetchTicket, SnapshotSource};
use crate::fetch_state::FetchStatus;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, Request, RequestInit, RequestMode, Response};

/// Shared completion buffer: fetch futures push, the app drains in update()
pub type CompletionBuffer = Rc<RefCell<VecDeque<Completion>>>;

/// Resolve the data URL: `window.__fork_choice_url`, else `<origin>/data`
pub fn browser_config() -> Config {
    let explicit = js_sys::eval("window.__fork_choice_url")
        .ok()
        .and_then(|v| v.as_string())
        .filter(|url| !url.is_empty());
    match explicit {
        Some(data_url) => Config {
            data_url,
            ..Config::default()
        },
        None => web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .map(|origin| Config::for_origin(&origin))
            .unwrap_or_default(),
    }
}

/// WASM fetch client
pub struct WasmFetchClient {
    url: String,
    timeout_ms: u32,
    buffer: CompletionBuffer,
    status: Rc<RefCell<FetchStatus>>,
    waker: Rc<dyn Fn()>,
}

impl WasmFetchClient {
    pub fn new(config: &Config, waker: Rc<dyn Fn()>) -> Self {
        let timeout_ms = config.request_timeout_ms();
        info!(url = %config.data_url, timeout_ms, "Snapshot fetcher ready");
        Self {
            url: config.data_url.clone(),
            timeout_ms,
            buffer: Rc::new(RefCell::new(VecDeque::new())),
            status: Rc::new(RefCell::new(FetchStatus::Idle)),
            waker,
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.status.borrow().clone()
    }
}

impl SnapshotSource for WasmFetchClient {
    fn request(&mut self, ticket: FetchTicket) {
        *self.status.borrow_mut() = FetchStatus::Loading;
        let url = self.url.clone();
        let timeout_ms = self.timeout_ms;
        let buffer = self.buffer.clone();
        let status = self.status.clone();
        let waker = self.waker.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = fetch_text(&url, timeout_ms).await;
            *status.borrow_mut() = match &outcome {
                Ok(_) => FetchStatus::Ok,
                Err(e) => FetchStatus::Error(e.to_string()),
            };
            debug!(seq = ticket.seq, ok = outcome.is_ok(), "Fetch finished");
            buffer.borrow_mut().push_back(Completion { ticket, outcome });
            waker();
        });
    }

    fn drain(&mut self) -> Vec<Completion> {
        self.buffer.borrow_mut().drain(..).collect()
    }
}

/// GET `url`, aborting once `timeout_ms` has passed
async fn fetch_text(url: &str, timeout_ms: u32) -> Result<String, FetchError> {
    let signal = AbortSignal::timeout_with_u32(timeout_ms);
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);
    opts.set_signal(Some(&signal));
    let request = Request::new_with_str_and_init(url, &opts).map_err(transport)?;

    let window = web_sys::window().ok_or_else(|| FetchError::Transport("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(transport)?;
    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?
        .as_string()
        .ok_or_else(|| FetchError::Transport("response body is not text".into()))
}

fn transport(e: JsValue) -> FetchError {
    FetchError::Transport(format!("{:?}", e))
}
