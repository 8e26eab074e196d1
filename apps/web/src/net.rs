use futures::channel::mpsc::UnboundedSender;
use log::{error, info, warn};
use reservoir_map_web::catchup::{DirectoryEntry, FetchError, LatestStatus, ReservoirDirectory};
use reservoir_map_web::config::DashboardConfig;
use reservoir_map_web::dashboard::{Inbound, StreamStatus};
use reservoir_map_web::telemetry::ReservoirId;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CloseEvent, Event, MessageEvent, Request, RequestInit, RequestMode, Response, WebSocket};

/// GETs `url` and returns the body as text. Non-2xx answers are errors.
pub async fn fetch_text(url: &str) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Transport("no window".into()))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts).map_err(transport)?;
    let response_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?;
    let response = response_value.dyn_into::<Response>().map_err(transport)?;
    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let body = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    body.as_string()
        .ok_or_else(|| FetchError::Decode(format!("{url} did not return text")))
}

fn transport(value: JsValue) -> FetchError {
    FetchError::Transport(format!("{value:?}"))
}

/// Directory and latest-status endpoints of the backend.
pub struct HttpDirectory {
    config: DashboardConfig,
}

impl HttpDirectory {
    pub const fn new(config: DashboardConfig) -> Self {
        Self { config }
    }
}

impl ReservoirDirectory for HttpDirectory {
    async fn reservoirs(&self) -> Result<Vec<DirectoryEntry>, FetchError> {
        let body = fetch_text(&self.config.directory_url()).await?;
        serde_json::from_str(&body).map_err(|err| FetchError::Decode(err.to_string()))
    }

    async fn latest(&self, id: &ReservoirId) -> Result<LatestStatus, FetchError> {
        let body = fetch_text(&self.config.latest_url(id.as_str())).await?;
        serde_json::from_str(&body).map_err(|err| FetchError::Decode(err.to_string()))
    }
}

fn push(tx: &UnboundedSender<Inbound>, inbound: Inbound) {
    if tx.unbounded_send(inbound).is_err() {
        warn!("dashboard consumer is gone, dropping inbound item");
    }
}

/// Opens the telemetry WebSocket and forwards everything it emits into `tx`.
/// There is no reconnect; a closed or failed stream only changes the status.
pub fn open_stream(url: &str, tx: &UnboundedSender<Inbound>) {
    let socket = match WebSocket::new(url) {
        Ok(socket) => socket,
        Err(err) => {
            error!("cannot open telemetry stream {url}: {err:?}");
            push(tx, Inbound::Stream(StreamStatus::Failed));
            return;
        }
    };
    info!("connecting to telemetry stream {url}");

    let onopen = Closure::<dyn FnMut()>::new({
        let tx = tx.clone();
        move || push(&tx, Inbound::Stream(StreamStatus::Live))
    });
    socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    let onmessage = Closure::<dyn FnMut(MessageEvent)>::new({
        let tx = tx.clone();
        move |event: MessageEvent| match event.data().as_string() {
            Some(text) => push(&tx, Inbound::Message(text)),
            None => warn!("ignoring non-text telemetry frame"),
        }
    });
    socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    let onerror = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        error!("telemetry stream error: {}", event.type_());
    });
    socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    let onclose = Closure::<dyn FnMut(CloseEvent)>::new({
        let tx = tx.clone();
        move |event: CloseEvent| {
            warn!(
                "telemetry stream closed (code {}): {}",
                event.code(),
                event.reason()
            );
            let status = if event.was_clean() {
                StreamStatus::Closed
            } else {
                StreamStatus::Failed
            };
            push(&tx, Inbound::Stream(status));
        }
    });
    socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    onclose.forget();
}
