use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use futures::channel::mpsc::{self, UnboundedReceiver};
use futures::StreamExt;
use log::{error, info, LevelFilter};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use reservoir_map_web::boundary::BoundaryLayer;
use reservoir_map_web::catchup::catch_up;
use reservoir_map_web::config::{ConfigOverrides, DashboardConfig};
use reservoir_map_web::dashboard::{Dashboard, Inbound};
use reservoir_map_web::{console, view};
use wasm_bindgen_futures::spawn_local;

mod net;

fn main() -> io::Result<()> {
    console::init(LevelFilter::Info);

    let config = read_config();
    info!(
        "dashboard starting: api {}, stream {}",
        config.api_base, config.stream_url
    );

    let dashboard = Rc::new(RefCell::new(Dashboard::new()));
    let (tx, rx) = mpsc::unbounded::<Inbound>();

    spawn_local(consume(rx, dashboard.clone()));
    spawn_local(load_boundary(config.boundary_url.clone(), dashboard.clone()));

    net::open_stream(&config.stream_url, &tx);

    spawn_local({
        let directory = net::HttpDirectory::new(config);
        async move {
            catch_up(&directory, |record| {
                if tx.unbounded_send(Inbound::Record(record)).is_err() {
                    error!("dashboard consumer is gone, catch-up record dropped");
                }
            })
            .await;
        }
    });

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let dashboard = dashboard.clone();
        move |event| dashboard.borrow_mut().handle_key(event.code)
    });

    terminal.draw_web(move |f| {
        let mut dashboard = dashboard.borrow_mut();
        dashboard.tick(js_sys::Date::now() / 1000.0);
        view::render(f, &dashboard);
    });

    Ok(())
}

/// Defaults, overridden by `?api=…&ws=…&boundary=…` on the page URL.
fn read_config() -> DashboardConfig {
    let overrides = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
        .map(|params| ConfigOverrides {
            api: params.get("api"),
            stream: params.get("ws"),
            boundary: params.get("boundary"),
        })
        .unwrap_or_default();
    DashboardConfig::default().with_overrides(overrides)
}

/// Single consumer: each inbound item is applied in delivery order.
async fn consume(mut rx: UnboundedReceiver<Inbound>, dashboard: Rc<RefCell<Dashboard>>) {
    while let Some(inbound) = rx.next().await {
        dashboard.borrow_mut().apply(inbound);
    }
}

async fn load_boundary(url: String, dashboard: Rc<RefCell<Dashboard>>) {
    let text = match net::fetch_text(&url).await {
        Ok(text) => text,
        Err(err) => {
            error!("boundary data {url} unavailable: {err}");
            return;
        }
    };

    match BoundaryLayer::from_geojson(&text) {
        Ok(layer) => dashboard.borrow_mut().set_boundary(layer),
        Err(err) => error!("boundary data {url} rejected: {err}"),
    }
}
