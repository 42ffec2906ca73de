//! End-to-end view scenarios.
//!
//! Most tests drive the views through a scripted transport that replays
//! canned responses and records every request, so the tests can assert on
//! exactly what went over the wire. The last test runs against the live
//! mock server over ureq.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mock_server::{MockState, CLIENT_ID};
use parking_lot::Mutex;
use petboard::{DashboardScreen, DashboardView, DetailScreen, DetailView, Session, Transport, TransportError};
use petboard_core::{
    AgeBracket, Credentials, HttpMethod, HttpRequest, HttpResponse, PetfinderClient, TypeFilter, ViewError,
    ViewState,
};
use tokio_util::sync::CancellationToken;

const TOKEN_OK: &str = r#"{"token_type":"Bearer","expires_in":3600,"access_token":"tok-1"}"#;

type Hook = Box<dyn Fn(&HttpRequest) + Send + Sync>;

#[derive(Default)]
struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    on_request: Option<Hook>,
}

impl ScriptedTransport {
    fn new(replies: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    fn ok(replies: Vec<(u16, &str)>) -> Self {
        Self::new(
            replies
                .into_iter()
                .map(|(status, body)| Ok(HttpResponse::new(status, body)))
                .collect(),
        )
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());
        if let Some(hook) = &self.on_request {
            hook(request);
        }
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {} {}", request.method.as_str(), request.path))
    }
}

fn session(transport: ScriptedTransport) -> Arc<Session<ScriptedTransport>> {
    Arc::new(Session::new(
        PetfinderClient::new("http://petfinder.test/v2"),
        Credentials::new("key", ""),
        transport,
    ))
}

/// Mount the dashboard and wait for it to settle.
fn dashboard<T: Transport + 'static>(session: &Arc<Session<T>>) -> DashboardView {
    let mut view = DashboardView::mount(Arc::clone(session), CancellationToken::new());
    view.wait();
    view
}

fn detail<T: Transport + 'static>(session: &Arc<Session<T>>, id: u64) -> DetailView {
    let mut view = DetailView::mount(Arc::clone(session), id, CancellationToken::new());
    view.wait();
    view
}

/// Wait until every worker holding `session` has finished.
fn workers_done<T>(session: &Arc<T>) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Arc::strong_count(session) > 1 {
        assert!(Instant::now() < deadline, "worker thread did not finish");
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn pepper_json() -> String {
    serde_json::json!({
        "animal": {
            "id": 42,
            "name": "Pepper",
            "type": "Dog",
            "age": "Young",
            "gender": "Female",
            "size": "Large",
            "status": "adoptable",
            "description": "Goofy lab.",
            "breeds": { "primary": "Labrador Retriever", "secondary": null, "mixed": false, "unknown": false },
            "colors": { "primary": "Black", "secondary": null, "tertiary": null },
            "photos": [{ "small": "s.jpg", "medium": "m.jpg", "large": "l.jpg", "full": "f.jpg" }],
            "tags": ["Friendly", "Playful"],
            "contact": {
                "email": "adopt@shelter.example.org",
                "phone": null,
                "address": { "city": "Jersey City", "state": "NJ" }
            }
        }
    })
    .to_string()
}

#[test]
fn rejected_credentials_show_authentication_error_and_skip_data_request() {
    let session = session(ScriptedTransport::ok(vec![(401, r#"{"title":"Unauthorized"}"#)]));
    let view = dashboard(&session);

    assert_eq!(view.state().error(), Some(&ViewError::Authentication));
    assert_eq!(
        DashboardScreen(view.state()).to_string(),
        "Error: Failed to authenticate with Petfinder API\n"
    );
    assert_eq!(session.transport().paths(), vec!["http://petfinder.test/v2/oauth2/token"]);
}

#[test]
fn unreachable_token_endpoint_is_an_authentication_error() {
    let session = session(ScriptedTransport::new(vec![Err(TransportError::Connection(
        "connection refused".to_string(),
    ))]));
    let view = detail(&session, 42);
    assert_eq!(view.state().error(), Some(&ViewError::Authentication));
    assert_eq!(session.transport().requests().len(), 1);
}

#[test]
fn token_request_is_a_client_credentials_form_post() {
    let session = session(ScriptedTransport::ok(vec![(200, TOKEN_OK), (200, r#"{"animals":[]}"#)]));
    dashboard(&session);

    let requests = session.transport().requests();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(
        requests[0].body.as_deref(),
        Some("grant_type=client_credentials&client_id=key&client_secret=")
    );
    assert_eq!(requests[1].method, HttpMethod::Get);
    assert_eq!(requests[1].path, "http://petfinder.test/v2/animals?limit=100");
    assert_eq!(requests[1].header("authorization"), Some("Bearer tok-1"));
}

#[test]
fn empty_list_renders_zero_totals() {
    let session = session(ScriptedTransport::ok(vec![(200, TOKEN_OK), (200, r#"{"animals":[]}"#)]));
    let view = dashboard(&session);

    let dashboard = view.state().ready().expect("dashboard should be ready");
    assert_eq!(dashboard.statistics().total, 0);
    assert_eq!(dashboard.statistics().average_age, None);
    assert_eq!(dashboard.filtered_len(), 0);

    let text = DashboardScreen(view.state()).to_string();
    assert!(text.contains("Total Pets: 0"));
    assert!(text.contains("Pet Types: 0"));
}

#[test]
fn list_failure_shows_fetch_error() {
    let session = session(ScriptedTransport::ok(vec![(200, TOKEN_OK), (500, "boom")]));
    let view = dashboard(&session);
    assert_eq!(view.state().error(), Some(&ViewError::fetch("Failed to fetch pets")));
    assert_eq!(DashboardScreen(view.state()).to_string(), "Error: Failed to fetch pets\n");
}

#[test]
fn filters_apply_after_mount() {
    let list = r#"{"animals":[
        {"id":1,"name":"Rex","type":"Dog","age":"Baby"},
        {"id":2,"name":"Tom","type":"Cat","age":"Baby"},
        {"id":3,"name":"Fido","type":"Dog","age":"Adult","description":"Fetches sticks"},
        {"id":4,"name":"Kiwi","type":"Bird","age":"Senior"}
    ]}"#;
    let session = session(ScriptedTransport::ok(vec![(200, TOKEN_OK), (200, list)]));
    let mut view = dashboard(&session);

    view.set_type_filter(TypeFilter::parse("dog"));
    view.set_search("STICKS");
    let dashboard = view.state().ready().unwrap();
    let ids: Vec<u64> = dashboard.filtered().map(|a| a.id).collect();
    assert_eq!(ids, vec![3]);
    assert_eq!(dashboard.statistics().total, 4);
    assert_eq!(dashboard.statistics().average_bracket(), Some(AgeBracket::Young));
}

#[test]
fn detail_route_fetches_single_record() {
    let body = pepper_json();
    let session = session(ScriptedTransport::ok(vec![(200, TOKEN_OK), (200, body.as_str())]));
    let view = detail(&session, 42);

    assert_eq!(view.id(), 42);
    assert_eq!(
        session.transport().paths(),
        vec!["http://petfinder.test/v2/oauth2/token", "http://petfinder.test/v2/animals/42"]
    );

    let text = DetailScreen(view.state()).to_string();
    assert!(text.starts_with("Pepper (adoptable)\n"));
    assert!(text.contains("Labrador Retriever"));
    assert!(!text.contains("Mixed with"));
    assert!(!text.contains("Phone:"));
    assert!(text.contains("Email: adopt@shelter.example.org"));
    assert!(text.contains("Location: Jersey City, NJ"));
    assert!(text.contains("  - Playful"));
}

#[test]
fn missing_animal_is_a_generic_fetch_error() {
    let session = session(ScriptedTransport::ok(vec![(200, TOKEN_OK), (404, "")]));
    let view = detail(&session, 9999);
    assert_eq!(view.state().error(), Some(&ViewError::fetch("Failed to fetch pet details")));
}

#[test]
fn token_is_shared_between_views() {
    let body = pepper_json();
    let session = session(ScriptedTransport::ok(vec![
        (200, TOKEN_OK),
        (200, r#"{"animals":[]}"#),
        (200, body.as_str()),
    ]));
    dashboard(&session);
    let pet = detail(&session, 42);

    assert!(pet.state().ready().is_some());
    let token_requests = session
        .transport()
        .paths()
        .iter()
        .filter(|path| path.ends_with("/oauth2/token"))
        .count();
    assert_eq!(token_requests, 1);
}

#[test]
fn unauthorized_data_request_invalidates_token() {
    let body = pepper_json();
    let session = session(ScriptedTransport::ok(vec![
        (200, TOKEN_OK),
        (401, ""),
        (200, r#"{"access_token":"tok-2"}"#),
        (200, body.as_str()),
    ]));

    let first = dashboard(&session);
    assert_eq!(first.state().error(), Some(&ViewError::fetch("Failed to fetch pets")));
    assert!(!session.has_token());

    let second = detail(&session, 42);
    assert!(second.state().ready().is_some());
    let requests = session.transport().requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[3].header("authorization"), Some("Bearer tok-2"));
}

#[test]
fn cancelled_before_mount_sends_nothing_and_stays_loading() {
    let session = session(ScriptedTransport::ok(vec![]));
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut view = DashboardView::mount(Arc::clone(&session), cancel);

    assert!(view.wait().is_loading());
    assert!(session.transport().requests().is_empty());
    assert_eq!(DashboardScreen(view.state()).to_string(), "Loading pets...\n");
}

#[test]
fn cancellation_during_token_request_skips_data_request() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let transport = ScriptedTransport {
        on_request: Some(Box::new(move |_| trigger.cancel())),
        ..ScriptedTransport::ok(vec![(200, TOKEN_OK)])
    };
    let session = session(transport);
    let mut view = DetailView::mount(Arc::clone(&session), 42, cancel);

    assert!(view.wait().is_loading());
    assert_eq!(session.transport().requests().len(), 1);
    assert!(!session.has_token());
}

/// A transport where every request blocks until the test lets it go.
fn gated(replies: Vec<(u16, &str)>) -> (ScriptedTransport, mpsc::Receiver<()>, mpsc::Sender<()>) {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let entered_tx = Mutex::new(entered_tx);
    let release_rx = Mutex::new(release_rx);
    let transport = ScriptedTransport {
        on_request: Some(Box::new(move |_| {
            let _ = entered_tx.lock().send(());
            let _ = release_rx.lock().recv();
        })),
        ..ScriptedTransport::ok(replies)
    };
    (transport, entered_rx, release_tx)
}

#[test]
fn mount_returns_loading_while_the_token_request_is_in_flight() {
    let (transport, entered, release) = gated(vec![(200, TOKEN_OK), (200, r#"{"animals":[]}"#)]);
    let session = session(transport);
    let mut view = DashboardView::mount(Arc::clone(&session), CancellationToken::new());

    entered.recv().unwrap();
    assert!(view.poll().is_loading());
    assert_eq!(DashboardScreen(view.state()).to_string(), "Loading pets...\n");

    // One release for the token request, one for the data request.
    release.send(()).unwrap();
    release.send(()).unwrap();
    assert_eq!(view.wait().ready().map(|d| d.animals().len()), Some(0));
    assert_eq!(session.transport().paths(), ["http://petfinder.test/v2/oauth2/token", "http://petfinder.test/v2/animals?limit=100"]);
}

#[test]
fn dropping_a_view_mid_load_never_sends_the_data_request() {
    let (transport, entered, release) = gated(vec![(200, TOKEN_OK), (200, r#"{"animals":[]}"#)]);
    let session = session(transport);
    let cancel = CancellationToken::new();
    let observer = cancel.clone();
    let view = DashboardView::mount(Arc::clone(&session), cancel);

    entered.recv().unwrap();
    drop(view);
    assert!(observer.is_cancelled());

    release.send(()).unwrap();
    workers_done(&session);

    assert_eq!(session.transport().paths(), ["http://petfinder.test/v2/oauth2/token"]);
    assert!(!session.has_token());
}

#[test]
fn dropping_a_detail_view_mid_load_never_sends_the_data_request() {
    let (transport, entered, release) = gated(vec![(200, TOKEN_OK), (200, "{}")]);
    let session = session(transport);
    let view = DetailView::mount(Arc::clone(&session), 42, CancellationToken::new());

    entered.recv().unwrap();
    drop(view);
    release.send(()).unwrap();
    workers_done(&session);

    assert_eq!(session.transport().requests().len(), 1);
    assert!(!session.has_token());
}

#[test]
fn settled_view_state_does_not_regress() {
    let session = session(ScriptedTransport::ok(vec![(401, "")]));
    let view = dashboard(&session);
    let state = view.state().clone().resolve(Ok(petboard_core::Dashboard::new(Vec::new())));
    assert!(matches!(state, ViewState::Error(ViewError::Authentication)));
}

#[test]
fn live_mock_server_end_to_end() {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, MockState::seeded()).await
        })
        .unwrap();
    });

    let session = Arc::new(Session::connect(
        PetfinderClient::new(&format!("http://{addr}")),
        Credentials::new(CLIENT_ID, ""),
    ));

    let mut dashboard = dashboard(&session);
    dashboard.set_search("lab");
    let text = DashboardScreen(dashboard.state()).to_string();
    assert!(text.contains("Total Pets: 6"));
    assert!(text.contains("Pepper  [/pet/42]"));
    assert!(!text.contains("[/pet/101]"));

    let pet = detail(&session, 42);
    let text = DetailScreen(pet.state()).to_string();
    assert!(text.contains("Labrador Retriever"));
    assert!(!text.contains("Mixed with"));
    assert!(text.contains("Phone: (555) 010-4242"));

    let missing = detail(&session, 9999);
    assert_eq!(missing.state().error(), Some(&ViewError::fetch("Failed to fetch pet details")));
}
