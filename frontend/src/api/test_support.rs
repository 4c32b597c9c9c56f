pub mod mock {
    use crate::api::client::{ApiClient, MockResponse, RecordedRequest, TestResponder};
    use crate::api::ApiError;
    use crate::state::session::Session;
    use crate::utils::navigation::Navigator;
    use reqwest::Method;
    use serde_json::Value;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    pub const GET: Method = Method::GET;
    pub const POST: Method = Method::POST;
    pub const PUT: Method = Method::PUT;
    pub const PATCH: Method = Method::PATCH;
    pub const DELETE: Method = Method::DELETE;

    pub const BASE_URL: &str = "http://mock.local/api";

    #[derive(Clone, Default)]
    pub struct MockServer {
        inner: Rc<RefCell<Inner>>,
    }

    #[derive(Default)]
    struct Inner {
        routes: Vec<Route>,
        received: Vec<RecordedRequest>,
    }

    #[derive(Clone)]
    struct Route {
        when: When,
        response: MockResponse,
        hits: Rc<Cell<usize>>,
    }

    pub struct MockRef {
        hits: Rc<Cell<usize>>,
    }

    impl MockRef {
        pub fn hits(&self) -> usize {
            self.hits.get()
        }

        pub fn assert_hits(&self, expected: usize) {
            assert_eq!(self.hits(), expected, "unexpected number of mock hits");
        }
    }

    impl MockServer {
        pub fn start() -> Self {
            Self::default()
        }

        /// Client wired to this server, a fresh in-memory session and a recording navigator.
        pub fn client(&self) -> (ApiClient, Session, RecordingNavigator) {
            let session = Session::in_memory();
            let navigator = RecordingNavigator::default();
            let client = ApiClient::new_with_base_url(BASE_URL)
                .with_session(session.clone())
                .with_navigator(Rc::new(navigator.clone()))
                .with_test_responder(Rc::new(self.clone()));
            (client, session, navigator)
        }

        pub fn mock<F>(&self, f: F) -> MockRef
        where
            F: FnOnce(&mut When, &mut Then),
        {
            let mut when = When::default();
            let mut then = Then::default();
            f(&mut when, &mut then);

            assert!(when.method.is_some(), "mock requires method");
            assert!(when.path.is_some(), "mock requires path");
            let response = match then.text {
                Some(text) => MockResponse::text(then.status.unwrap_or(200), text),
                None => MockResponse::json(
                    then.status.unwrap_or(200),
                    then.body.unwrap_or_else(|| serde_json::json!({})),
                ),
            };

            let hits = Rc::new(Cell::new(0));
            self.inner.borrow_mut().routes.push(Route {
                when,
                response,
                hits: hits.clone(),
            });
            MockRef { hits }
        }

        pub fn received(&self) -> Vec<RecordedRequest> {
            self.inner.borrow().received.clone()
        }

        pub fn received_paths(&self) -> Vec<String> {
            self.inner
                .borrow()
                .received
                .iter()
                .map(|r| format!("{} {}", r.method, r.path))
                .collect()
        }
    }

    impl TestResponder for MockServer {
        fn respond(&self, request: &RecordedRequest) -> Result<MockResponse, ApiError> {
            let mut inner = self.inner.borrow_mut();
            inner.received.push(request.clone());

            let route = inner
                .routes
                .iter()
                .rev()
                .find(|route| route.when.matches(request))
                .cloned();

            match route {
                Some(route) => {
                    route.hits.set(route.hits.get() + 1);
                    Ok(route.response)
                }
                None => Err(ApiError::request_failed(format!(
                    "No mock for {} {}",
                    request.method, request.path
                ))),
            }
        }
    }

    #[derive(Clone, Default)]
    pub struct When {
        method: Option<Method>,
        path: Option<String>,
        query: Option<String>,
        headers: Vec<(String, String)>,
    }

    impl When {
        pub fn method(&mut self, method: Method) -> &mut Self {
            self.method = Some(method);
            self
        }

        pub fn path(&mut self, path: &str) -> &mut Self {
            self.path = Some(path.to_string());
            self
        }

        pub fn query(&mut self, query: &str) -> &mut Self {
            self.query = Some(query.to_string());
            self
        }

        pub fn header(&mut self, name: &str, value: &str) -> &mut Self {
            self.headers.push((name.to_string(), value.to_string()));
            self
        }

        fn matches(&self, request: &RecordedRequest) -> bool {
            self.method.as_ref() == Some(&request.method)
                && self.path.as_deref() == Some(request.path.as_str())
                && self
                    .query
                    .as_ref()
                    .map_or(true, |q| request.query.as_deref() == Some(q.as_str()))
                && self
                    .headers
                    .iter()
                    .all(|(name, value)| request.header(name) == Some(value.as_str()))
        }
    }

    #[derive(Default)]
    pub struct Then {
        status: Option<u16>,
        body: Option<Value>,
        text: Option<String>,
    }

    impl Then {
        pub fn status(&mut self, status: u16) -> &mut Self {
            self.status = Some(status);
            self
        }

        pub fn json_body(&mut self, body: Value) -> &mut Self {
            self.body = Some(body);
            self
        }

        pub fn body(&mut self, text: &str) -> &mut Self {
            self.text = Some(text.to_string());
            self
        }
    }

    #[derive(Clone, Default)]
    pub struct RecordingNavigator {
        redirects: Rc<Cell<usize>>,
    }

    impl RecordingNavigator {
        pub fn redirects(&self) -> usize {
            self.redirects.get()
        }
    }

    impl Navigator for RecordingNavigator {
        fn redirect_to_login(&self) {
            self.redirects.set(self.redirects.get() + 1);
        }
    }
}
