use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{ApiClient, ApiError, LoginRequest, RegisterRequest, RegisterResponse, TokenPair, UserProfile};

/// The signed-in user. The server may not have a profile for them yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentUser {
    pub profile: Option<UserProfile>,
}

impl CurrentUser {
    pub fn is_mentor(&self) -> bool {
        self.profile.as_ref().is_some_and(UserProfile::is_mentor)
    }

    pub fn display_name(&self) -> String {
        self.profile
            .as_ref()
            .and_then(|profile| profile.user.as_ref())
            .map(|user| user.display_name())
            .unwrap_or_else(|| "User".into())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<CurrentUser>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct AuthContext {
    api: ApiClient,
    state: Rc<RefCell<AuthState>>,
}

impl AuthContext {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Rc::new(RefCell::new(AuthState {
                loading: true,
                ..AuthState::default()
            })),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Restores the user from stored tokens. A failed profile load clears them.
    pub async fn init(&self) {
        if self.api.is_authenticated() {
            match self.load_user().await {
                Ok(user) => self.update(|state| state.user = Some(user)),
                Err(error) => {
                    log::warn!("auth check failed: {}", error);
                    self.api.logout();
                    self.update(|state| state.user = None);
                }
            }
        }
        self.update(|state| state.loading = false);
    }

    pub async fn login(&self, credentials: LoginRequest) -> Result<TokenPair, ApiError> {
        self.begin();
        let result = async {
            let tokens = self.api.login(credentials).await?;
            let user = self.load_user().await?;
            Ok::<_, ApiError>((tokens, user))
        }
        .await;
        self.finish(result)
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.begin();
        let result = async {
            let response = self.api.register(request).await?;
            let user = match response.tokens() {
                Some(_) => Some(self.load_user().await?),
                None => None,
            };
            Ok::<_, ApiError>((response, user))
        }
        .await;
        match result {
            Ok((response, Some(user))) => self.finish(Ok((response, user))),
            Ok((response, None)) => {
                self.update(|state| state.loading = false);
                Ok(response)
            }
            Err(error) => self.finish::<RegisterResponse>(Err(error)),
        }
    }

    pub fn logout(&self) {
        self.api.logout();
        self.update(|state| {
            state.user = None;
            state.error = None;
        });
    }

    pub fn clear_error(&self) {
        self.update(|state| state.error = None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().user.is_some()
    }

    pub fn is_mentor(&self) -> bool {
        self.state
            .borrow()
            .user
            .as_ref()
            .is_some_and(CurrentUser::is_mentor)
    }

    async fn load_user(&self) -> Result<CurrentUser, ApiError> {
        let profiles = self.api.get_profile().await?;
        Ok(CurrentUser {
            profile: profiles.into_items().into_iter().next(),
        })
    }

    fn begin(&self) {
        self.update(|state| {
            state.error = None;
            state.loading = true;
        });
    }

    fn finish<T>(&self, result: Result<(T, CurrentUser), ApiError>) -> Result<T, ApiError> {
        match result {
            Ok((value, user)) => {
                self.update(|state| {
                    state.user = Some(user);
                    state.loading = false;
                });
                Ok(value)
            }
            Err(error) => {
                self.update(|state| {
                    state.error = Some(error.error.clone());
                    state.loading = false;
                });
                Err(error)
            }
        }
    }

    fn update(&self, f: impl FnOnce(&mut AuthState)) {
        f(&mut self.state.borrow_mut());
    }
}
