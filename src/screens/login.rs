// Login screen view-model
// Collects credentials, signs in, persists the token and navigates home

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::forms::{FormControl, Validator};
use crate::services::{Credentials, Navigator, Notifier, OAuthProvider, SessionService};
use crate::storage::TokenStorage;

const USERNAME_VALIDATORS: &[Validator] = &[Validator::Required, Validator::Email, Validator::MinLength(5)];
const PASSWORD_VALIDATORS: &[Validator] = &[
    Validator::Required,
    Validator::MinLength(6),
    Validator::MaxLength(24),
];

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: FormControl,
    pub password: FormControl,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            username: FormControl::new(USERNAME_VALIDATORS),
            password: FormControl::new(PASSWORD_VALIDATORS),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.username.is_valid() && self.password.is_valid()
    }

    /// Credentials when every field is valid
    pub fn credentials(&self) -> Option<Credentials> {
        self.is_valid().then(|| Credentials {
            username: self.username.value().to_string(),
            password: self.password.value().to_string(),
        })
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LoginScreen {
    session: Arc<dyn SessionService>,
    tokens: Arc<dyn TokenStorage>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    home_route: String,
    form: LoginForm,
    loading: watch::Sender<bool>,
}

impl LoginScreen {
    pub fn new(
        session: Arc<dyn SessionService>,
        tokens: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        home_route: impl Into<String>,
    ) -> Self {
        let (loading, _) = watch::channel(false);
        Self {
            session,
            tokens,
            navigator,
            notifier,
            home_route: home_route.into(),
            form: LoginForm::new(),
            loading,
        }
    }

    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut LoginForm {
        &mut self.form
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Sign in with the form values. Does nothing while the form is invalid.
    pub async fn sign_in_with_credentials(&self) {
        let Some(credentials) = self.form.credentials() else {
            debug!("login form invalid, not submitting");
            return;
        };

        self.loading.send_replace(true);
        let outcome = self.authenticate(&credentials).await;
        self.loading.send_replace(false);

        match outcome {
            Ok(()) => {
                info!(username = %credentials.username, "signed in");
                self.navigator.navigate(&self.home_route);
            }
            Err(message) => {
                warn!(error = %message, "sign in failed");
                self.notifier.show_error(&message);
            }
        }
    }

    pub fn sign_in_with_google(&self) {
        self.sign_in_with_provider(OAuthProvider::Google);
    }

    pub fn sign_in_with_github(&self) {
        self.sign_in_with_provider(OAuthProvider::Github);
    }

    // The provider flow leaves the app; loading stays set until it returns.
    fn sign_in_with_provider(&self, provider: OAuthProvider) {
        self.loading.send_replace(true);
        debug!(provider = provider.as_str(), "starting provider sign in");
        self.session.sign_in_with_provider(provider);
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<(), String> {
        let response = self
            .session
            .sign_in_with_credentials(credentials)
            .await
            .map_err(|err| err.to_string())?;

        if let Some(token) = response.access_token.as_deref() {
            self.tokens.set_token(token).map_err(|err| err.to_string())?;
        }
        Ok(())
    }
}
