//! Sign-in / sign-up flow.

use crate::auth::client::IdentityProvider;
use crate::auth::session::SessionStore;
use crate::error::{ForgeError, Result};

const MIN_PASSWORD_LEN: usize = 6;

/// Which of the two credential forms is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Existing account.
    #[default]
    SignIn,
    /// New account.
    SignUp,
}

/// What a successful submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Credentials accepted; the session was published to the store.
    SignedIn {
        /// Email of the account that signed in.
        email: String,
    },
    /// Account created; the provider sent a confirmation email and the form
    /// switched back to sign-in mode.
    ConfirmationSent,
}

/// State of the email/password form guarding the generator.
///
/// Validation runs before the provider is contacted: a short password or a
/// confirmation mismatch never produces a network call.
#[derive(Debug, Clone, Default)]
pub struct CredentialsForm {
    /// Active form mode.
    pub mode: AuthMode,
    /// Email field.
    pub email: String,
    /// Password field.
    pub password: String,
    /// Confirmation field, used in sign-up mode only.
    pub confirm_password: String,
    /// Target the confirmation email links back to.
    pub redirect_to: Option<String>,
}

impl CredentialsForm {
    /// Creates an empty form in sign-in mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches between sign-in and sign-up, keeping typed fields.
    pub fn switch_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
    }

    /// Checks the sign-up fields without contacting the provider.
    pub fn validate_sign_up(&self) -> Result<()> {
        if self.password != self.confirm_password {
            return Err(ForgeError::Validation("Passwords do not match".into()));
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(ForgeError::Validation(
                "Password must be at least 6 characters long".into(),
            ));
        }
        Ok(())
    }

    /// Submits the form against `provider`.
    ///
    /// Sign-in publishes the session into `store`; sign-up flips the form to
    /// sign-in mode so the freshly confirmed account can log in.
    pub async fn submit(
        &mut self,
        provider: &dyn IdentityProvider,
        store: &SessionStore,
    ) -> Result<AuthEvent> {
        match self.mode {
            AuthMode::SignUp => {
                self.validate_sign_up()?;
                provider
                    .sign_up(&self.email, &self.password, self.redirect_to.as_deref())
                    .await
                    .map_err(friendly)?;
                self.mode = AuthMode::SignIn;
                Ok(AuthEvent::ConfirmationSent)
            }
            AuthMode::SignIn => {
                let session = provider
                    .sign_in_with_password(&self.email, &self.password)
                    .await
                    .map_err(friendly)?;
                let email = session.email.clone();
                store.set(session);
                Ok(AuthEvent::SignedIn { email })
            }
        }
    }
}

/// Remaps the provider error signals we recognize to friendlier wording;
/// everything else passes through verbatim.
fn friendly(err: ForgeError) -> ForgeError {
    let ForgeError::Auth(message) = err else {
        return err;
    };
    if message.contains("User already registered") {
        return ForgeError::Auth(
            "An account with this email already exists. Please sign in instead.".into(),
        );
    }
    if message.contains("Invalid login credentials") {
        return ForgeError::Auth(
            "Invalid email or password. Please check your credentials.".into(),
        );
    }
    ForgeError::Auth(message)
}
