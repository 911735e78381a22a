pub mod store;

use failure::{self, Fail};
use log::debug;
use oauth2::basic::BasicClient;
use oauth2::reqwest::http_client;
use oauth2::{
    self, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use std::cell::RefCell;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use store::TokenStore;

const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/photoslibrary.readonly",
    "https://www.googleapis.com/auth/photoslibrary.sharing",
];

#[derive(Debug, Fail)]
pub enum Error {
    /// Passed input contains invalid value
    #[fail(display = "Invalid argument {}: {}", name, reason)]
    InvalidArgument { name: &'static str, reason: String },
    /// OAuth client file could not be read
    #[fail(display = "Failed to read OAuth client file {:?}: {}", path, cause)]
    ClientFile {
        path: PathBuf,
        #[fail(cause)]
        cause: io::Error,
    },
    /// OAuth client file is not in the expected format
    #[fail(display = "Malformed OAuth client file {:?}: {}", path, reason)]
    MalformedClientFile { path: PathBuf, reason: String },
    /// Token request got error response
    #[fail(display = "Token request failed: {}", _0)]
    TokenRequest(failure::Error),
    /// No token is available locally now
    #[fail(display = "No token configured in local store")]
    NoAvailableToken,
    /// Attempted to complete authorization before initiating
    #[fail(display = "Authentication process has not started")]
    AuthNotStarted,
    /// Failed to read authorization code from the console
    #[fail(display = "Failed to read authorization code: {}", _0)]
    AuthCodeInput(#[fail(cause)] io::Error),
    /// Failed to access locally stored secrets
    #[fail(display = "{}", _0)]
    StoredSecret(#[fail(cause)] store::Error),
}

impl From<store::Error> for Error {
    fn from(e: store::Error) -> Self {
        Error::StoredSecret(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(PartialEq, Clone, Debug)]
pub struct AuthConfig {
    pub auth_url: String,
    pub token_url: String,
    pub redirect_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
}

/// Layout of the client file downloaded from the Google API console.
#[derive(Deserialize, Debug)]
struct ClientFile {
    installed: Option<InstalledClient>,
}

#[derive(Deserialize, Debug)]
struct InstalledClient {
    client_id: String,
    client_secret: String,
    auth_uri: String,
    token_uri: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl AuthConfig {
    pub fn from_client_file<P: AsRef<Path>>(path: P) -> Result<AuthConfig> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|cause| Error::ClientFile {
            path: path.to_path_buf(),
            cause,
        })?;
        Self::from_client_json(&json).map_err(|reason| Error::MalformedClientFile {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn from_client_json(json: &str) -> std::result::Result<AuthConfig, String> {
        let file: ClientFile = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let client = file
            .installed
            .ok_or_else(|| "missing \"installed\" section".to_string())?;
        let redirect_url = client
            .redirect_uris
            .into_iter()
            .next()
            .ok_or_else(|| "no redirect_uris".to_string())?;

        Ok(AuthConfig {
            auth_url: client.auth_uri,
            token_url: client.token_uri,
            redirect_url,
            client_id: client.client_id,
            client_secret: client.client_secret,
            scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
        })
    }
}

pub struct TokenService {
    store: TokenStore,
    oauth2_client: BasicClient,
    auth_scopes: Vec<String>,

    authing_context: RefCell<Option<AuthenticatingContext>>,
}

impl TokenService {
    pub fn new(config: AuthConfig, store: TokenStore) -> Result<TokenService> {
        let auth_url = AuthUrl::new(config.auth_url).map_err(|e| Error::InvalidArgument {
            name: "auth_url",
            reason: e.to_string(),
        })?;
        let token_url = TokenUrl::new(config.token_url).map_err(|e| Error::InvalidArgument {
            name: "token_url",
            reason: e.to_string(),
        })?;
        let redirect_url =
            RedirectUrl::new(config.redirect_url).map_err(|e| Error::InvalidArgument {
                name: "redirect_url",
                reason: e.to_string(),
            })?;
        let client_id = ClientId::new(config.client_id);
        let client_secret = ClientSecret::new(config.client_secret);

        let oauth2_client =
            BasicClient::new(client_id, Some(client_secret), auth_url, Some(token_url))
                .set_redirect_url(redirect_url);

        Ok(TokenService {
            store,
            oauth2_client,
            auth_scopes: config.scopes,

            authing_context: RefCell::new(None),
        })
    }

    /// Return whether a token usable without user interaction is stored.
    pub fn has_token(&self) -> bool {
        self.store.valid_access_token().is_some() || self.store.refresh_token().is_some()
    }

    pub fn start_new_authorization(&self) -> String {
        let (pkce_code_challenge, pkce_code_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut req = self
            .oauth2_client
            .authorize_url(CsrfToken::new_random)
            .set_pkce_challenge(pkce_code_challenge)
            .add_extra_param("access_type", "offline");
        for scope in &self.auth_scopes {
            req = req.add_scope(Scope::new(scope.clone()));
        }

        let (authorize_url, _) = req.url();
        *self.authing_context.borrow_mut() = Some(AuthenticatingContext {
            pkce_verifier: pkce_code_verifier,
        });

        debug!("Started new authorization; url={}", authorize_url);
        authorize_url.to_string()
    }

    pub fn complete_authorization(&self, auth_code: String) -> Result<()> {
        let pkce_verifier = self
            .authing_context
            .borrow_mut()
            .take()
            .ok_or(Error::AuthNotStarted)?
            .pkce_verifier;

        let resp = self
            .oauth2_client
            .exchange_code(AuthorizationCode::new(auth_code))
            .set_pkce_verifier(pkce_verifier)
            .request(http_client)
            .map_err(|e| Error::TokenRequest(e.into()))?;

        let access_token = resp.access_token().secret();
        let refresh_token = resp.refresh_token().map(|t| t.secret().clone());
        debug!("Exchange token response: {:?}", resp);

        self.store.update_tokens(
            Some(access_token.clone()),
            resp.expires_in().map(|d| d.as_millis()),
            refresh_token,
        )?;

        Ok(())
    }

    pub fn obtain_access_token(&self) -> Result<String> {
        if let Some(access_token) = self.store.valid_access_token() {
            return Ok(access_token);
        }

        if let Some(refresh_token) = self.store.refresh_token() {
            let resp = self
                .oauth2_client
                .exchange_refresh_token(&RefreshToken::new(refresh_token))
                .request(http_client)
                .map_err(|e| Error::TokenRequest(e.into()))?;

            let access_token = resp.access_token().secret();
            debug!("Refresh token response: {:?}", resp);

            self.store.update_access_token(
                Some(access_token.clone()),
                resp.expires_in().map(|d| d.as_millis()),
            )?;
            return Ok(access_token.clone());
        }

        Err(Error::NoAvailableToken)
    }

    pub fn expire_current(&self) -> Result<()> {
        self.store.update_access_token(None, None)?;
        Ok(())
    }
}

struct AuthenticatingContext {
    pkce_verifier: PkceCodeVerifier,
}

/// Obtain tokens through the console unless usable ones are stored already.
///
/// Prints the authorization URL and reads the code the user pastes from `input`.
pub fn authorize_interactive<B: BufRead>(tokens: &TokenService, input: B) -> Result<()> {
    if tokens.has_token() {
        debug!("Using stored OAuth tokens");
        return Ok(());
    }

    let auth_url = tokens.start_new_authorization();
    println!("Open this URL in your browser:\n{}\n", auth_url);
    eprint!("Paste auth code: ");

    let auth_code = input
        .lines()
        .next()
        .ok_or_else(|| Error::InvalidArgument {
            name: "auth_code",
            reason: "no input".to_string(),
        })?
        .map_err(Error::AuthCodeInput)?;
    let auth_code = auth_code.trim();
    if auth_code.is_empty() {
        return Err(Error::InvalidArgument {
            name: "auth_code",
            reason: "empty".to_string(),
        });
    }
    tokens.complete_authorization(auth_code.to_string())
}
