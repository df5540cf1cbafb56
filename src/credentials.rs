use secrecy::{ExposeSecret, SecretString};
use std::fmt;

const KEYRING_SERVICE: &str = "vkdl";
const KEYRING_USER: &str = "api-token";

/// A VK API bearer token, kept out of accidental debug output.
///
/// The token is only ever received from the caller (or the OS keyring); how
/// it was obtained in the first place is not this crate's business.
#[derive(Clone)]
pub struct Credentials {
    token: SecretString,
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        // no need for constant time comparisons, not sensitive context
        self.token.expose_secret() == other.token.expose_secret()
    }
}

impl Eq for Credentials {}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new(token: &str) -> Credentials {
        Credentials {
            token: SecretString::from(token),
        }
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    pub async fn save_to_keyring(&self) -> Result<(), keyring::Error> {
        let token = self.token.expose_secret().to_owned();

        // Spawn blocking task to avoid blocking async runtime
        tokio::task::spawn_blocking(move || {
            let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
            entry.set_password(&token)
        })
        .await
        .map_err(|e| {
            keyring::Error::PlatformFailure(Box::new(std::io::Error::other(e.to_string())))
        })?
    }

    /// If no entry exists, returns None
    pub async fn load_from_keyring() -> Result<Option<Self>, keyring::Error> {
        let token = match tokio::task::spawn_blocking(move || {
            let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
            entry.get_password()
        })
        .await
        .map_err(|e| {
            keyring::Error::PlatformFailure(Box::new(std::io::Error::other(e.to_string())))
        })? {
            Ok(token) => token,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(Some(Credentials::new(&token)))
    }
}
