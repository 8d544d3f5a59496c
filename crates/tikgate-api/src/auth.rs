// RouterOS API authentication
//
// Plaintext `/login` as used by RouterOS 6.43 and later. Older firmware
// answers with a `=ret=` challenge instead; that flow is not supported.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::proto::Sentence;
use crate::transport::TransportConfig;

impl ApiClient {
    /// Authenticate the connection with username/password.
    ///
    /// A `!trap` reply is reported as [`Error::Authentication`]; transport
    /// failures keep their own variants.
    pub async fn login(&mut self, username: &str, password: &SecretString) -> Result<(), Error> {
        debug!(addr = %self.addr(), username, "logging in");

        let sentence = Sentence::command("/login")
            .attr("name", username)
            .attr("password", password.expose_secret());

        match self.exchange(sentence).await {
            Ok((_, done)) if done.get("ret").is_some() => Err(Error::Authentication {
                message: "device requested challenge login (RouterOS older than 6.43)".into(),
            }),
            Ok(_) => {
                debug!("login successful");
                Ok(())
            }
            Err(Error::Trap { message, .. }) => Err(Error::Authentication { message }),
            Err(e) => Err(e),
        }
    }

    /// Connect and log in in one step.
    pub async fn open(
        host: &str,
        port: u16,
        username: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut client = Self::connect(host, port, transport).await?;
        client.login(username, password).await?;
        Ok(client)
    }
}
