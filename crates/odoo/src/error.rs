//! Odoo integration error types.
//!
//! Failure modes an operator can act on get distinct variants with
//! descriptive messages: a URL that serves HTML instead of XML-RPC, a
//! server that cannot be reached, and rejected credentials are different
//! problems with different fixes.

use thiserror::Error;

/// Errors talking to Odoo.
#[derive(Debug, Error)]
pub enum OdooError {
    /// The endpoint answered with HTML, not XML-RPC. Almost always a wrong
    /// URL (e.g. the web login page instead of the RPC endpoint).
    #[error(
        "Odoo URL returned an HTML page instead of an XML-RPC response; \
         check that the URL points at the Odoo server root"
    )]
    WrongUrl,

    /// The server could not be reached (connection refused, DNS failure,
    /// or timeout after retry).
    #[error("Odoo unreachable: {0}")]
    Unreachable(String),

    /// Authentication was rejected.
    #[error("Odoo rejected the credentials; check database, username and password")]
    InvalidCredentials,

    /// The server answered with an XML-RPC fault.
    #[error("Odoo fault {code}: {message}")]
    Fault {
        /// Fault code from the server.
        code: i64,
        /// Fault description from the server.
        message: String,
    },

    /// The response was XML-RPC but not the shape this client expects.
    #[error("Unexpected Odoo response: {0}")]
    UnexpectedResponse(String),

    /// Transport-level failure that is not a connectivity problem.
    #[error("Odoo transport error: {0}")]
    Transport(String),

    /// The base URL could not be used to build a client.
    #[error("Invalid Odoo client configuration: {0}")]
    Configuration(String),
}
