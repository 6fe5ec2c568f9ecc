//! Named-route URL resolution for message endpoints.

use missive_types::MessageId;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use thiserror::Error;
use url::Url;

/// Canonical message view.
pub const MESSAGE_CANONICAL_ROUTE: &str = "message.canonical";

/// Message edit form.
pub const MESSAGE_EDIT_FORM_ROUTE: &str = "message.edit_form";

/// Message delete confirmation form.
pub const MESSAGE_DELETE_FORM_ROUTE: &str = "message.delete_form";

/// Error surfaced when a route cannot be resolved.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The route name is not registered.
    #[error("unknown route name: {0}")]
    UnknownRoute(String),
    /// The filled path did not produce a valid URL against the base.
    #[error("route URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Resolves named message routes against a site base URL. The `{message}`
/// placeholder is filled with the percent-encoded message id.
#[derive(Clone, Debug)]
pub struct RouteProvider {
    base: Url,
}

impl RouteProvider {
    /// Build a provider over the site base URL.
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Resolve a named route for a message id.
    pub fn url_for(&self, route: &str, id: &MessageId) -> Result<Url, RouteError> {
        let pattern = match route {
            MESSAGE_CANONICAL_ROUTE => "/admin/content/messages/{message}",
            MESSAGE_EDIT_FORM_ROUTE => "/admin/content/messages/{message}/edit",
            MESSAGE_DELETE_FORM_ROUTE => "/admin/content/messages/{message}/delete",
            other => return Err(RouteError::UnknownRoute(other.to_string())),
        };

        let encoded = utf8_percent_encode(&id.to_string(), NON_ALPHANUMERIC).to_string();
        let path = pattern.replace("{message}", &encoded);
        Ok(self.base.join(&path)?)
    }
}
