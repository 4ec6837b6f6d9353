//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie session is the per-browser home of two values for each
//! resource: the form [`Mode`] and a one-shot [`Notice`] carried across a
//! redirect.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Mode, ModeController, Notice};

fn mode_key(resource: &str) -> String {
    format!("mode.{resource}")
}

fn notice_key(resource: &str) -> String {
    format!("notice.{resource}")
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Mode controller for `resource`, starting in create mode when none is
    /// stored or the stored value is unreadable.
    pub fn mode(&self, resource: &str) -> Result<ModeController, Error> {
        let stored = self
            .0
            .get::<Mode>(&mode_key(resource))
            .or_else(|error| {
                warn!(resource, %error, "discarding unreadable form mode");
                Ok::<_, Error>(None)
            })?;
        Ok(ModeController::from_mode(stored.unwrap_or_default()))
    }

    /// Persist the controller's mode for `resource`.
    pub fn store_mode(&self, resource: &str, controller: ModeController) -> Result<(), Error> {
        let key = mode_key(resource);
        match controller.into_mode() {
            Mode::Create => {
                self.0.remove(&key);
                Ok(())
            }
            mode => self
                .0
                .insert(key, mode)
                .map_err(|error| Error::internal(format!("failed to persist session: {error}"))),
        }
    }

    /// Queue a notice to show on the next render of `resource`.
    pub fn push_notice(&self, resource: &str, notice: &Notice) -> Result<(), Error> {
        self.0
            .insert(notice_key(resource), notice.message())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Remove and return the queued notice for `resource`.
    pub fn take_notice(&self, resource: &str) -> Option<Notice> {
        match self.0.remove_as::<String>(&notice_key(resource))? {
            Ok(message) => Some(Notice::new(message)),
            Err(raw) => {
                warn!(resource, raw = %raw, "discarding unreadable notice");
                None
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
