//! HTTP Basic authentication gate.
//!
//! One shared credential protects every route except the health probes
//! under `/api/health`. When no credential is configured the gate passes
//! everything through.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, ContentType};
use actix_web::HttpResponse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

/// Realm advertised in the `WWW-Authenticate` challenge.
pub const AUTH_REALM: &str = "stock-app";
const EXEMPT_PREFIX: &str = "/api/health";
const CHALLENGE_BODY: &str = "Authentication required";

/// The user/password pair requests must present.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    user: String,
    pass: String,
}

impl BasicCredentials {
    /// Build credentials from configuration.
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }

    /// Credentials when both halves are configured and non-empty.
    pub fn from_optional(user: Option<String>, pass: Option<String>) -> Option<Self> {
        match (user, pass) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some(Self::new(user, pass))
            }
            _ => None,
        }
    }

    fn matches(&self, user: &[u8], pass: &[u8]) -> bool {
        // Evaluate both halves so a wrong user costs the same as a wrong password.
        let user_ok = constant_time_eq(self.user.as_bytes(), user);
        let pass_ok = constant_time_eq(self.pass.as_bytes(), pass);
        user_ok & pass_ok
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// Byte comparison whose running time depends only on the input lengths.
fn constant_time_eq(expected: &[u8], given: &[u8]) -> bool {
    let len = expected.len().max(given.len());
    let mut diff = u8::from(expected.len() != given.len());
    for i in 0..len {
        let a = expected.get(i).copied().unwrap_or(0);
        let b = given.get(i).copied().unwrap_or(0);
        diff |= a ^ b;
    }
    diff == 0
}

/// Split an `Authorization: Basic ...` value into user and password bytes.
fn decode_basic(value: &str) -> Option<(Vec<u8>, Vec<u8>)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let colon = decoded.iter().position(|byte| *byte == b':')?;
    let (user, rest) = decoded.split_at(colon);
    let (_, pass) = rest.split_first()?;
    Some((user.to_vec(), pass.to_vec()))
}

fn is_exempt(path: &str) -> bool {
    path.starts_with(EXEMPT_PREFIX)
}

/// Middleware enforcing [`BasicCredentials`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use stockroom::middleware::{BasicAuth, BasicCredentials};
///
/// let app = App::new().wrap(BasicAuth::new(Some(BasicCredentials::new("admin", "secret"))));
/// ```
#[derive(Clone, Debug)]
pub struct BasicAuth {
    credentials: Option<Arc<BasicCredentials>>,
}

impl BasicAuth {
    /// Gate requests on `credentials`; `None` disables the gate.
    pub fn new(credentials: Option<BasicCredentials>) -> Self {
        Self {
            credentials: credentials.map(Arc::new),
        }
    }

    /// Whether requests are being checked.
    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }
}

impl<S, B> Transform<S, ServiceRequest> for BasicAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BasicAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BasicAuthMiddleware {
            service: Rc::new(service),
            credentials: self.credentials.clone(),
        }))
    }
}

/// Service wrapper produced by [`BasicAuth`].
pub struct BasicAuthMiddleware<S> {
    service: Rc<S>,
    credentials: Option<Arc<BasicCredentials>>,
}

impl<S> BasicAuthMiddleware<S> {
    fn admits(&self, req: &ServiceRequest) -> bool {
        let Some(expected) = self.credentials.as_deref() else {
            return true;
        };
        if is_exempt(req.path()) {
            return true;
        }
        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(decode_basic)
            .is_some_and(|(user, pass)| expected.matches(&user, &pass))
    }
}

fn challenge() -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((
            header::WWW_AUTHENTICATE,
            format!("Basic realm=\"{AUTH_REALM}\""),
        ))
        .content_type(ContentType::plaintext())
        .body(CHALLENGE_BODY)
}

impl<S, B> Service<ServiceRequest> for BasicAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !self.admits(&req) {
            debug!(path = %req.path(), "rejected request without valid credentials");
            let response = req.into_response(challenge()).map_into_right_body();
            return Box::pin(async move { Ok(response) });
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
