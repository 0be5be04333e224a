use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    auth::{AuthError, Claims, Role, SessionVerifier, VerifierState},
    config::{AccessPolicy, CALLBACK_PARAM},
};

/// Whether a path lives in the protected namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Unprotected,
    Protected,
}

/// Outcome of the access check for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    /// Send the user to sign in, remembering where they were going.
    RedirectToLogin { return_to: String },
    RedirectToForbidden,
}

/// A decision together with the verified session that produced it, if any.
#[derive(Debug)]
pub struct Evaluation {
    pub decision: AccessDecision,
    pub session: Option<Claims>,
}

/// classify
///
/// A path is protected when it equals the prefix or continues it with a `/` segment,
/// so `/admin` and `/admin/dashboard` are protected while `/administrator` is not.
/// Trailing slashes on the prefix are ignored; a bare `/` protects every path.
pub fn classify(path: &str, prefix: &str) -> RouteClass {
    match path.strip_prefix(prefix.trim_end_matches('/')) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => RouteClass::Protected,
        _ => RouteClass::Unprotected,
    }
}

/// decide
///
/// Pure policy step. Any verification failure counts as "no session" and the role
/// must be on the allow-list; nothing else reaches Allow on a protected route.
pub fn decide(
    route: RouteClass,
    path: &str,
    session: &Result<Claims, AuthError>,
    allowed_roles: &[Role],
) -> AccessDecision {
    if route == RouteClass::Unprotected {
        return AccessDecision::Allow;
    }

    match session {
        Err(_) => AccessDecision::RedirectToLogin {
            return_to: path.to_string(),
        },
        Ok(claims) if !allowed_roles.contains(&claims.role()) => {
            AccessDecision::RedirectToForbidden
        }
        Ok(_) => AccessDecision::Allow,
    }
}

/// evaluate
///
/// Classifies first; the verifier is only consulted for protected paths and is the
/// single await in the check.
pub async fn evaluate(
    verifier: &dyn SessionVerifier,
    policy: &AccessPolicy,
    path: &str,
    headers: &HeaderMap,
) -> Evaluation {
    let route = classify(path, &policy.protected_prefix);
    if route == RouteClass::Unprotected {
        return Evaluation {
            decision: AccessDecision::Allow,
            session: None,
        };
    }

    let session = verifier.verify(headers).await;
    if let Err(reason) = &session {
        tracing::debug!(path, %reason, "session verification failed");
    }

    let decision = decide(route, path, &session, &policy.allowed_roles);
    Evaluation {
        decision,
        session: session.ok(),
    }
}

/// Builds `{login_path}?callbackUrl={path}`. The path is percent-encoded but keeps
/// its slashes, which are legal in a query value.
pub fn login_location(login_path: &str, return_to: &str) -> String {
    let encoded = urlencoding::encode(return_to).replace("%2F", "/");
    format!("{login_path}?{CALLBACK_PARAM}={encoded}")
}

/// access_guard
///
/// Router-wide middleware. Allowed requests continue with the verified `Claims`
/// in their extensions; denied requests get a 307 and never reach the handler.
pub async fn access_guard(
    State(verifier): State<VerifierState>,
    State(policy): State<AccessPolicy>,
    request: Request,
    next: Next,
) -> Response {
    // Only the parts are borrowed across the verifier call; the body is not Sync.
    let (mut parts, body) = request.into_parts();
    let Evaluation { decision, session } =
        evaluate(verifier.as_ref(), &policy, parts.uri.path(), &parts.headers).await;

    match decision {
        AccessDecision::Allow => {
            if let Some(claims) = session {
                parts.extensions.insert(claims);
            }
            next.run(Request::from_parts(parts, body)).await
        }
        AccessDecision::RedirectToLogin { return_to } => {
            tracing::info!(path = %return_to, "unauthenticated request to protected route");
            Redirect::temporary(&login_location(&policy.login_path, &return_to)).into_response()
        }
        AccessDecision::RedirectToForbidden => {
            tracing::info!(
                path = parts.uri.path(),
                user = ?session.as_ref().map(|c| c.sub),
                "session lacks an allowed role"
            );
            Redirect::temporary(&policy.forbidden_path).into_response()
        }
    }
}
