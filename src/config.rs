use std::env;

use crate::auth::Role;

/// Local-only fallback secret. Production refuses to start without `SESSION_SECRET`.
const LOCAL_SESSION_SECRET: &str = "super-secure-test-secret-value-local";

/// Query parameter carrying the originally requested path on login redirects.
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// shared read-only by the router, the access guard and the repositories.
/// It is pulled into handlers and middleware via FromRef.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls logging format and secret strictness.
    pub env: Env,
    // Optional Postgres connection string. When absent only the built-in posts are served.
    pub db_url: Option<String>,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
    // HS256 secret used to verify session tokens issued by the sign-in service.
    pub session_secret: String,
    // Name of the cookie carrying the session token.
    pub session_cookie: String,
    // Admin-route access policy.
    pub access: AccessPolicy,
}

/// Env
///
/// Defines the runtime context: local development or hardened production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// AccessPolicy
///
/// Where the protected namespace lives, where denied requests are sent, and which
/// roles may pass.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessPolicy {
    /// Path prefix whose requests require an authorized session (e.g. `/admin`).
    pub protected_prefix: String,
    /// Redirect target for requests without a valid session.
    pub login_path: String,
    /// Redirect target for authenticated sessions lacking an allowed role.
    pub forbidden_path: String,
    /// Roles granted access. Empty means nobody passes.
    pub allowed_roles: Vec<Role>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            protected_prefix: "/admin".to_string(),
            login_path: "/login".to_string(),
            forbidden_path: "/403".to_string(),
            allowed_roles: vec![Role::Admin],
        }
    }
}

impl AccessPolicy {
    /// Strips trailing slashes so `/admin/` and `/admin` protect the same paths.
    /// The root prefix stays `/`.
    pub fn normalize_prefix(raw: &str) -> String {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        }
    }

    /// Parses a comma-separated role list such as `ADMIN,USER`.
    /// Unknown names are dropped so a typo can only narrow access.
    pub fn parse_roles(raw: &str) -> Vec<Role> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|name| match Role::from_claim(name) {
                Role::Unrecognized => {
                    tracing::warn!(role = name, "ignoring unknown role in ADMIN_ALLOWED_ROLES");
                    None
                }
                role => Some(role),
            })
            .collect()
    }
}

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking configuration used for test state setup.
    fn default() -> Self {
        Self {
            env: Env::Local,
            db_url: None,
            bind_addr: "0.0.0.0:3000".to_string(),
            session_secret: LOCAL_SESSION_SECRET.to_string(),
            session_cookie: "session-token".to_string(),
            access: AccessPolicy::default(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads all parameters from environment variables, failing fast on anything
    /// production cannot run without.
    ///
    /// # Panics
    /// Panics if `SESSION_SECRET` is missing while `APP_ENV=production`.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let session_secret = match env {
            Env::Production => env::var("SESSION_SECRET")
                .expect("FATAL: SESSION_SECRET must be set in production."),
            Env::Local => {
                env::var("SESSION_SECRET").unwrap_or_else(|_| LOCAL_SESSION_SECRET.to_string())
            }
        };

        let defaults = AccessPolicy::default();
        let access = AccessPolicy {
            protected_prefix: env::var("ADMIN_PREFIX")
                .map(|raw| AccessPolicy::normalize_prefix(&raw))
                .unwrap_or(defaults.protected_prefix),
            login_path: env::var("LOGIN_PATH").unwrap_or(defaults.login_path),
            forbidden_path: env::var("FORBIDDEN_PATH").unwrap_or(defaults.forbidden_path),
            allowed_roles: env::var("ADMIN_ALLOWED_ROLES")
                .map(|raw| AccessPolicy::parse_roles(&raw))
                .unwrap_or(defaults.allowed_roles),
        };

        Self {
            env,
            db_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            session_secret,
            session_cookie: env::var("SESSION_COOKIE")
                .unwrap_or_else(|_| "session-token".to_string()),
            access,
        }
    }
}
