use logistics_portal::{
    AppConfig,
    auth::Role,
    config::{AccessPolicy, Env},
};
use serial_test::serial;
use std::{env, panic};

const VARS: [&str; 9] = [
    "APP_ENV",
    "SESSION_SECRET",
    "SESSION_COOKIE",
    "DATABASE_URL",
    "BIND_ADDR",
    "ADMIN_PREFIX",
    "LOGIN_PATH",
    "FORBIDDEN_PATH",
    "ADMIN_ALLOWED_ROLES",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with only `vars` set, then restores the previous environment.
fn run_with_env<T, R>(vars: &[(&str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> =
        VARS.iter().map(|&var| (var, env::var(var).ok())).collect();

    unsafe {
        for var in VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    unsafe {
        for (key, original) in originals {
            match original {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_local_defaults() {
    let config = run_with_env(&[("APP_ENV", "local")], AppConfig::load);

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.db_url, None);
    assert_eq!(config.session_cookie, "session-token");
    assert_eq!(config.session_secret, AppConfig::default().session_secret);
    assert_eq!(config.access, AccessPolicy::default());
    assert_eq!(config.access.allowed_roles, vec![Role::Admin]);
}

#[test]
#[serial]
fn test_production_requires_session_secret() {
    let result = run_with_env(&[("APP_ENV", "production")], || {
        panic::catch_unwind(AppConfig::load)
    });

    assert!(
        result.is_err(),
        "Production config loading should panic without SESSION_SECRET"
    );
}

#[test]
#[serial]
fn test_production_with_secret_and_overrides() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("SESSION_SECRET", "prod-secret"),
            ("ADMIN_PREFIX", "/backoffice"),
            ("LOGIN_PATH", "/sign-in"),
            ("FORBIDDEN_PATH", "/denied"),
            ("ADMIN_ALLOWED_ROLES", "ADMIN, USER, OWNER"),
            ("DATABASE_URL", "postgres://u:p@db/site"),
        ],
        AppConfig::load,
    );

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.session_secret, "prod-secret");
    assert_eq!(config.access.protected_prefix, "/backoffice");
    assert_eq!(config.access.login_path, "/sign-in");
    assert_eq!(config.access.forbidden_path, "/denied");
    assert_eq!(config.access.allowed_roles, vec![Role::Admin, Role::User]);
    assert_eq!(config.db_url.as_deref(), Some("postgres://u:p@db/site"));
}

#[test]
fn test_parse_roles_drops_unknown_and_blank_entries() {
    assert_eq!(
        AccessPolicy::parse_roles("USER,,admin, ADMIN"),
        vec![Role::User, Role::Admin]
    );
    assert!(AccessPolicy::parse_roles("").is_empty());
}

#[test]
#[serial]
fn test_admin_prefix_trailing_slash_is_normalized() {
    let config = run_with_env(&[("ADMIN_PREFIX", "/admin/")], AppConfig::load);
    assert_eq!(config.access.protected_prefix, "/admin");
}

#[test]
fn test_normalize_prefix() {
    assert_eq!(AccessPolicy::normalize_prefix("/admin"), "/admin");
    assert_eq!(AccessPolicy::normalize_prefix("/admin///"), "/admin");
    assert_eq!(AccessPolicy::normalize_prefix("backoffice/"), "/backoffice");
    assert_eq!(AccessPolicy::normalize_prefix("/"), "/");
    assert_eq!(AccessPolicy::normalize_prefix(""), "/");
}
