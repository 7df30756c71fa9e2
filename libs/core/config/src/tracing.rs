use crate::Environment;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

/// Install color-eyre for `main`'s error report.
///
/// Errors show the location they were raised at; the environment section
/// is left out. Later calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Filter directives used when `RUST_LOG` is unset.
///
/// Other crates log at `info`. Development raises tower_http to `debug`
/// and lowers hyper and h2 to `warn`. Each crate named in `crates` gets
/// `info` in production and `debug` in development, the level of the
/// per-request and search stream spans.
pub fn default_directives(environment: &Environment, crates: &[&str]) -> String {
    let (own, mut directives) = if environment.is_production() {
        ("info", vec!["info".to_string()])
    } else {
        (
            "debug",
            vec![
                "info".to_string(),
                "tower_http=debug".to_string(),
                "hyper=warn".to_string(),
                "h2=warn".to_string(),
            ],
        )
    };

    directives.extend(crates.iter().map(|name| format!("{name}={own}")));
    directives.join(",")
}

/// Install the global subscriber for a service made of `crates`.
///
/// Production writes flattened JSON lines without module targets.
/// Development writes compact lines with targets and also logs every span
/// as it closes, so the time a search spent scanning or relaying shows up
/// next to its request. Both carry an `ErrorLayer` so `eyre` reports
/// include the active span trace.
///
/// `RUST_LOG` replaces [`default_directives`] when set. Returns `false`
/// when a subscriber was already installed, which is expected in tests.
///
/// # Example
///
/// ```ignore
/// use core_config::{tracing::{init_tracing, install_color_eyre}, Environment};
///
/// install_color_eyre();
/// init_tracing(&Environment::from_env(), &["reguser_api", "domain_users"]);
/// ```
pub fn init_tracing(environment: &Environment, crates: &[&str]) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment, crates)));

    let installed = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    }
    .is_ok();

    if installed {
        tracing::info!(environment = ?environment, crates = ?crates, "Tracing initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRATES: [&str; 2] = ["reguser_api", "domain_users"];

    #[test]
    fn test_production_directives() {
        assert_eq!(
            default_directives(&Environment::Production, &CRATES),
            "info,reguser_api=info,domain_users=info"
        );
    }

    #[test]
    fn test_development_directives_raise_own_crates() {
        let directives = default_directives(&Environment::Development, &CRATES);
        assert!(directives.starts_with("info,"));
        assert!(directives.contains("tower_http=debug"));
        assert!(directives.contains("reguser_api=debug"));
        assert!(directives.ends_with("domain_users=debug"));
    }

    #[test]
    fn test_directives_parse_as_filter() {
        for env in [Environment::Development, Environment::Production] {
            assert!(EnvFilter::try_new(default_directives(&env, &CRATES)).is_ok());
        }
    }

    #[test]
    fn test_init_tracing_installs_once() {
        // Other tests in this binary may have raced us to the global default
        let first = init_tracing(&Environment::Development, &CRATES);
        let second = init_tracing(&Environment::Production, &CRATES);
        assert!(!second || !first);
        assert!(!init_tracing(&Environment::Development, &CRATES));
    }

    #[test]
    fn test_init_tracing_with_rust_log_env() {
        temp_env::with_var("RUST_LOG", Some("domain_users=trace"), || {
            init_tracing(&Environment::Production, &CRATES);
        });
    }
}
