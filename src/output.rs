use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Human-readable CLI output is suppressed when `LINECACHE_QUIET` is set.
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("LINECACHE_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
