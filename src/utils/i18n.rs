use tracing::warn;

/// Switch the language of every `t!` lookup.
///
/// Unknown locales fall back to English.
pub fn set_locale(locale: &str) {
    let available = available_locales!();
    if available.iter().any(|l| *l == locale) {
        rust_i18n::set_locale(locale);
    } else {
        warn!("Unknown locale '{}', falling back to en", locale);
        rust_i18n::set_locale("en");
    }
}
