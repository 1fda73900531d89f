//! Widget language selection.

use rte_config::WidgetOptions;

/// Supplies the locale of the current request, when there is one.
pub trait LocaleProvider: Send + Sync {
    fn current_locale(&self) -> Option<String>;
}

/// Provider returning a fixed locale.
#[derive(Debug, Clone)]
pub struct StaticLocale(pub String);

impl LocaleProvider for StaticLocale {
    fn current_locale(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Format a locale tag as a widget language code.
///
/// The language segment is lowercased and the first two-letter region
/// segment that follows is uppercased: `en-us` and `en_US` become `enUS`,
/// `zh-Hant-TW` becomes `zhTW`. Tags without a region keep the language
/// only.
#[must_use]
pub fn language_code(locale: &str) -> String {
    let mut segments = locale.split(['-', '_']).filter(|s| !s.is_empty());
    let Some(language) = segments.next() else {
        return String::new();
    };

    let mut code = language.to_ascii_lowercase();
    if let Some(region) =
        segments.find(|s| s.len() == 2 && s.bytes().all(|b| b.is_ascii_alphabetic()))
    {
        code.push_str(&region.to_ascii_uppercase());
    }
    code
}

/// Pick the widget language.
///
/// Order: instance `language`, instance `locale`, the request locale
/// (formatted with [`language_code`]), then `fallback` verbatim.
#[must_use]
pub fn derive_language(
    instance: Option<&WidgetOptions>,
    request_locale: Option<&str>,
    fallback: Option<&str>,
) -> Option<String> {
    let non_empty = |language: &String| !language.is_empty();
    instance
        .and_then(|o| {
            o.language
                .clone()
                .filter(non_empty)
                .or_else(|| o.locale.clone().filter(non_empty))
        })
        .or_else(|| request_locale.map(language_code).filter(non_empty))
        .or_else(|| fallback.map(str::to_owned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code() {
        assert_eq!(language_code("en-us"), "enUS");
        assert_eq!(language_code("en_US"), "enUS");
        assert_eq!(language_code("DE"), "de");
        assert_eq!(language_code("zh-Hant-TW"), "zhTW");
        assert_eq!(language_code(""), "");
    }

    #[test]
    fn test_instance_language_wins() {
        let instance = WidgetOptions {
            language: Some("ko".to_owned()),
            locale: Some("fr".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            derive_language(Some(&instance), Some("de-de"), Some("en")).as_deref(),
            Some("ko")
        );
    }

    #[test]
    fn test_instance_locale_before_request() {
        let instance = WidgetOptions {
            locale: Some("fr".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            derive_language(Some(&instance), Some("de-de"), Some("en")).as_deref(),
            Some("fr")
        );
    }

    #[test]
    fn test_empty_instance_language_uses_request_locale() {
        let instance = WidgetOptions {
            language: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            derive_language(Some(&instance), Some("de-de"), Some("en")).as_deref(),
            Some("deDE")
        );
    }

    #[test]
    fn test_empty_instance_language_uses_instance_locale() {
        let instance = WidgetOptions {
            language: Some(String::new()),
            locale: Some("fr".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            derive_language(Some(&instance), Some("de-de"), None).as_deref(),
            Some("fr")
        );
    }

    #[test]
    fn test_request_locale_formatted() {
        assert_eq!(
            derive_language(None, Some("pt-br"), Some("en")).as_deref(),
            Some("ptBR")
        );
    }

    #[test]
    fn test_fallback_verbatim() {
        assert_eq!(
            derive_language(None, None, Some("en-US")).as_deref(),
            Some("en-US")
        );
        assert_eq!(derive_language(None, None, None), None);
    }

    #[test]
    fn test_static_locale() {
        assert_eq!(
            StaticLocale("ja-jp".to_owned()).current_locale().as_deref(),
            Some("ja-jp")
        );
    }
}
