use crate::api::LanguageDto;

/// `en-US` -> `en`, matching how the backend pairs recognition and
/// translation models.
pub fn normalize_code(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

pub fn installed_languages(all: &[LanguageDto], downloaded: &[String]) -> Vec<LanguageDto> {
    all.iter()
        .filter(|lang| {
            downloaded
                .iter()
                .any(|code| normalize_code(code).eq_ignore_ascii_case(normalize_code(&lang.code)))
        })
        .cloned()
        .collect()
}

/// Installed languages, or every language while nothing is installed yet.
pub fn selectable_languages(all: &[LanguageDto], downloaded: &[String]) -> Vec<LanguageDto> {
    let installed = installed_languages(all, downloaded);
    if installed.is_empty() {
        all.to_vec()
    } else {
        installed
    }
}

pub fn is_downloaded(code: &str, downloaded: &[String]) -> bool {
    downloaded.iter().any(|d| d.eq_ignore_ascii_case(code))
}

pub fn percent(progress: f32) -> String {
    format!("{:.0}%", progress.clamp(0.0, 1.0) * 100.0)
}

pub fn format_timestamp(millis: f64) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(millis));
    String::from(date.to_locale_string("default", &wasm_bindgen::JsValue::UNDEFINED))
}
