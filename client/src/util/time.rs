//! Display helpers for backend ISO-8601 timestamps.

#[cfg(test)]
#[path = "time_test.rs"]
mod time_test;

/// Date and time for tables, in the browser's locale when available.
///
/// Falls back to `YYYY-MM-DD HH:MM:SS` (UTC as sent) outside the browser or
/// when the browser cannot parse the value.
#[must_use]
pub fn format_timestamp(iso: &str) -> String {
    #[cfg(feature = "hydrate")]
    {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_str(iso));
        if !date.get_time().is_nan() {
            return String::from(date.to_locale_string("default", &wasm_bindgen::JsValue::UNDEFINED));
        }
    }
    compact_timestamp(iso)
}

/// Calendar date only, e.g. for "joined" columns.
#[must_use]
pub fn format_date(iso: &str) -> String {
    #[cfg(feature = "hydrate")]
    {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_str(iso));
        if !date.get_time().is_nan() {
            return String::from(date.to_locale_date_string("default", &wasm_bindgen::JsValue::UNDEFINED));
        }
    }
    compact_timestamp(iso).split(' ').next().unwrap_or_default().to_owned()
}

/// `2024-01-01T10:20:30.123Z` -> `2024-01-01 10:20:30`. Unrecognized input is
/// returned unchanged.
#[must_use]
pub fn compact_timestamp(iso: &str) -> String {
    let Some((date, time)) = iso.split_once('T') else {
        return iso.to_owned();
    };
    let time = time
        .split(['.', 'Z', '+'])
        .next()
        .unwrap_or_default();
    if time.is_empty() {
        date.to_owned()
    } else {
        format!("{date} {time}")
    }
}

/// `HH:MM:SS` part of a timestamp, for the message list.
#[must_use]
pub fn time_of_day(iso: &str) -> String {
    #[cfg(feature = "hydrate")]
    {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_str(iso));
        if !date.get_time().is_nan() {
            return String::from(date.to_locale_time_string("default"));
        }
    }
    let compact = compact_timestamp(iso);
    compact.rsplit(' ').next().unwrap_or_default().to_owned()
}
