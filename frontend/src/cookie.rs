/// Looks up `name` in a `document.cookie` style string (`a=1; b=2`).
///
/// Names match exactly and the first match wins. A present cookie with an
/// empty value yields `Some("")`.
pub fn read_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| match pair.split_once('=') {
            Some((key, value)) if key.trim() == name => Some(value.trim().to_owned()),
            None if pair == name => Some(String::new()),
            _ => None,
        })
}
