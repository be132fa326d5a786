/// Ensures a request path begins with a leading slash
///
/// # Examples
/// ```
/// use banter::utils::uri::ensure_leading_slash;
/// assert_eq!(ensure_leading_slash("api/chat"), "/api/chat");
///
/// // Works with owned String too
/// let path = String::from("/api/chat");
/// assert_eq!(ensure_leading_slash(path), "/api/chat");
/// ```
pub fn ensure_leading_slash<S>(path: S) -> String
where
    S: Into<String>,
{
    let path = path.into();
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}
