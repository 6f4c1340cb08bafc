/// Read a bearer token for the insight service from `var`.
/// Returns Some(token) if the env var is set and non-empty, None otherwise.
pub fn get_token_from_env(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}
