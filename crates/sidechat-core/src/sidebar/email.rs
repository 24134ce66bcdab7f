//! Email shape check

use once_cell::sync::Lazy;
use regex::Regex;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 255;
const MAX_LABEL_LEN: usize = 63;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^[-!#$%&'*+/0-9=?A-Z^_a-z`{|}~](\.?[-!#$%&'*+/0-9=?A-Z^_a-z`{|}~])*@[a-zA-Z0-9](-*\.?[a-zA-Z0-9])*\.[a-zA-Z](-?[a-zA-Z0-9])+$"#,
    )
    .expect("email pattern is valid")
});

/// Check that `input` is a syntactically valid email address
pub fn is_valid_email(input: &str) -> bool {
    if input.is_empty() || input.len() > MAX_EMAIL_LEN {
        return false;
    }

    let mut parts = input.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.len() > MAX_LOCAL_LEN || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }
    if domain.split('.').any(|label| label.len() > MAX_LABEL_LEN) {
        return false;
    }

    EMAIL_RE.is_match(input)
}
