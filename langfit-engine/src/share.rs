//! Result-sharing tokens
//!
//! A token is `"{language_id}|{TYPE}"`, percent-encoded with URI-component
//! rules, then base64 in the URL-safe alphabet without padding. Decoding
//! fails closed: anything malformed yields `None`.

use crate::personality::PersonalityType;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DELIMITER: char = '|';

/// Query parameter carrying the token in a share URL
pub const SHARE_QUERY_PARAM: &str = "r";

/// Decoded share payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedResult {
    pub language_id: String,
    pub personality: PersonalityType,
}

/// Encode a (language, type) pair as a URL-safe token
pub fn encode(language_id: &str, personality: PersonalityType) -> String {
    let data = format!("{}{}{}", language_id, DELIMITER, personality);
    let escaped = urlencoding::encode(&data);
    general_purpose::URL_SAFE_NO_PAD.encode(escaped.as_bytes())
}

/// Decode a token produced by [`encode`]
///
/// Accepts padded tokens and the standard `+`/`/` alphabet too. The payload
/// is split on its last delimiter. Returns `None` unless both halves are
/// non-empty and the second is a valid type code.
pub fn decode(token: &str) -> Option<SharedResult> {
    let normalized: String = token
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    if normalized.is_empty() {
        return None;
    }

    let bytes = match general_purpose::URL_SAFE_NO_PAD.decode(normalized.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Rejecting share token: {}", e);
            return None;
        }
    };
    let escaped = String::from_utf8(bytes).ok()?;
    let data = urlencoding::decode(&escaped).ok()?;

    // Type codes never contain the delimiter; language ids may
    let (language_id, code) = match data.rsplit_once(DELIMITER) {
        Some((language_id, code)) if !language_id.is_empty() && !code.is_empty() => {
            (language_id, code)
        }
        _ => {
            debug!("Rejecting share token payload '{}'", data);
            return None;
        }
    };
    let personality = code.parse().ok()?;

    Some(SharedResult {
        language_id: language_id.to_string(),
        personality,
    })
}

/// Share URL for a result: `{base_url}?r={token}`
pub fn share_url(base_url: &str, language_id: &str, personality: PersonalityType) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}{}={}",
        base_url,
        separator,
        SHARE_QUERY_PARAM,
        encode(language_id, personality)
    )
}

/// Pull the token out of a share URL's query string
pub fn token_from_url(url: &str) -> Option<&str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == SHARE_QUERY_PARAM)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Decode either a bare token or a full share URL
pub fn decode_token_or_url(input: &str) -> Option<SharedResult> {
    match token_from_url(input) {
        Some(token) => decode(token),
        None => decode(input),
    }
}

/// Short announcement text that accompanies a share URL
pub fn share_text(language_name: &str, personality: PersonalityType) -> String {
    format!(
        "I got {} ({}) on the Programming Language Personality Test! Discover your coding personality:",
        language_name, personality
    )
}

/// Social networks with a link-sharing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareTarget {
    Twitter,
    LinkedIn,
    WhatsApp,
    Facebook,
    Reddit,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 5] = [
        ShareTarget::Twitter,
        ShareTarget::LinkedIn,
        ShareTarget::WhatsApp,
        ShareTarget::Facebook,
        ShareTarget::Reddit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShareTarget::Twitter => "twitter",
            ShareTarget::LinkedIn => "linkedin",
            ShareTarget::WhatsApp => "whatsapp",
            ShareTarget::Facebook => "facebook",
            ShareTarget::Reddit => "reddit",
        }
    }

    /// Intent link posting `url` (and `text` where the network takes one)
    pub fn link(&self, url: &str, text: &str) -> String {
        let url_param = urlencoding::encode(url);
        let text_param = urlencoding::encode(text);
        match self {
            ShareTarget::Twitter => format!(
                "https://twitter.com/intent/tweet?text={}&url={}",
                text_param, url_param
            ),
            ShareTarget::LinkedIn => format!(
                "https://www.linkedin.com/sharing/share-offsite/?url={}",
                url_param
            ),
            ShareTarget::WhatsApp => format!(
                "https://wa.me/?text={}",
                urlencoding::encode(&format!("{} {}", text, url))
            ),
            ShareTarget::Facebook => format!(
                "https://www.facebook.com/sharer/sharer.php?u={}",
                url_param
            ),
            ShareTarget::Reddit => format!(
                "https://reddit.com/submit?url={}&title={}",
                url_param, text_param
            ),
        }
    }
}
