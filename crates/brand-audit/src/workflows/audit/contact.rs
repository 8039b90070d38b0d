use serde::Serialize;

use crate::config::ContactConfig;

/// Follow-up channels offered on the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactLinks {
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
}

pub fn follow_up_message(score: u16) -> String {
    format!(
        "Hi Magsmen! I just completed my brand audit and scored {score}%. I'm interested in \
         discussing how you can help improve my brand. My business type: [User will add their \
         business type]"
    )
}

pub fn contact_links(config: &ContactConfig, score: u16) -> ContactLinks {
    let message = follow_up_message(score);
    ContactLinks {
        phone: format!("tel:{}", config.phone),
        whatsapp: format!(
            "https://wa.me/{}?text={}",
            config.whatsapp,
            encode_uri_component(&message)
        ),
        // Subject is left as-is; only the body is escaped.
        email: format!(
            "mailto:{}?subject=Brand Audit Follow-up - {score}% Score&body={}",
            config.email,
            encode_uri_component(&message)
        ),
    }
}

/// Percent-encode everything outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, byte-wise over UTF-8.
pub fn encode_uri_component(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric()
            || matches!(byte, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
        {
            encoded.push(char::from(byte));
        } else {
            encoded.push('%');
            encoded.push(char::from(HEX[usize::from(byte >> 4)]));
            encoded.push(char::from(HEX[usize::from(byte & 0x0F)]));
        }
    }
    encoded
}
