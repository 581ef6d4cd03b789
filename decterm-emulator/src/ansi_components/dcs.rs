// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// XTGETTCAP: the payload is `;`-separated hex-encoded capability
/// names. Undecodable entries are dropped.
#[must_use]
pub fn parse_xtgettcap(payload: &[u8]) -> Vec<String> {
    payload
        .split(|b| *b == b';')
        .filter_map(|chunk| {
            let decoded = hex_decode(chunk)?;
            String::from_utf8(decoded).ok()
        })
        .collect()
}

/// The capabilities this terminal answers for.
#[must_use]
pub fn capability_value(name: &str) -> Option<&'static str> {
    match name {
        "TN" => Some("xterm-256color"),
        "RGB" => Some("truecolor"),
        _ => None,
    }
}

/// Build the `DCS 1 + r name=value ST` payload body (without the DCS
/// framing) for a known capability, or the failure body for unknown.
#[must_use]
pub fn xtgettcap_reply_body(name: &str) -> (bool, String) {
    capability_value(name).map_or_else(
        || (false, String::new()),
        |value| {
            (
                true,
                format!("{}={}", hex_encode(name.as_bytes()), hex_encode(value.as_bytes())),
            )
        },
    )
}

#[must_use]
pub fn hex_encode(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02X}")).collect()
}

#[must_use]
pub fn hex_decode(text: &[u8]) -> Option<Vec<u8>> {
    if text.is_empty() || text.len() % 2 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(text.len() / 2);
    for pair in text.chunks_exact(2) {
        let hi = char::from(pair[0]).to_digit(16)?;
        let lo = char::from(pair[1]).to_digit(16)?;
        #[allow(clippy::cast_possible_truncation)]
        out.push((hi * 16 + lo) as u8);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        assert_eq!(hex_encode(b"TN"), "544E");
        assert_eq!(hex_decode(b"544E"), Some(b"TN".to_vec()));
        assert_eq!(hex_decode(b"544"), None);
        assert_eq!(hex_decode(b"zz"), None);
    }

    #[test]
    fn tcap_names_parse() {
        assert_eq!(parse_xtgettcap(b"544E"), vec!["TN".to_string()]);
        assert_eq!(
            parse_xtgettcap(b"544E;524742"),
            vec!["TN".to_string(), "RGB".to_string()]
        );
        // bad chunks drop, good ones survive
        assert_eq!(parse_xtgettcap(b"zz;524742"), vec!["RGB".to_string()]);
    }

    #[test]
    fn known_capabilities() {
        let (ok, body) = xtgettcap_reply_body("TN");
        assert!(ok);
        assert_eq!(body, format!("{}={}", "544E", hex_encode(b"xterm-256color")));

        let (ok, body) = xtgettcap_reply_body("XX");
        assert!(!ok);
        assert!(body.is_empty());
    }
}
