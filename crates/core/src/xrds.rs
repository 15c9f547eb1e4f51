//! OpenID 2.0 relying-party discovery document.

use crate::urls::ForumUrl;

pub const CONTENT_TYPE: &str = "application/xrds+xml";

/// Service type advertising where OpenID providers may return to.
pub const RETURN_TO_TYPE: &str = "http://specs.openid.net/auth/2.0/return_to";

/// The XRDS document pointing providers at `?action=openidreturn`.
pub fn discovery_document(urls: &ForumUrl) -> String {
    let return_to = xml_escape(&urls.action("openidreturn", &[]));
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xrds:XRDS xmlns:xrds="xri://$xrds" xmlns="xri://$xrd*($v*2.0)">
	<XRD>
		<Service>
			<Type>{RETURN_TO_TYPE}</Type>
			<URI>{return_to}</URI>
		</Service>
	</XRD>
</xrds:XRDS>
"#
    )
}

/// Escape text for an XML element or attribute.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
