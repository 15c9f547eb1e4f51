//! What a handler hands back, and how it goes over the wire.
//!
//! Handlers return an [`Outcome`]; the front controller turns it into an
//! HTTP response. Page rendering happens outside this service, so a
//! [`Outcome::Page`] is the template name plus its context as JSON.

use agora_core::xrds::{self, xml_escape};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// A 1x1 transparent GIF.
pub const BLANK_GIF: [u8; 43] = [
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

pub(crate) const XML_CONTENT_TYPE: &str = "text/xml; charset=UTF-8";

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Redirect(String),
    Page {
        template: &'static str,
        context: serde_json::Value,
    },
    Xml(String),
    Gif,
    Xrds(String),
}

#[derive(Serialize)]
struct PageBody<'a> {
    template: &'a str,
    context: &'a serde_json::Value,
}

impl Outcome {
    pub fn page(template: &'static str, context: serde_json::Value) -> Self {
        Outcome::Page { template, context }
    }

    /// Emit the outcome. With `xml` set, a redirect becomes
    /// `<smf><redirect url=".."/></smf>` for script clients.
    pub fn render(self, xml: bool) -> Response {
        match self {
            Outcome::Redirect(url) if xml => xml_response(format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<smf><redirect url=\"{}\"/></smf>",
                xml_escape(&url)
            )),
            Outcome::Redirect(url) => (StatusCode::FOUND, [(LOCATION, url)]).into_response(),
            Outcome::Page { template, context } => Json(PageBody {
                template,
                context: &context,
            })
            .into_response(),
            Outcome::Xml(body) => xml_response(body),
            Outcome::Gif => (
                [
                    (CONTENT_TYPE, "image/gif"),
                    (CACHE_CONTROL, "no-store"),
                ],
                BLANK_GIF.to_vec(),
            )
                .into_response(),
            Outcome::Xrds(body) => ([(CONTENT_TYPE, xrds::CONTENT_TYPE)], body).into_response(),
        }
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        self.render(false)
    }
}

pub(crate) fn xml_response(body: String) -> Response {
    ([(CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response()
}
