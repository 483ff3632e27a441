//! Response envelope shared by the public data portal (data.go.kr) APIs.
//!
//! JSON answers look like
//! `{"response": {"header": {"resultCode": "00", "resultMsg": ".."}, "body": {..}}}`.
//! The portal gateway itself answers key and quota failures with an XML
//! `OpenAPI_ServiceResponse` document, whatever format was requested.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{UpstreamError, UpstreamResult};

/// Result code for a normal answer.
pub const RESULT_OK: &str = "00";

#[derive(Debug, Deserialize)]
struct Envelope<B> {
    response: Response<B>,
}

#[derive(Debug, Deserialize)]
struct Response<B> {
    header: Header,
    body: Option<B>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Header {
    #[serde(rename = "resultCode")]
    pub result_code: String,
    #[serde(rename = "resultMsg", default)]
    pub result_msg: String,
}

impl Header {
    /// Fail unless the header carries the OK sentinel.
    pub(crate) fn check(&self) -> UpstreamResult<()> {
        if self.result_code.trim() == RESULT_OK {
            Ok(())
        } else {
            Err(UpstreamError::protocol(self.result_code.trim(), self.result_msg.trim()))
        }
    }
}

/// Decode a JSON envelope, checking the result code before the body is
/// trusted.
pub fn parse_json<B: DeserializeOwned>(text: &str) -> UpstreamResult<B> {
    if looks_like_xml(text) {
        return Err(parse_gateway_error(text));
    }

    let envelope: Envelope<B> = serde_json::from_str(text)?;
    envelope.response.header.check()?;
    envelope
        .response
        .body
        .ok_or_else(|| UpstreamError::EmptyResult("response has no body".to_string()))
}

pub(crate) fn looks_like_xml(text: &str) -> bool {
    text.trim_start().starts_with('<')
}

pub(crate) fn is_gateway_error(text: &str) -> bool {
    text.contains("OpenAPI_ServiceResponse")
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    #[serde(rename = "cmmMsgHeader")]
    header: GatewayHeader,
}

#[derive(Debug, Deserialize)]
struct GatewayHeader {
    #[serde(rename = "errMsg", default)]
    err_msg: Option<String>,
    #[serde(rename = "returnAuthMsg", default)]
    return_auth_msg: Option<String>,
    #[serde(rename = "returnReasonCode", default)]
    return_reason_code: Option<String>,
}

/// Turn an XML body into the error it carries.
///
/// Anything that is not a recognisable gateway error is reported as
/// malformed, since JSON was expected.
pub fn parse_gateway_error(text: &str) -> UpstreamError {
    if !is_gateway_error(text) {
        return UpstreamError::Malformed("unexpected XML response".to_string());
    }

    match quick_xml::de::from_str::<GatewayResponse>(text) {
        Ok(doc) => {
            let code = doc.header.return_reason_code.unwrap_or_else(|| "gateway".to_string());
            let message = doc
                .header
                .return_auth_msg
                .or(doc.header.err_msg)
                .unwrap_or_else(|| "gateway error".to_string());
            UpstreamError::protocol(code.trim(), message.trim())
        }
        Err(e) => e.into(),
    }
}
