//! HTTP API client.
//!
//! Wraps `fetch` for the `/wallet/create` call.

use crate::dom;
use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};
use ws_api_types::{WalletCreateRequest, WalletCreateResponse};
use ws_wallet_client::{CreateError, WalletCreator, create_url};

/// Determine the API base URL.
///
/// A non-empty `#baseUrl` input wins; otherwise requests stay same-origin
/// (relative `/wallet/create`), leaving routing to the hosting proxy.
pub fn base_url() -> String {
    if let Some(input) = dom::by_id_typed::<web_sys::HtmlInputElement>("baseUrl") {
        let v = input.value().trim().to_string();
        if !v.is_empty() {
            return v.trim_end_matches('/').to_string();
        }
    }
    String::new()
}

/// Raw outcome of a fetch: status code, `ok` flag, body text.
struct FetchReply {
    status: u16,
    ok: bool,
    text: String,
}

async fn post_json(url: &str, body: &str) -> Result<FetchReply, String> {
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);

    let headers = Headers::new().map_err(|e| format!("{:?}", e))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| format!("{:?}", e))?;
    opts.set_headers(&headers);
    opts.set_body(&JsValue::from_str(body));

    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| format!("{:?}", e))?;

    let window = dom::window().map_err(|e| format!("{:?}", e))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("fetch error: {:?}", e))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| "response is not a Response".to_string())?;

    let text = JsFuture::from(resp.text().map_err(|e| format!("{:?}", e))?)
        .await
        .map_err(|e| format!("text error: {:?}", e))?;

    Ok(FetchReply {
        status: resp.status(),
        ok: resp.ok(),
        text: text.as_string().unwrap_or_default(),
    })
}

/// `fetch`-backed wallet creator. Resolves the base URL on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchWalletCreator;

#[async_trait(?Send)]
impl WalletCreator for FetchWalletCreator {
    async fn create_wallet(
        &self,
        request: &WalletCreateRequest,
    ) -> Result<WalletCreateResponse, CreateError> {
        let body =
            serde_json::to_string(request).map_err(|e| CreateError::Transport(e.to_string()))?;
        let reply = post_json(&create_url(&base_url()), &body)
            .await
            .map_err(CreateError::Transport)?;

        if !reply.ok {
            return Err(CreateError::Status {
                status: reply.status,
                body: reply.text,
            });
        }

        serde_json::from_str(&reply.text).map_err(|e| CreateError::Malformed(e.to_string()))
    }
}
