//! Browser `fetch` transport for wasm32 builds.

use std::future::Future;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::{Transport, TransportError, TransportResponse};

/// Transport that POSTs through `window.fetch`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    async fn post(url: String, body: String) -> Result<TransportResponse, JsValue> {
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_mode(RequestMode::Cors);
        init.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(&url, &init)?;
        request.headers().set("Content-Type", "application/json")?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await?
            .dyn_into()?;

        let status = response.status();
        let text = JsFuture::from(response.text()?).await?;
        Ok(TransportResponse {
            status,
            body: text.as_string().unwrap_or_default(),
        })
    }
}

impl Transport for FetchTransport {
    fn post_json(
        &self,
        url: &str,
        body: String,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> {
        let url = url.to_string();
        async move {
            Self::post(url, body)
                .await
                .map_err(|e| TransportError(e.as_string().unwrap_or_else(|| format!("{e:?}"))))
        }
    }
}
