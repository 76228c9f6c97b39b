use std::fmt::Display;
use std::sync::Arc;

use http::{Method, StatusCode, Uri};
use poem::{Endpoint, IntoResponse, Request, Response};
use tracing::*;

use crate::common::Services;

pub fn get_client_ip(req: &Request) -> Option<String> {
    let trust_x_forwarded_headers = req
        .data::<Services>()
        .map(|services| services.config.store.http.trust_x_forwarded_headers)
        .unwrap_or(false);

    let remote_ip = req
        .remote_addr()
        .as_socket_addr()
        .map(|x| x.ip().to_string());

    if trust_x_forwarded_headers {
        req.header("x-forwarded-for")
            .map(|x| x.to_string())
            .or(remote_ip)
    } else {
        remote_ip
    }
}

pub fn span_for_request(req: &Request) -> Span {
    let client_ip = get_client_ip(req).unwrap_or("<unknown>".into());
    info_span!("HTTP", %client_ip)
}

pub fn log_request_result(
    method: &Method,
    url: &Uri,
    client_ip: Option<&str>,
    status: &StatusCode,
) {
    let client_ip = client_ip.unwrap_or("<unknown>");
    if status.is_server_error() || status.is_client_error() {
        warn!(%method, %url, %status, %client_ip, "Request failed");
    } else {
        info!(%method, %url, %status, %client_ip, "Request");
    }
}

pub fn log_request_error<E: Display>(
    method: &Method,
    url: &Uri,
    client_ip: Option<&str>,
    error: E,
) {
    let client_ip = client_ip.unwrap_or("<unknown>");
    error!(%method, %url, %error, %client_ip, "Request failed");
}

/// Wraps every request in an `HTTP` span and logs its outcome.
pub async fn log_request<E: Endpoint>(ep: Arc<E>, req: Request) -> poem::Result<Response> {
    let span = span_for_request(&req);
    let method = req.method().clone();
    let url = req.original_uri().clone();
    let client_ip = get_client_ip(&req);

    async move {
        let response = ep
            .call(req)
            .await
            .map(IntoResponse::into_response)
            .inspect_err(|e| log_request_error(&method, &url, client_ip.as_deref(), e))?;
        log_request_result(&method, &url, client_ip.as_deref(), &response.status());
        Ok(response)
    }
    .instrument(span)
    .await
}
