//! 请求方 IP 提取。

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

/// 请求方 IP：优先取 `X-Forwarded-For` 的第一项，其次取连接对端地址。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub Option<String>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let ip = forwarded.or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        Ok(ClientIp(ip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> ClientIp {
        let (mut parts, _) = request.into_parts();
        let Ok(ip) = ClientIp::from_request_parts(&mut parts, &()).await;
        ip
    }

    #[tokio::test]
    async fn forwarded_header_wins() {
        let mut request = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(())
            .expect("request");
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));

        assert_eq!(extract(request).await, ClientIp(Some("203.0.113.9".to_string())));
    }

    #[tokio::test]
    async fn falls_back_to_peer_address() {
        let mut request = Request::builder().body(()).expect("request");
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 4], 4000))));

        assert_eq!(extract(request).await, ClientIp(Some("192.0.2.4".to_string())));
    }

    #[tokio::test]
    async fn unknown_without_header_or_peer() {
        let request = Request::builder().body(()).expect("request");

        assert_eq!(extract(request).await, ClientIp(None));
    }
}
