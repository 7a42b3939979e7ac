use axum::{routing::get, Router};

async fn status() -> &'static str {
    "ok"
}

pub fn routes() -> Router {
    Router::new().route("/status", get(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_status() {
        let request = Request::builder().uri("/status").body(Body::empty()).unwrap();
        let response = routes().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ok");
    }
}
