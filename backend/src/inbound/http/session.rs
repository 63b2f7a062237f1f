//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers take a [`CurrentUser`] argument to require authentication. The
//! extractor reads `Authorization: Bearer <token>` and resolves it through the
//! [`SessionQuery`](crate::domain::ports::SessionQuery) port, so handlers only
//! ever see a domain [`Principal`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Principal};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct CurrentUser(Principal);

impl CurrentUser {
    /// Principal resolved from the bearer token.
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Authorization header required"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Invalid authorization header"))?;
    match value.trim().split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.trim().is_empty() =>
        {
            Ok(token.trim().to_owned())
        }
        _ => Err(Error::unauthorized("Invalid authorization header")),
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            state.sessions.authenticate(&token).await.map(CurrentUser)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::principal;
    use crate::inbound::http::state::test_support::{MockPorts, TEST_TOKEN};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;

    async fn call_with(header: Option<String>) -> (StatusCode, String) {
        let caller = principal(false);
        let expected = caller.id().to_string();
        let state = MockPorts::authenticated_as(caller).into_state();
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).route(
                "/whoami",
                web::get().to(|user: CurrentUser| async move {
                    HttpResponse::Ok().body(user.principal().id().to_string())
                }),
            ),
        )
        .await;
        let mut request = test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            request = request.insert_header(("Authorization", value));
        }
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        let body = String::from_utf8(body.to_vec()).expect("utf8 body");
        if status == StatusCode::OK {
            assert_eq!(body, expected);
        }
        (status, body)
    }

    #[rstest]
    #[case::bearer(format!("Bearer {TEST_TOKEN}"))]
    #[case::lower_case_scheme(format!("bearer {TEST_TOKEN}"))]
    #[actix_web::test]
    async fn valid_bearer_tokens_resolve_the_caller(#[case] header: String) {
        let (status, _) = call_with(Some(header)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[case::missing(None)]
    #[case::basic_scheme(Some("Basic dXNlcjpwYXNz".to_owned()))]
    #[case::empty_token(Some("Bearer ".to_owned()))]
    #[case::no_scheme(Some(TEST_TOKEN.to_owned()))]
    #[case::unknown_token(Some("Bearer forged".to_owned()))]
    #[actix_web::test]
    async fn anything_else_is_unauthorised(#[case] header: Option<String>) {
        let (status, body) = call_with(header).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("\"code\":\"unauthorized\""));
    }
}
