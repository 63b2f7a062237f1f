//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::Value;

use crate::inbound::http::api_scope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::state::test_support::{MockPorts, bearer};
use crate::middleware::Trace;

/// The full `/api` surface, test routes included, over `state`.
pub(crate) fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(api_scope(true))
}

/// Send `request` anonymously and decode the JSON body (`Null` when empty).
pub(crate) async fn call(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    let value = serde_json::from_slice(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
    (status, value)
}

/// Like [`call`] with the test bearer token attached.
pub(crate) async fn call_as(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    call(ports, request.insert_header(bearer())).await
}
