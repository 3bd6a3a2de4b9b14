#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::TestEnv;

#[actix_web::test]
async fn wrong_code_is_refused() {
    let env = TestEnv::new().await;
    let app = init_app!(env.state);

    let req = test::TestRequest::post()
        .uri("/verify-access-code")
        .set_json(json!({ "code": "0000" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().next().is_none());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": false }));
}

#[actix_web::test]
async fn admin_page_requires_the_code() {
    let env = TestEnv::new().await;
    let app = init_app!(env.state);

    let req = test::TestRequest::get().uri("/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("location").unwrap(), "/");

    let req = test::TestRequest::post()
        .uri("/verify-access-code")
        .set_json(json!({ "code": "1234" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let session = resp
        .response()
        .cookies()
        .next()
        .expect("session cookie")
        .into_owned();
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": true }));

    let req = test::TestRequest::get()
        .uri("/admin")
        .cookie(session)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = test::read_body(resp).await;
    assert_eq!(&page[..], b"<h1>admin</h1>");
}

#[actix_web::test]
async fn missing_code_field_is_a_bad_request() {
    let env = TestEnv::new().await;
    let app = init_app!(env.state);

    let req = test::TestRequest::post()
        .uri("/verify-access-code")
        .set_json(json!({ "pin": "1234" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
}

#[actix_web::test]
async fn index_serves_the_tip_page() {
    let env = TestEnv::new().await;
    let app = init_app!(env.state);

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(&body[..], b"<h1>tips</h1>");
}

#[actix_web::test]
async fn logout_closes_the_admin_page() {
    let env = TestEnv::new().await;
    let app = init_app!(env.state);

    let req = test::TestRequest::post()
        .uri("/verify-access-code")
        .set_json(json!({ "code": "1234" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let session = resp
        .response()
        .cookies()
        .next()
        .expect("session cookie")
        .into_owned();

    let req = test::TestRequest::post()
        .uri("/logout")
        .cookie(session.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == session.name())
        .expect("removal cookie")
        .into_owned();
    assert_eq!(cleared.value(), "");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": true }));

    let req = test::TestRequest::get()
        .uri("/admin")
        .cookie(cleared)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("location").unwrap(), "/");
}
