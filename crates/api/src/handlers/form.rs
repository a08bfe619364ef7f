use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::Local;
use serde::Deserialize;
use tracing::{error, warn};

use cases::{BusinessCaseForm, CaseId, PersistenceError};

use super::AppState;
use crate::render::{render_page, Banner};

const UNREADABLE_SUBMISSION: &str =
    "The submission could not be read. Please fill in the form again.";

/// Query string of `GET /`.
///
/// The success banner is driven purely by `saved`, so a reload or bookmark
/// of `/?saved=<id>` shows it again, and a hand-typed positive id shows a
/// banner for a case nobody saved in this browser. Non-numeric and
/// non-positive ids are ignored since the database never assigns them.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Id of the case saved by the previous request, if any.
    pub saved: Option<String>,
}

impl PageQuery {
    fn saved_id(&self) -> Option<CaseId> {
        self.saved
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(CaseId)
    }
}

/// GET / — a fresh form, plus the success banner after a redirect.
pub async fn show(Query(query): Query<PageQuery>) -> Html<String> {
    let banner = query.saved_id().map(Banner::Saved);

    let form = BusinessCaseForm::blank(Local::now().date_naive());
    Html(render_page(&form, banner.as_ref()))
}

/// POST / — validate, then save.
///
/// Invalid input never reaches the gateway. A failed save re-renders the
/// submitted values so the user can try again.
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<BusinessCaseForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("unreadable business case submission: {rejection}");
            let blank = BusinessCaseForm::blank(Local::now().date_naive());
            let banner = Banner::Invalid(UNREADABLE_SUBMISSION.to_owned());
            return (rejection.status(), Html(render_page(&blank, Some(&banner)))).into_response();
        }
    };

    let record = match form.validate() {
        Ok(record) => record,
        Err(e) => {
            warn!("business case rejected: {e}");
            let banner = Banner::Invalid(e.to_string());
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(render_page(&form, Some(&banner))))
                .into_response();
        }
    };

    match state.gateway.save(&record, &state.config).await {
        Ok(id) => Redirect::to(&format!("/?saved={id}")).into_response(),
        Err(e) => {
            error!("failed to save business case: {e}");
            let status = match e {
                PersistenceError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
                PersistenceError::Constraint(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let banner = Banner::Failed(e.user_message().to_owned());
            (status, Html(render_page(&form, Some(&banner)))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use cases::mock::MockGateway;
    use cases::{BenefitUnit, Department};
    use db::{ConnectionConfig, Driver};

    use crate::{router, AppState};

    fn app(gateway: &MockGateway) -> Router {
        let config = ConnectionConfig::new("db.test", 1433, "cases", "intake", "pw", Driver::SqlServer);
        router(AppState::new(Arc::new(gateway.clone()), config))
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    const VALID: &str = "title=Expand+warehouse\
        &description=Add+a+second+loading+bay\
        &responsible_person=J.+Doe\
        &department=Operations\
        &expected_benefit=50000\
        &benefit_unit=USD\
        &start_date=2025-01-06\
        &end_date=2025-06-30\
        &additional_notes=";

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn get_renders_the_form() {
        let gateway = MockGateway::returning(1);
        let response = app(&gateway)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<h1>Business Case Entry</h1>"));
        assert!(!html.contains("saved successfully"));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn get_after_save_shows_the_id() {
        let gateway = MockGateway::returning(1);
        let response = app(&gateway)
            .oneshot(Request::builder().uri("/?saved=31").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let html = body_text(response).await;
        assert!(html.contains("Your business case ID is: 31."));
    }

    #[tokio::test]
    async fn garbage_saved_param_is_ignored() {
        let gateway = MockGateway::returning(1);
        let response = app(&gateway)
            .oneshot(Request::builder().uri("/?saved=abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!body_text(response).await.contains("saved successfully"));
    }

    #[tokio::test]
    async fn valid_submission_saves_once_and_redirects() {
        let gateway = MockGateway::returning(7);
        let response = app(&gateway).oneshot(post(VALID)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/?saved=7");

        let saved = gateway.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title, "Expand warehouse");
        assert_eq!(saved[0].expected_benefit, 50000.0);
        assert_eq!(saved[0].responsible_person, "J. Doe");
        assert_eq!(saved[0].department, Department::Operations);
        assert_eq!(saved[0].benefit_unit, BenefitUnit::Usd);
        assert_eq!(saved[0].additional_notes, None);
    }

    #[tokio::test]
    async fn empty_title_shows_inline_message_without_saving() {
        let gateway = MockGateway::returning(7);
        let body = VALID.replace("title=Expand+warehouse", "title=");
        let response = app(&gateway).oneshot(post(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Missing: Business Case Title."));
        assert!(html.contains("value=\"J. Doe\""), "submitted values are kept");
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn unreachable_database_shows_error_banner() {
        let gateway = MockGateway::unreachable();
        let response = app(&gateway).oneshot(post(VALID)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let html = body_text(response).await;
        assert!(html.contains("database is unavailable"));
        assert!(html.contains("value=\"Expand warehouse\""));
        assert!(!html.contains("connection refused"), "driver detail stays in the log");
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn rejected_row_shows_error_banner() {
        let gateway = MockGateway::rejecting("value too long");
        let response = app(&gateway).oneshot(post(VALID)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = body_text(response).await;
        assert!(html.contains("rejected the business case"));
        assert!(!html.contains("database is unavailable"));
    }

    #[tokio::test]
    async fn non_positive_saved_param_is_ignored() {
        let gateway = MockGateway::returning(1);
        for uri in ["/?saved=0", "/?saved=-3"] {
            let response = app(&gateway)
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert!(!body_text(response).await.contains("saved successfully"), "{uri}");
        }
    }

    #[tokio::test]
    async fn unreadable_body_renders_the_page_without_saving() {
        let gateway = MockGateway::returning(7);
        let body = format!("{VALID}&title=Second+title");
        let response = app(&gateway).oneshot(post(&body)).await.unwrap();

        assert!(response.status().is_client_error());
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let html = body_text(response).await;
        assert!(html.contains("could not be read"));
        assert!(html.contains("<h1>Business Case Entry</h1>"));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_content_type_renders_the_page() {
        let gateway = MockGateway::returning(7);
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(VALID))
            .unwrap();
        let response = app(&gateway).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body_text(response).await.contains("could not be read"));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn form_is_usable_again_after_a_failure() {
        let gateway = MockGateway::unreachable();
        let app = app(&gateway);

        for _ in 0..2 {
            let response = app.clone().oneshot(post(VALID)).await.unwrap();
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        }
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let gateway = MockGateway::returning(1);
        let response = app(&gateway)
            .oneshot(Request::builder().uri("/reports").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
