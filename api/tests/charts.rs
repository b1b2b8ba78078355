use std::sync::Arc;

use axum::http::{
    HeaderValue, StatusCode,
    header::{CONTENT_TYPE, ETAG, IF_NONE_MATCH},
};
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use chrono::{Days, NaiveDate};
use foodcast_api::{
    application::http::server::{
        api_entities::api_error::ApiErrorResponse,
        http_server::{router, state},
    },
    args::Args,
};
use foodcast_core::domain::chart::entities::GeneratedCharts;
use tempfile::TempDir;
use test_context::{AsyncTestContext, test_context};

const HEADER: &str = "Fecha,Tipo de Alimento,Cantidad Consumida (gr)\n";
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
const WEEK: [f64; 7] = [320.0, 280.0, 300.0, 310.0, 360.0, 420.0, 250.0];

struct ApiContext {
    server: TestServer,
    output_dir: TempDir,
}

impl AsyncTestContext for ApiContext {
    async fn setup() -> Self {
        let output_dir = TempDir::new().unwrap();

        let mut args = Args::default();
        args.storage.output_dir = output_dir.path().join("graphs");
        args.server.metrics_enabled = false;

        let app_state = state(Arc::new(args)).await.unwrap();
        let server = TestServer::new(router(app_state).unwrap()).unwrap();

        Self { server, output_dir }
    }

    async fn teardown(self) {}
}

/// Two categories per day with a weekly rhythm and a few skipped days
fn consumption_csv(days: u64) -> String {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut csv = HEADER.to_string();
    for day in 0..days {
        if day % 11 == 5 {
            continue;
        }
        let date = start.checked_add_days(Days::new(day)).unwrap();
        let t = day as f64;
        let fruit = WEEK[(day % 7) as usize] + 25.0 * (t * 0.45).sin();
        let vegetables = 150.0 + 0.8 * t + 10.0 * (t * 1.3).cos();
        csv.push_str(&format!("{date},Fruta,{fruit:.2}\n"));
        csv.push_str(&format!("{date},Verdura,{vegetables:.2}\n"));
    }
    csv
}

fn csv_form(filename: &str, content: String) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(content.into_bytes())
            .file_name(filename)
            .mime_type("text/csv"),
    )
}

#[test_context(ApiContext)]
#[tokio::test]
async fn test_generate_then_download_each_chart(ctx: &mut ApiContext) {
    let response = ctx
        .server
        .post("/generate-graphs/")
        .multipart(csv_form("consumo.csv", consumption_csv(60)))
        .await;
    response.assert_status_ok();

    let generated = response.json::<GeneratedCharts>();
    let run = generated.run_id.simple().to_string();

    for name in [
        &generated.pie_chart,
        &generated.line_chart,
        &generated.prediction_chart,
    ] {
        assert!(name.starts_with(&run), "{name}");

        let download = ctx
            .server
            .get("/download-graph/")
            .add_query_param("filename", name)
            .await;
        download.assert_status_ok();
        assert_eq!(
            download.headers().get(CONTENT_TYPE).unwrap(),
            &HeaderValue::from_static("image/png")
        );

        let bytes = download.as_bytes().clone();
        assert_eq!(bytes[..8], PNG_SIGNATURE);

        let on_disk = std::fs::read(ctx.output_dir.path().join("graphs").join(name)).unwrap();
        assert_eq!(bytes.as_ref(), on_disk.as_slice());
    }
}

#[test_context(ApiContext)]
#[tokio::test]
async fn test_download_honours_if_none_match(ctx: &mut ApiContext) {
    let generated = ctx
        .server
        .post("/generate-graphs")
        .multipart(csv_form("consumo.csv", consumption_csv(45)))
        .await
        .json::<GeneratedCharts>();

    let first = ctx
        .server
        .get("/download-graph")
        .add_query_param("filename", &generated.line_chart)
        .await;
    first.assert_status_ok();
    let etag = first.headers().get(ETAG).unwrap().clone();

    let second = ctx
        .server
        .get("/download-graph/")
        .add_query_param("filename", &generated.line_chart)
        .add_header(IF_NONE_MATCH, etag)
        .await;
    second.assert_status(StatusCode::NOT_MODIFIED);
}

#[test_context(ApiContext)]
#[tokio::test]
async fn test_each_run_gets_its_own_files(ctx: &mut ApiContext) {
    let first = ctx
        .server
        .post("/generate-graphs/")
        .multipart(csv_form("consumo.csv", consumption_csv(40)))
        .await
        .json::<GeneratedCharts>();
    let second = ctx
        .server
        .post("/generate-graphs/")
        .multipart(csv_form("consumo.csv", consumption_csv(50)))
        .await
        .json::<GeneratedCharts>();

    assert_ne!(first.run_id, second.run_id);
    assert_ne!(first.prediction_chart, second.prediction_chart);

    let files = std::fs::read_dir(ctx.output_dir.path().join("graphs"))
        .unwrap()
        .count();
    assert_eq!(files, 6);
}

#[test_context(ApiContext)]
#[tokio::test]
async fn test_non_csv_upload_is_rejected(ctx: &mut ApiContext) {
    let response = ctx
        .server
        .post("/generate-graphs/")
        .multipart(csv_form("consumo.xlsx", consumption_csv(30)))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error = response.json::<ApiErrorResponse>();
    assert_eq!(error.code, "E_BAD_REQUEST");
    assert_eq!(error.status, 400);
}

#[test_context(ApiContext)]
#[tokio::test]
async fn test_missing_columns_are_named(ctx: &mut ApiContext) {
    let response = ctx
        .server
        .post("/generate-graphs/")
        .multipart(csv_form(
            "consumo.csv",
            "Fecha,Tipo de Alimento\n2024-01-01,Fruta\n".to_string(),
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error = response.json::<ApiErrorResponse>();
    assert!(error.message.contains("Cantidad Consumida (gr)"), "{}", error.message);
}

#[test_context(ApiContext)]
#[tokio::test]
async fn test_missing_file_field_is_rejected(ctx: &mut ApiContext) {
    let response = ctx
        .server
        .post("/generate-graphs/")
        .multipart(MultipartForm::new().add_text("notes", "no file here"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(ApiContext)]
#[tokio::test]
async fn test_too_short_history_is_unprocessable(ctx: &mut ApiContext) {
    let response = ctx
        .server
        .post("/generate-graphs/")
        .multipart(csv_form("consumo.csv", consumption_csv(10)))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let error = response.json::<ApiErrorResponse>();
    assert!(error.message.contains("SARIMA"), "{}", error.message);

    let files = std::fs::read_dir(ctx.output_dir.path().join("graphs"))
        .unwrap()
        .count();
    assert_eq!(files, 0);
}

#[test_context(ApiContext)]
#[tokio::test]
async fn test_date_span_is_bounded(ctx: &mut ApiContext) {
    let sparse = format!("{HEADER}2000-01-01,Fruta,100\n2030-01-01,Fruta,120\n");
    let response = ctx
        .server
        .post("/generate-graphs/")
        .multipart(csv_form("consumo.csv", sparse))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let error = response.json::<ApiErrorResponse>();
    assert!(error.message.contains("at most 3660"), "{}", error.message);

    let far_years = format!("{HEADER}0001-01-01,Fruta,100\n9999-12-31,Fruta,120\n");
    ctx.server
        .post("/generate-graphs/")
        .multipart(csv_form("consumo.csv", far_years))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let files = std::fs::read_dir(ctx.output_dir.path().join("graphs"))
        .unwrap()
        .count();
    assert_eq!(files, 0);
}

#[test_context(ApiContext)]
#[tokio::test]
async fn test_download_unknown_chart_is_not_found(ctx: &mut ApiContext) {
    let response = ctx
        .server
        .get("/download-graph/")
        .add_query_param("filename", "never_generated.png")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<ApiErrorResponse>().code, "E_NOT_FOUND");
}

#[test_context(ApiContext)]
#[tokio::test]
async fn test_download_rejects_path_traversal(ctx: &mut ApiContext) {
    for filename in ["../Cargo.toml", "../../etc/passwd.png", ".hidden.png", "graphs/x.png"] {
        let response = ctx
            .server
            .get("/download-graph/")
            .add_query_param("filename", filename)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    ctx.server
        .get("/download-graph/")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(ApiContext)]
#[tokio::test]
async fn test_health_checks(ctx: &mut ApiContext) {
    ctx.server.get("/health/live").await.assert_status_ok();
    ctx.server.get("/health/ready").await.assert_status_ok();

    std::fs::remove_dir_all(ctx.output_dir.path().join("graphs")).unwrap();
    ctx.server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    ctx.server.get("/health/live").await.assert_status_ok();
}

#[test_context(ApiContext)]
#[tokio::test]
async fn test_openapi_document_lists_routes(ctx: &mut ApiContext) {
    let response = ctx.server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();

    let document = response.text();
    assert!(document.contains("/generate-graphs/"));
    assert!(document.contains("/download-graph/"));
    assert!(document.contains("/health/ready"));
}
