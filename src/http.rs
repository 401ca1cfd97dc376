//! HTTP Module
//!
//! 抽出パイプラインをaxumのルーターとして公開する薄い境界層。
//!
//! | メソッド | パス | 出力 |
//! |---|---|---|
//! | GET  | `/` | 稼働確認テキスト |
//! | POST | `/kpi/extract`, `/kpi/status` | KPI行 |
//! | POST | `/documents/` | 索引用ドキュメント |
//! | POST | `/fingerprints/` | 内容指紋 |
//!
//! POSTはいずれもmultipartの`file`フィールドでワークブックを受け取ります。
//! 末尾スラッシュの有無はどちらでも受け付けます。

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::builder::Extractor;
use crate::error::ExtractError;

/// multipartの区切りやヘッダー分の余裕
const MULTIPART_OVERHEAD: usize = 64 * 1024;

const HEALTH_MESSAGE: &str = "Quarterly Report API is running!";

type Pipeline<T> = fn(&Extractor, &[u8], &str) -> Result<Vec<T>, ExtractError>;

/// ルーターを構築する
///
/// リクエストボディの上限は`SecurityConfig::max_input_file_size`に従います。
pub fn router(extractor: Arc<Extractor>) -> Router {
    let body_limit = usize::try_from(extractor.security().max_input_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(health))
        .route("/kpi/extract", post(kpi_rows))
        .route("/kpi/status", post(kpi_rows))
        .route("/documents", post(documents))
        .route("/documents/", post(documents))
        .route("/fingerprints", post(fingerprints))
        .route("/fingerprints/", post(fingerprints))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(extractor)
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

async fn kpi_rows(State(extractor): State<Arc<Extractor>>, multipart: Multipart) -> Response {
    run_pipeline(extractor, multipart, Extractor::kpi_rows).await
}

async fn documents(State(extractor): State<Arc<Extractor>>, multipart: Multipart) -> Response {
    run_pipeline(extractor, multipart, Extractor::documents).await
}

async fn fingerprints(State(extractor): State<Arc<Extractor>>, multipart: Multipart) -> Response {
    run_pipeline(extractor, multipart, Extractor::fingerprints).await
}

/// アップロードされたファイル
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// multipartから`file`フィールドを読み取る
///
/// フィールドがなければ`Ok(None)`、本文の読み取りに失敗した場合はエラーレスポンスを返します。
/// multipartの区切りが壊れている場合はログに残し、フィールドなしとして扱います。
async fn read_upload(mut multipart: Multipart) -> Result<Option<Upload>, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(status = %e.status(), error = %e.body_text(), "malformed multipart body");
                break;
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        return match field.bytes().await {
            Ok(bytes) => Ok(Some(Upload {
                filename,
                bytes: bytes.to_vec(),
            })),
            Err(e) => Err(error_response(e.status(), e.body_text())),
        };
    }
    Ok(None)
}

async fn run_pipeline<T>(
    extractor: Arc<Extractor>,
    multipart: Multipart,
    pipeline: Pipeline<T>,
) -> Response
where
    T: Serialize + Send + 'static,
{
    let upload = match read_upload(multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return error_response(StatusCode::BAD_REQUEST, "file missing".to_string()),
        Err(response) => return response,
    };

    let filename = upload.filename.clone();
    let result = tokio::task::spawn_blocking(move || {
        pipeline(extractor.as_ref(), &upload.bytes, &upload.filename)
    })
    .await;

    match result {
        Ok(Ok(records)) => Json(records).into_response(),
        Ok(Err(e)) => {
            warn!(filename = %filename, error = %e, "extraction failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            warn!(filename = %filename, error = %e, "extraction task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
