//! The `POST /analyze` endpoint on top of hyper.

use std::convert::Infallible;
use std::sync::Arc;

use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS, CONTENT_TYPE,
};
use hyper::{Body, Method, Request, Response, StatusCode};
use log::{debug, error};
use multer::Multipart;
use serde_json::{json, Value};

use crate::analyzer::SkinAnalyzer;
use crate::error::{ErrorKind, ServeError};
use crate::pipeline::{analyze_upload, Upload};
use crate::Timer;

pub const ANALYZE_PATH: &str = "/analyze";

/// Multipart field the image is expected under.
pub const IMAGE_FIELD: &str = "image";

pub async fn handle(
    req: Request<Body>,
    analyzer: Arc<dyn SkinAnalyzer>,
) -> Result<Response<Body>, Infallible> {
    debug!("{} {}", req.method(), req.uri());

    let response = match (req.method(), req.uri().path()) {
        (&Method::OPTIONS, _) => preflight(&req),
        (&Method::POST, ANALYZE_PATH) => analyze(req, analyzer.as_ref()).await,
        (_, ANALYZE_PATH) => error_body(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
        _ => error_body(StatusCode::NOT_FOUND, "Not Found"),
    };

    Ok(response)
}

async fn analyze(req: Request<Body>, analyzer: &dyn SkinAnalyzer) -> Response<Body> {
    let mut t = Timer::new_start("Handling request");

    let outcome = match read_upload(req).await {
        Ok(upload) => analyze_upload(upload, analyzer).await,
        Err(err) => Err(err),
    };

    let response = match outcome {
        Ok(outcome) => match outcome.to_json() {
            Ok(body) => json_response(StatusCode::OK, &body),
            Err(err) => {
                error!("Could not serialize response: {}", err);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        },
        Err(err) => error_response(&err),
    };

    t.stop();

    response
}

/// Pull the first file part named `image` out of a multipart body.
///
/// A body that is not `multipart/form-data` carries no files, so it yields
/// `None` rather than an error. Parts named `image` without a filename are
/// plain form values and are skipped.
pub async fn read_upload(req: Request<Body>) -> Result<Option<Upload>, ServeError> {
    let boundary = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok());

    let boundary = match boundary {
        Some(boundary) => boundary,
        None => {
            debug!("Request body is not multipart/form-data");
            return Ok(None);
        }
    };

    let mut multipart = Multipart::new(req.into_body(), boundary);

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(IMAGE_FIELD) || field.file_name().is_none() {
            continue;
        }

        // raw header, `field.content_type()` lowercases it
        let content_type = field
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(str::to_owned);
        let bytes = field.bytes().await.map_err(malformed)?;

        return Ok(Some(Upload {
            content_type,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}

fn malformed(err: multer::Error) -> ServeError {
    ServeError::MalformedUpload(err.to_string())
}

fn error_response(err: &ServeError) -> Response<Body> {
    match err.kind() {
        ErrorKind::Analysis => error!("Error analyzing skin: {}", err),
        _ => error!("{}", err),
    }

    error_body(err.status(), &err.to_string())
}

fn error_body(status: StatusCode, message: &str) -> Response<Body> {
    json_response(status, &json!({ "error": message }))
}

fn json_response(status: StatusCode, body: &Value) -> Response<Body> {
    let mut resp = Response::new(Body::from(body.to_string()));

    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    allow_any_origin(&mut resp);

    resp
}

fn preflight(req: &Request<Body>) -> Response<Body> {
    let mut resp = Response::new(Body::empty());

    *resp.status_mut() = StatusCode::NO_CONTENT;
    allow_any_origin(&mut resp);

    let headers = resp.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, HEAD, POST, OPTIONS, PUT, PATCH, DELETE"),
    );
    if let Some(requested) = req.headers().get(ACCESS_CONTROL_REQUEST_HEADERS) {
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
    }

    resp
}

fn allow_any_origin(resp: &mut Response<Body>) {
    resp.headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
}
