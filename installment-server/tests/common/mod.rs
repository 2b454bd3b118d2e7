#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use installment_server::api::build_app;
use installment_server::db::DbService;
use installment_server::db::repository::{product, salesman};
use installment_server::{Config, ServerState};
use shared::models::{ProductCreate, SalesmanCreate};

pub const BOUNDARY: &str = "----installment-test-boundary";

/// Router over an in-memory database; the temp dir holds uploaded images
pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy(), 0);
        let pool = DbService::open_in_memory().await.unwrap().pool;
        let state = ServerState::new(config, pool.clone());
        Self {
            app: build_app(state),
            pool,
            dir,
        }
    }

    pub async fn product(&self, name: &str, price: f64) -> i64 {
        product::create(
            &self.pool,
            &ProductCreate {
                name: name.into(),
                price,
            },
        )
        .await
        .unwrap()
        .id
    }

    pub async fn salesman(&self, name: &str) -> i64 {
        salesman::create(
            &self.pool,
            &SalesmanCreate {
                name: name.into(),
                email: Some(format!("{}@example.com", name.to_lowercase())),
            },
        )
        .await
        .unwrap()
        .id
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    /// POST the sale form; `image` is `(filename, bytes)`
    pub async fn create_sale(
        &self,
        fields: &[(&str, String)],
        image: Option<(&str, &[u8])>,
    ) -> (StatusCode, Value) {
        let request = Request::post("/api/installment-sales")
            .header(
                http::header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, image)))
            .unwrap();
        self.send(request).await
    }
}

pub fn multipart_body(fields: &[(&str, String)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"customer_image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// A complete flat-profit sale form: price 800 + profit 200, down payment 200
pub fn sale_form(product_id: i64, cnic: &str) -> Vec<(&'static str, String)> {
    vec![
        ("product_id", product_id.to_string()),
        ("customer_name", "Bilal Ahmed".into()),
        ("customer_address", "House 12, Model Town, Lahore".into()),
        ("customer_phone", "0300-1234567".into()),
        ("customer_cnic", cnic.into()),
        ("guarantor_name", "Usman Ahmed".into()),
        ("guarantor_address", "".into()),
        ("guarantor_phone", "0301-7654321".into()),
        ("guarantor_cnic", "35202-7654321-1".into()),
        ("guarantor_relationship", "Brother".into()),
        ("details_price", "800".into()),
        ("details_profit", "200".into()),
        ("details_total", "1000".into()),
        ("details_down_payment", "200".into()),
        ("details_duration", "12".into()),
    ]
}

pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 120, 200]));
    let mut buffer = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut buffer),
        image::ImageFormat::Png,
    )
    .unwrap();
    buffer
}
