//! Throwaway upstream that serves buoy and spot payloads on an ephemeral port.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde_json::{json, Value};
use surfmap::source::{SourceClient, SourceEndpoints};

/// Status and raw body the upstream answers with for one route.
#[derive(Clone)]
pub struct Reply(Arc<Mutex<(StatusCode, String)>>);

impl Reply {
    fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self(Arc::new(Mutex::new((status, body.into()))))
    }

    pub fn set(&self, status: StatusCode, body: impl Into<String>) {
        *self.0.lock().unwrap() = (status, body.into());
    }

    pub fn set_json(&self, value: Value) {
        self.set(StatusCode::OK, value.to_string());
    }
}

async fn answer(State(reply): State<Reply>) -> (StatusCode, String) {
    reply.0.lock().unwrap().clone()
}

pub struct Upstream {
    pub base_url: String,
    pub buoys: Reply,
    pub spots: Reply,
}

impl Upstream {
    pub fn endpoints(&self) -> SourceEndpoints {
        SourceEndpoints {
            buoys_url: format!("{}/buoys", self.base_url),
            spots_url: format!("{}/spots", self.base_url),
        }
    }

    pub fn client(&self) -> SourceClient {
        SourceClient::new(self.endpoints(), Duration::from_secs(5)).expect("client")
    }
}

/// Start an upstream serving `buoys` and `spots` as 200 JSON.
pub async fn spawn_upstream(buoys: Value, spots: Value) -> Upstream {
    let buoy_reply = Reply::new(StatusCode::OK, buoys.to_string());
    let spot_reply = Reply::new(StatusCode::OK, spots.to_string());

    let app = Router::new()
        .route("/buoys", get(answer).with_state(buoy_reply.clone()))
        .route("/spots", get(answer).with_state(spot_reply.clone()))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "{}"
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("upstream server");
    });

    Upstream {
        base_url: format!("http://{}", addr),
        buoys: buoy_reply,
        spots: spot_reply,
    }
}

pub fn buoy(id: i64, name: &str) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [-122.88, 37.75] },
        "properties": { "id": id, "name": name, "category": "buoy" }
    })
}

pub fn spot(id: &str, name: &str) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [-122.03, 36.95] },
        "properties": {
            "id": id,
            "name": name,
            "description": "Right point break",
            "category": "spot",
            "region": "Santa Cruz"
        }
    })
}

pub fn collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}
