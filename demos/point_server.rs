//! Point server demo: mounts an [`RpcEndpoint`] under warp.
//!
//! Run with `cargo run --example point_server`, then:
//!
//! ```sh
//! # Generic path: full JSON-RPC envelope
//! curl -X POST http://127.0.0.1:3030/api/ \
//!   -d '{"jsonrpc":"2.0","method":"translate","params":{"p":{"x":1,"y":2},"dx":3,"dy":4},"id":1}'
//!
//! # Per-method path: bare params
//! curl -X POST http://127.0.0.1:3030/api/translate \
//!   -d '{"p":{"x":1,"y":2},"dx":3,"dy":4}'
//!
//! # Machine-readable method listing
//! curl http://127.0.0.1:3030/api/spec
//! ```

use jroh::core::{init_logging, LogConfig};
use jroh::server::schema::{Field, Param, ParamsSchema, Schema};
use jroh::server::{from_typed_fn, spec_document, EndpointBuilder, MethodEntry};
use jroh::{Error, HttpReply, RpcEndpoint};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::Filter;

#[derive(Debug, Serialize, Deserialize)]
struct Point {
    x: i64,
    y: i64,
}

#[derive(Deserialize)]
struct TranslateArgs {
    p: Point,
    dx: i64,
    dy: i64,
}

#[derive(Deserialize)]
struct ScaleArgs {
    p: Point,
    factor: i64,
}

fn point_schema() -> Schema {
    Schema::object(
        "Point",
        vec![
            Field::required("x", Schema::Integer),
            Field::required("y", Schema::Integer),
        ],
    )
}

async fn translate(args: TranslateArgs) -> Result<Point, Error> {
    Ok(Point {
        x: args.p.x + args.dx,
        y: args.p.y + args.dy,
    })
}

async fn scale(args: ScaleArgs) -> Result<Point, Error> {
    Ok(Point {
        x: args.p.x * args.factor,
        y: args.p.y * args.factor,
    })
}

fn build_endpoint() -> RpcEndpoint {
    EndpointBuilder::new()
        .register(
            MethodEntry::new("translate", from_typed_fn(translate))
                .params(ParamsSchema::new(vec![
                    Param::required("p", point_schema()),
                    Param::required("dx", Schema::Integer),
                    Param::required("dy", Schema::Integer),
                ]))
                .returns(point_schema())
                .summary("Move a point by the given offsets."),
        )
        .register(
            MethodEntry::new("scale", from_typed_fn(scale))
                .params(ParamsSchema::new(vec![
                    Param::required("p", point_schema()),
                    Param::required("factor", Schema::Integer),
                ]))
                .returns(point_schema())
                .summary("Scale a point by a factor."),
        )
        .build()
}

fn to_http(reply: HttpReply) -> impl warp::Reply {
    warp::reply::with_status(
        warp::reply::with_header(reply.body, "content-type", reply.content_type),
        warp::http::StatusCode::from_u16(reply.status)
            .unwrap_or(warp::http::StatusCode::INTERNAL_SERVER_ERROR),
    )
}

#[tokio::main]
async fn main() {
    init_logging(&LogConfig::default());

    let endpoint = Arc::new(build_endpoint());

    let spec = {
        let endpoint = Arc::clone(&endpoint);
        warp::path!("api" / "spec").and(warp::get()).map(move || {
            warp::reply::json(&spec_document(endpoint.registry(), "/api"))
        })
    };

    let generic = {
        let endpoint = Arc::clone(&endpoint);
        warp::path!("api")
            .and(warp::post())
            .and(warp::body::bytes())
            .then(move |body: warp::hyper::body::Bytes| {
                let endpoint = Arc::clone(&endpoint);
                async move {
                    let body = String::from_utf8_lossy(&body).into_owned();
                    to_http(endpoint.handle(&body, None).await)
                }
            })
    };

    let per_method = {
        let endpoint = Arc::clone(&endpoint);
        warp::path!("api" / String)
            .and(warp::post())
            .and(warp::body::bytes())
            .then(move |method: String, body: warp::hyper::body::Bytes| {
                let endpoint = Arc::clone(&endpoint);
                async move {
                    let body = String::from_utf8_lossy(&body).into_owned();
                    to_http(endpoint.handle(&body, Some(&method)).await)
                }
            })
    };

    let routes = spec.or(per_method).or(generic);

    tracing::info!("point server listening on 127.0.0.1:3030");
    warp::serve(routes).run(([127, 0, 0, 1], 3030)).await;
}
