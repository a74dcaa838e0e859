use crate::domain::{Hello, Iam};
use crate::library::communication::request::{RequestError, Requestor};
use crate::library::communication::CauseChain;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

/// Error body returned to HTTP callers on every failure path
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct HelloQuery {
    out: Option<String>,
}

/// Builds the route tree served by the gateway
///
/// The requestor is injected once and cloned into each route, there is no
/// shared global state behind the handlers.
pub fn routes<R>(requestor: R) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone
where
    R: Requestor + Clone + Send + Sync + 'static,
{
    let hello_requestor = requestor.clone();
    let hello = warp::get()
        .and(warp::path!("api" / "core" / "hello"))
        .and(warp::query::<HelloQuery>())
        .and_then(move |query| handle_hello(hello_requestor.clone(), query))
        .with(warp::trace::named("hello"));

    let iam = warp::get()
        .and(warp::path!("api" / "core" / "iam"))
        .and_then(move || handle_iam(requestor.clone()))
        .with(warp::trace::named("iam"));

    hello.or(iam).with(warp::trace::request())
}

async fn handle_hello<R: Requestor>(
    requestor: R,
    query: HelloQuery,
) -> Result<WithStatus<Json>, Rejection> {
    // Input validation happens before anything touches the bus; an empty
    // value counts as missing just like an absent parameter
    let out = match query.out.filter(|out| !out.is_empty()) {
        Some(out) => out,
        None => {
            debug!("Rejecting hello request without 'out' parameter");
            return Ok(error_reply(
                StatusCode::BAD_REQUEST,
                "missing 'out' parameter".into(),
            ));
        }
    };

    match requestor.request(&Hello { out }).await {
        Ok(reply) => Ok(warp::reply::with_status(
            warp::reply::json(&reply),
            StatusCode::OK,
        )),
        Err(error) => Ok(bus_error_reply(&error)),
    }
}

async fn handle_iam<R: Requestor>(requestor: R) -> Result<WithStatus<Json>, Rejection> {
    match requestor.request(&Iam {}).await {
        Ok(reply) => Ok(warp::reply::with_status(
            warp::reply::json(&reply),
            StatusCode::OK,
        )),
        Err(error) => Ok(bus_error_reply(&error)),
    }
}

fn bus_error_reply(error: &RequestError) -> WithStatus<Json> {
    error!(%error, "Bus request failed");

    error_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("bus request failed: {}", CauseChain::new(error)),
    )
}

fn error_reply(status: StatusCode, error: String) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(&ErrorBody { error }), status)
}
