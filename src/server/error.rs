use std::{convert::Infallible, net::SocketAddr};

use log::error;
use serde::Serialize;
use thiserror::Error;
use warp::{
    filters::body::BodyDeserializeError,
    http::StatusCode,
    reject::{MethodNotAllowed, Reject, UnsupportedMediaType},
    Rejection,
    Reply,
};

use crate::strategies::Event;

/// A handler ran but could not produce an answer.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0} handler failed")]
    HandlerFailed(Event),
    #[error("{0} handler panicked")]
    HandlerPanicked(Event),
}

impl Reject for DispatchError {}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}")]
    Bind {
        addr:   SocketAddr,
        #[source]
        source: warp::Error,
    },
}

#[derive(Serialize)]
struct ErrorMessage {
    error:  String,
    status: u16,
}

/// Turns every rejection into a response so that nothing escapes the
/// post-processing filters.
#[allow(clippy::unused_async)]
pub async fn recover(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(e) = err.find::<DispatchError>() {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if let Some(e) = err.find::<UnsupportedMediaType>() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
    } else if let Some(e) = err.find::<MethodNotAllowed>() {
        (StatusCode::METHOD_NOT_ALLOWED, e.to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_owned())
    } else {
        error!("unhandled rejection: {err:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_owned(),
        )
    };

    let body = warp::reply::json(&ErrorMessage {
        error:  message,
        status: status.as_u16(),
    });

    Ok(warp::reply::with_status(body, status))
}
