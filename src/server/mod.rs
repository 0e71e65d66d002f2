//! HTTP surface of the snake.
//!
//! [`routes`] builds the complete warp filter: the four protocol endpoints,
//! rejection recovery, access logging and the identifying `server` header.
//! A host that owns its own listener can serve that filter directly; for the
//! standalone case [`Server`] binds and runs it.

mod error;

use std::{convert::Infallible, future::Future, net::SocketAddr, sync::Arc};

pub use error::{recover, DispatchError, ServerError};
use log::{error, info};
use warp::{Filter, Rejection, Reply};

use crate::{
    config::Config,
    fightsnake::models::GameState,
    strategies::{Event, Strategy},
};

/// Value of the `server` header stamped on every response.
pub const SERVER_ID: &str = "battlesnake/github/starter-snake-python";

/// Log target of the per-request access log.
pub const ACCESS_LOG: &str = "starter_snake::access";

fn with_strategy(
    strategy: Arc<dyn Strategy>,
) -> impl Filter<Extract = (Arc<dyn Strategy>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&strategy))
}

/// Runs one handler call on the blocking pool. A slow strategy then only
/// holds up its own request, and a panicking one only fails its own request.
async fn dispatch<T, F>(
    event: Event,
    strategy: Arc<dyn Strategy>,
    call: F,
) -> Result<T, Rejection>
where
    T: Send + 'static,
    F: FnOnce(&dyn Strategy) -> color_eyre::Result<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || call(strategy.as_ref())).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(report)) => {
            error!("{event} handler failed: {report:?}");
            Err(warp::reject::custom(DispatchError::HandlerFailed(event)))
        }
        Err(join_error) => {
            error!("{event} handler panicked: {join_error}");
            Err(warp::reject::custom(DispatchError::HandlerPanicked(event)))
        }
    }
}

async fn on_info(strategy: Arc<dyn Strategy>) -> Result<impl Reply, Rejection> {
    let status = dispatch(Event::Info, strategy, |s| Ok(s.info())).await?;
    Ok(warp::reply::json(&status))
}

async fn on_start(
    game_state: GameState,
    strategy: Arc<dyn Strategy>,
) -> Result<impl Reply, Rejection> {
    dispatch(Event::Start, strategy, move |s| s.start(&game_state)).await?;
    Ok("ok")
}

async fn on_move(
    game_state: GameState,
    strategy: Arc<dyn Strategy>,
) -> Result<impl Reply, Rejection> {
    let movement = dispatch(Event::Move, strategy, move |s| {
        s.get_movement(&game_state)
    })
    .await?;
    Ok(warp::reply::json(&movement))
}

async fn on_end(
    game_state: GameState,
    strategy: Arc<dyn Strategy>,
) -> Result<impl Reply, Rejection> {
    dispatch(Event::End, strategy, move |s| s.end(&game_state)).await?;
    Ok("ok")
}

/// The complete filter for the given strategy.
pub fn routes(
    strategy: Arc<dyn Strategy>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let healthz = warp::path::end()
        .and(warp::get())
        .and(with_strategy(Arc::clone(&strategy)))
        .and_then(on_info);

    let start = warp::path!("start")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_strategy(Arc::clone(&strategy)))
        .and_then(on_start);

    let do_move = warp::path!("move")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_strategy(Arc::clone(&strategy)))
        .and_then(on_move);

    let end = warp::path!("end")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_strategy(strategy))
        .and_then(on_end);

    healthz
        .or(start)
        .or(do_move)
        .or(end)
        .recover(recover)
        .with(warp::log(ACCESS_LOG))
        .with(warp::reply::with::header("server", SERVER_ID))
}

/// The snake's single server instance.
pub struct Server {
    config:   Config,
    strategy: Arc<dyn Strategy>,
}

impl Server {
    #[must_use]
    pub fn new(config: Config, strategy: Arc<dyn Strategy>) -> Self {
        Self { config, strategy }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
        routes(Arc::clone(&self.strategy))
    }

    /// Binds the configured address. The returned future serves requests
    /// until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Fails when the address cannot be bound.
    pub fn bind(
        &self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(SocketAddr, impl Future<Output = ()>), ServerError> {
        let addr = self.config.addr();
        warp::serve(self.routes())
            .try_bind_with_graceful_shutdown(addr, shutdown)
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Serves in the foreground until interrupted with ctrl-c.
    ///
    /// # Errors
    ///
    /// Fails when the address cannot be bound.
    pub async fn run(&self) -> Result<(), ServerError> {
        let (addr, serving) = self.bind(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("failed to listen for ctrl-c: {e}");
                std::future::pending::<()>().await;
            }
        })?;

        info!("listening on {addr}");
        serving.await;
        info!("shut down");

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use color_eyre::eyre::eyre;
    use serde_json::{json, Value};
    use warp::{
        http::{header, StatusCode},
        hyper::body::Bytes,
        test::request,
    };

    use super::*;
    use crate::{
        fightsnake::{models::Movement, types::Direction},
        strategies::{fallback, resolve, HandlerRegistry},
    };

    fn fallback_routes(
    ) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone + 'static {
        routes(resolve(None).unwrap())
    }

    fn json_body(body: &Bytes) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    fn assert_identified<B>(res: &warp::http::Response<B>) {
        let values: Vec<_> = res
            .headers()
            .get_all(header::SERVER)
            .iter()
            .map(|value| value.to_str().unwrap())
            .collect();
        assert_eq!(values, [SERVER_ID]);
    }

    #[tokio::test]
    async fn info_reports_fallback_identity() {
        let api = fallback_routes();
        let res = request().method("GET").path("/").reply(&api).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert_identified(&res);

        let body = json_body(res.body());
        assert_eq!(body["apiversion"], "1");
        for field in ["author", "color", "head", "tail"] {
            assert!(!body[field].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn info_is_idempotent() {
        let api = fallback_routes();
        let first = request().path("/").reply(&api).await;
        request()
            .method("POST")
            .path("/start")
            .json(&json!({}))
            .reply(&api)
            .await;
        let second = request().path("/").reply(&api).await;
        assert_eq!(first.body(), second.body());
    }

    #[tokio::test]
    async fn start_and_end_answer_ok() {
        let api = fallback_routes();
        for path in ["/start", "/end"] {
            for state in [json!({}), json!({"game": {"id": "g"}, "turn": 0}), json!(7)]
            {
                let res = request()
                    .method("POST")
                    .path(path)
                    .json(&state)
                    .reply(&api)
                    .await;
                assert_eq!(res.status(), StatusCode::OK, "{path}");
                assert_eq!(res.body().as_ref(), b"ok");
                assert_identified(&res);
            }
        }
    }

    #[tokio::test]
    async fn fallback_moves_up() {
        let api = fallback_routes();
        let res = request()
            .method("POST")
            .path("/move")
            .json(&json!({"turn": 3, "board": {}, "you": {}}))
            .reply(&api)
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert_identified(&res);
        assert_eq!(json_body(res.body()), json!({"move": "up"}));
    }

    #[tokio::test]
    async fn moves_are_always_a_direction() {
        let registry = fallback::registry()
            .on_move(|state| {
                let turn = state.turn().unwrap_or(0);
                let direction = Direction::iter()
                    .copied()
                    .cycle()
                    .nth(usize::try_from(turn).unwrap_or(0))
                    .unwrap_or(Direction::Up);
                Ok(Movement::new(direction).with_shout(format!("turn {turn}")))
            })
            .build()
            .unwrap();
        let api = routes(Arc::new(registry));

        for turn in 0..8 {
            let res = request()
                .method("POST")
                .path("/move")
                .json(&json!({ "turn": turn }))
                .reply(&api)
                .await;
            assert_eq!(res.status(), StatusCode::OK);

            let body = json_body(res.body());
            let movement = body["move"].as_str().unwrap();
            assert!(["up", "down", "left", "right"].contains(&movement));
            assert_eq!(body["shout"], format!("turn {turn}"));
        }
    }

    #[tokio::test]
    async fn bad_bodies_are_client_errors() {
        let api = fallback_routes();
        for path in ["/start", "/move", "/end"] {
            for body in ["", "{", "not json", "{\"turn\": }"] {
                let res = request()
                    .method("POST")
                    .path(path)
                    .body(body)
                    .reply(&api)
                    .await;
                assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path} {body:?}");
                assert_identified(&res);
            }
        }
    }

    #[tokio::test]
    async fn wrong_content_type_is_a_client_error() {
        let api = fallback_routes();
        let res = request()
            .method("POST")
            .path("/move")
            .header("content-type", "text/plain")
            .body("{}")
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_identified(&res);
    }

    #[tokio::test]
    async fn serves_after_malformed_request() {
        let api = fallback_routes();
        let res = request().method("POST").path("/move").reply(&api).await;
        assert!(res.status().is_client_error());

        let res = request()
            .method("POST")
            .path("/move")
            .json(&json!({}))
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res.body()), json!({"move": "up"}));
    }

    #[tokio::test]
    async fn unknown_routes_are_rejected() {
        let api = fallback_routes();

        let res = request().path("/nope").reply(&api).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_identified(&res);

        let res = request().method("GET").path("/move").reply(&api).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_identified(&res);

        let res = request()
            .method("POST")
            .path("/move/extra")
            .json(&json!({}))
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn handler_failures_are_server_errors() {
        let registry = HandlerRegistry::builder()
            .on_info(fallback::info)
            .on_start(|_| Err(eyre!("could not set up")))
            .on_move(|_| panic!("strategy blew up"))
            .on_end(|_| Ok(()))
            .build()
            .unwrap();
        let api = routes(Arc::new(registry));

        let res = request()
            .method("POST")
            .path("/start")
            .json(&json!({}))
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(res.body())["error"], "start handler failed");
        assert_identified(&res);

        let res = request()
            .method("POST")
            .path("/move")
            .json(&json!({}))
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(res.body())["error"], "move handler panicked");
        assert_identified(&res);

        let res = request()
            .method("POST")
            .path("/end")
            .json(&json!({}))
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body().as_ref(), b"ok");
    }

    #[tokio::test]
    async fn server_wraps_the_same_routes() {
        let server = Server::new(Config::default(), resolve(None).unwrap());
        assert_eq!(server.config().port, crate::config::DEFAULT_PORT);

        let res = request().path("/").reply(&server.routes()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_identified(&res);
    }
}
