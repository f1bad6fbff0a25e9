use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::{error, info, warn};
use rocket::{
    fairing::{Fairing, Info, Kind},
    http::{Status, StatusClass},
    route::Route,
    Data, Orbit, Request, Response, Rocket,
};

use crate::Config;

/// Responses slower than this are logged at `warn` even when successful.
const SLOW_RESPONSE: Duration = Duration::from_secs(2);

/// Tags every log line belonging to one request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct RequestId(pub usize);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The ID of the given request, assigned on first use.
    pub fn of(req: &Request<'_>) -> Self {
        *req.local_cache(Self::next)
    }
}

/// When the request arrived.
struct Received(Instant);

/// `name (uri)` for named routes, the bare URI otherwise.
fn describe(route: Option<&Route>) -> String {
    match route {
        Some(Route {
            name: Some(name),
            uri,
            ..
        }) => format!("{name} ({uri})"),
        Some(route) => route.uri.to_string(),
        None => "no matching route".to_string(),
    }
}

fn log_response(status: Status, message: &str, elapsed: Duration) {
    match status.class() {
        StatusClass::ServerError => error!("{message}"),
        StatusClass::ClientError => warn!("{message}"),
        _ if elapsed > SLOW_RESPONSE => warn!("{message} slow"),
        _ => info!("{message}"),
    }
}

/// Logs startup, shutdown and every request/response pair.
#[derive(Debug, Copy, Clone)]
pub struct LoggerFairing;

#[rocket::async_trait]
impl Fairing for LoggerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Logger",
            kind: Kind::Liftoff | Kind::Request | Kind::Response | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let config = rocket.config();
        let scheme = if config.tls_enabled() { "https" } else { "http" };
        info!(
            "Voter guide listening on {scheme}://{}:{}",
            config.address, config.port
        );
        if let Some(app) = rocket.state::<Config>() {
            info!("Share links point at {}", app.hostname());
        }
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        let id = RequestId::of(req);
        req.local_cache(|| Received(Instant::now()));
        info!("->req{id} {} {}", req.method(), req.uri());
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let id = RequestId::of(req);
        let elapsed = req.local_cache(|| Received(Instant::now())).0.elapsed();
        let message = format!(
            "<-rsp{id} {} {} in {}ms",
            res.status(),
            describe(req.route()),
            elapsed.as_millis()
        );
        log_response(res.status(), &message, elapsed);
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        warn!("Shutting down, draining open requests");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let first = RequestId::next();
        let second = RequestId::next();
        assert!(second > first);
        assert_eq!(RequestId(7).to_string(), "7");
    }

    #[test]
    fn unmatched_routes_are_described() {
        assert_eq!(describe(None), "no matching route");
    }
}
