//! Access log middleware.
//!
//! Writes one event log entry per request as `METHOD path status`. The query
//! string is never recorded.

use std::rc::Rc;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::EventLog;

/// Records every request in the event log. Server errors are logged at
/// `ERROR`, everything else at `INFO`.
#[derive(Clone)]
pub struct RequestLog {
    events: EventLog,
}

impl RequestLog {
    pub fn new(events: EventLog) -> Self {
        Self { events }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddleware {
            service: Rc::new(service),
            events: self.events.clone(),
        }))
    }
}

pub struct RequestLogMiddleware<S> {
    service: Rc<S>,
    events: EventLog,
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let line = format!("{} {}", req.method(), req.path());
        let events = self.events.clone();
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            let status = res.status();
            let message = format!("{line} {}", status.as_u16());
            if status.is_server_error() {
                events.error(message).await;
            } else {
                events.info(message).await;
            }
            Ok(res)
        })
    }
}
