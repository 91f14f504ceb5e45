//! Panic catching.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {
    http::{Response, StatusCode},
    std::any::Any,
    tower_http::catch_panic::CatchPanicLayer,
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up panic catching middleware.
    ///
    /// A panic in any handler of any route table becomes a
    /// `500 Internal Server Error` and the server keeps running. The panic
    /// message is logged and, when configured with
    /// `with_panic_notification_channel()`, sent to that channel.
    ///
    /// This is the outermost layer installed by `setup_middleware()`.
    #[must_use]
    pub fn setup_catch_panic(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::CatchPanic) {
            return self;
        }

        let panic_channel = self.panic_channel.clone();
        self.inner = self
            .inner
            .layer(CatchPanicLayer::custom(move |err: Box<dyn Any + Send + 'static>| {
                let msg = panic_message(err.as_ref());

                tracing::error!("{msg}");
                if let Some(ch) = &panic_channel {
                    ch.try_send(msg).ok();
                }

                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
                    .body("Internal Server Error".to_string())
                    .unwrap_or_else(|_| Response::new("Internal Server Error".to_string()))
            }));
        self
    }
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        format!("Service panicked: {s}")
    } else if let Some(s) = err.downcast_ref::<&str>() {
        format!("Service panicked: {s}")
    } else {
        "`CatchPanic` was unable to downcast the panic info".to_string()
    }
}
