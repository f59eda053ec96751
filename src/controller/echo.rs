use super::core::{ActionResult, ActionTable, Controller};
use crate::dispatcher::Exchange;
use serde_json::json;

/// Actions [`EchoController`] responds to.
pub const ECHO_ACTIONS: [&str; 6] = ["index", "show", "create", "update", "destroy", "fail"];

/// Example controller: echoes the request back as JSON, request id included.
///
/// Used by the CLI to exercise a route table without application code. Every
/// echo also bumps a `visits` cookie. `fail` always returns an error so the
/// 500 path can be observed.
#[derive(Debug, Default)]
pub struct EchoController {
    visits: u64,
}

impl EchoController {
    fn echo(&mut self, action: &str, exchange: &mut Exchange) -> ActionResult {
        let request = &exchange.request;
        let body = json!({
            "controller": "EchoController",
            "action": action,
            "method": request.method.to_string(),
            "path": request.path,
            "params": request.params,
            "body": request.body,
            "visits": self.visits,
            "request_id": request.request_id,
        });
        exchange.cookies().set("visits", self.visits);
        Ok(Some(body))
    }

    fn index(&mut self, exchange: &mut Exchange) -> ActionResult {
        self.echo("index", exchange)
    }

    fn show(&mut self, exchange: &mut Exchange) -> ActionResult {
        self.echo("show", exchange)
    }

    fn create(&mut self, exchange: &mut Exchange) -> ActionResult {
        exchange.response.set_status(201);
        self.echo("create", exchange)
    }

    fn update(&mut self, exchange: &mut Exchange) -> ActionResult {
        self.echo("update", exchange)
    }

    fn destroy(&mut self, exchange: &mut Exchange) -> ActionResult {
        self.echo("destroy", exchange)
    }

    fn fail(&mut self, exchange: &mut Exchange) -> ActionResult {
        anyhow::bail!("echo failure requested for {}", exchange.request.path)
    }
}

impl Controller for EchoController {
    fn new(exchange: &mut Exchange) -> anyhow::Result<Self> {
        let previous = exchange
            .cookies()
            .get("visits")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        Ok(Self {
            visits: previous + 1,
        })
    }

    fn actions(table: &mut ActionTable<Self>) {
        table
            .add("index", Self::index)
            .add("show", Self::show)
            .add("create", Self::create)
            .add("update", Self::update)
            .add("destroy", Self::destroy)
            .add("fail", Self::fail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerClass;
    use crate::dispatcher::Dispatcher;
    use crate::router::Router;
    use crate::runtime_config::RuntimeConfig;
    use crate::server::Request;
    use http::Method;

    #[test]
    fn test_echo_registers_every_action() {
        let class = ControllerClass::of::<EchoController>();
        for action in ECHO_ACTIONS {
            assert!(class.has_action(action), "missing {action}");
        }
    }

    #[test]
    fn test_echo_body_carries_request_id() {
        let router = Router::new()
            .route(Method::GET, "/", ControllerClass::of::<EchoController>(), "index")
            .unwrap();
        let dispatcher = Dispatcher::with_config(router, RuntimeConfig::default());
        let id = "01ARZ3NDEKTSV4RRFFQ69G5FAV";

        let response = dispatcher.call(Request::new(Method::GET, "/").with_header("x-request-id", id));

        assert_eq!(response.body().unwrap()["request_id"], id);
    }
}
