use crate::dispatcher::Exchange;
use crate::error::Fault;
use crate::server::Body;
use crate::status::default_body;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Action name the dispatcher uses to render a not-found body.
pub const NOT_FOUND: &str = "not_found";

/// Result of running an action: `Some(body)` replaces the response body.
pub type ActionResult = anyhow::Result<Option<Body>>;

/// An action bound to a controller type.
pub type Action<C> = fn(&mut C, &mut Exchange) -> ActionResult;

/// Trait implemented by controllers.
///
/// A controller is constructed fresh for every executed route and dropped at
/// the end of the request. Its actions are registered once, when the
/// controller's [`ControllerClass`] is built, so dispatching an action is a
/// table lookup.
///
/// ```rust
/// use brrtdispatch::controller::{ActionResult, ActionTable, Controller};
/// use brrtdispatch::dispatcher::Exchange;
///
/// struct Pets;
///
/// impl Pets {
///     fn show(&mut self, exchange: &mut Exchange) -> ActionResult {
///         let id = exchange.request.param("id").unwrap_or_default().to_string();
///         Ok(Some(serde_json::json!({ "id": id })))
///     }
/// }
///
/// impl Controller for Pets {
///     fn new(_exchange: &mut Exchange) -> anyhow::Result<Self> {
///         Ok(Pets)
///     }
///
///     fn actions(table: &mut ActionTable<Self>) {
///         table.add("show", Self::show);
///     }
/// }
/// ```
pub trait Controller: Sized + Send + 'static {
    /// Build the controller for one request.
    fn new(exchange: &mut Exchange) -> anyhow::Result<Self>;

    /// Register the controller's actions.
    fn actions(table: &mut ActionTable<Self>);

    /// Body used when nothing else produced one for the current status.
    fn default_body(&mut self, exchange: &mut Exchange) -> Option<Body> {
        Some(default_body(exchange.response.status()))
    }

    /// Rendered when the request path matched no route below this controller.
    fn not_found(&mut self, exchange: &mut Exchange) -> ActionResult {
        Ok(self.default_body(exchange))
    }

    /// Error hook, invoked after an action fault with the response already at 500.
    fn server_error(&mut self, exchange: &mut Exchange, _fault: &Fault) -> ActionResult {
        Ok(self.default_body(exchange))
    }
}

/// Lookup table from action name to action.
pub struct ActionTable<C> {
    actions: HashMap<Arc<str>, Action<C>>,
}

impl<C: Controller> ActionTable<C> {
    /// Table pre-populated with the built-in `not_found` action.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            actions: HashMap::new(),
        };
        table.add(NOT_FOUND, C::not_found);
        table
    }

    /// Register (or replace) an action.
    pub fn add(&mut self, name: &str, action: Action<C>) -> &mut Self {
        self.actions.insert(Arc::from(name), action);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Action<C>> {
        self.actions.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered action names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self.actions.keys().map(Arc::clone).collect();
        names.sort();
        names
    }
}

impl<C: Controller> Default for ActionTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased controller instance. Crate-private: actions only run through
/// the dispatcher.
trait Instance: Send {
    fn execute(&mut self, action: &str, exchange: &mut Exchange) -> ActionResult;
    fn default_body(&mut self, exchange: &mut Exchange) -> Option<Body>;
    fn server_error(&mut self, exchange: &mut Exchange, fault: &Fault) -> ActionResult;
}

struct Bound<C: Controller> {
    controller: C,
    actions: Arc<ActionTable<C>>,
}

impl<C: Controller> Instance for Bound<C> {
    fn execute(&mut self, action: &str, exchange: &mut Exchange) -> ActionResult {
        let Some(run) = self.actions.get(action) else {
            anyhow::bail!(
                "{} has no action '{action}'",
                std::any::type_name::<C>()
            );
        };
        run(&mut self.controller, exchange)
    }

    fn default_body(&mut self, exchange: &mut Exchange) -> Option<Body> {
        self.controller.default_body(exchange)
    }

    fn server_error(&mut self, exchange: &mut Exchange, fault: &Fault) -> ActionResult {
        self.controller.server_error(exchange, fault)
    }
}

/// A controller constructed for the current request.
pub struct ActiveController {
    name: &'static str,
    inner: Box<dyn Instance>,
}

impl ActiveController {
    /// Type name of the underlying controller
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn execute(&mut self, action: &str, exchange: &mut Exchange) -> ActionResult {
        self.inner.execute(action, exchange)
    }

    pub(crate) fn default_body(&mut self, exchange: &mut Exchange) -> Option<Body> {
        self.inner.default_body(exchange)
    }

    pub(crate) fn server_error(&mut self, exchange: &mut Exchange, fault: &Fault) -> ActionResult {
        self.inner.server_error(exchange, fault)
    }
}

impl fmt::Debug for ActiveController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveController")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

type Constructor = dyn Fn(&mut Exchange) -> anyhow::Result<ActiveController> + Send + Sync;

/// Handle to a controller type: its constructor plus its resolved action table.
#[derive(Clone)]
pub struct ControllerClass {
    name: &'static str,
    actions: Arc<[Arc<str>]>,
    construct: Arc<Constructor>,
}

impl ControllerClass {
    /// Resolve the action table of `C` and wrap its constructor.
    #[must_use]
    pub fn of<C: Controller>() -> Self {
        let mut table = ActionTable::<C>::new();
        C::actions(&mut table);
        let names: Arc<[Arc<str>]> = table.names().into();
        let table = Arc::new(table);
        let name = std::any::type_name::<C>();

        let construct = move |exchange: &mut Exchange| -> anyhow::Result<ActiveController> {
            let controller = C::new(exchange)?;
            Ok(ActiveController {
                name,
                inner: Box::new(Bound {
                    controller,
                    actions: Arc::clone(&table),
                }),
            })
        };

        Self {
            name,
            actions: names,
            construct: Arc::new(construct),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Short type name without the module path (e.g. `EchoController`)
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    #[must_use]
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a.as_ref() == action)
    }

    #[must_use]
    pub fn action_names(&self) -> &[Arc<str>] {
        &self.actions
    }

    pub(crate) fn instantiate(&self, exchange: &mut Exchange) -> anyhow::Result<ActiveController> {
        (self.construct)(exchange)
    }
}

impl fmt::Debug for ControllerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerClass")
            .field("name", &self.name)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ControllerClass {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.construct, &other.construct) || self.name == other.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::Request;
    use http::Method;
    use serde_json::json;

    struct Greeter {
        greeting: String,
    }

    impl Greeter {
        fn hello(&mut self, exchange: &mut Exchange) -> ActionResult {
            let name = exchange.request.param("name").unwrap_or("world");
            Ok(Some(json!(format!("{} {name}", self.greeting))))
        }
    }

    impl Controller for Greeter {
        fn new(_exchange: &mut Exchange) -> anyhow::Result<Self> {
            Ok(Greeter {
                greeting: "hello".into(),
            })
        }

        fn actions(table: &mut ActionTable<Self>) {
            table.add("hello", Self::hello);
        }
    }

    #[test]
    fn test_class_resolves_actions_once() {
        let class = ControllerClass::of::<Greeter>();
        assert!(class.has_action("hello"));
        assert!(class.has_action(NOT_FOUND));
        assert!(!class.has_action("missing"));
        assert_eq!(class.short_name(), "Greeter");
    }

    #[test]
    fn test_instance_executes_named_action() {
        let class = ControllerClass::of::<Greeter>();
        let mut exchange = Exchange::new(Request::new(Method::GET, "/?name=rust"));
        let mut active = class.instantiate(&mut exchange).unwrap();
        let body = active.execute("hello", &mut exchange).unwrap();
        assert_eq!(body, Some(json!("hello rust")));
    }

    #[test]
    fn test_unknown_action_is_an_error() {
        let class = ControllerClass::of::<Greeter>();
        let mut exchange = Exchange::new(Request::new(Method::GET, "/"));
        let mut active = class.instantiate(&mut exchange).unwrap();
        let err = active.execute("missing", &mut exchange).unwrap_err();
        assert!(err.to_string().contains("no action 'missing'"));
    }

    #[test]
    fn test_default_not_found_uses_status_reason() {
        let class = ControllerClass::of::<Greeter>();
        let mut exchange = Exchange::new(Request::new(Method::GET, "/nope"));
        exchange.response.set_status(404);
        let mut active = class.instantiate(&mut exchange).unwrap();
        let body = active.execute(NOT_FOUND, &mut exchange).unwrap();
        assert_eq!(body, Some(json!("<h1>Not Found</h1>")));
    }
}
