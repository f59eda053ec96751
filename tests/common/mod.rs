#![allow(dead_code)]

pub mod controllers {
    //! Controllers that record every call into a per-thread event log.

    use brrtdispatch::controller::{ActionResult, ActionTable, Controller, ControllerClass};
    use brrtdispatch::dispatcher::Exchange;
    use brrtdispatch::error::{Fault, Halt};
    use brrtdispatch::server::Body;
    use serde_json::json;
    use std::cell::RefCell;

    thread_local! {
        static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    pub fn record(event: impl Into<String>) {
        EVENTS.with(|e| e.borrow_mut().push(event.into()));
    }

    /// Events recorded on this thread since the last call, oldest first.
    pub fn take_events() -> Vec<String> {
        EVENTS.with(|e| std::mem::take(&mut *e.borrow_mut()))
    }

    pub fn count(events: &[String], prefix: &str) -> usize {
        events.iter().filter(|e| e.starts_with(prefix)).count()
    }

    /// Controller overriding every hook.
    pub struct Site;

    impl Site {
        fn index(&mut self, _exchange: &mut Exchange) -> ActionResult {
            record("Site::index");
            Ok(Some(json!("site index")))
        }

        fn show(&mut self, exchange: &mut Exchange) -> ActionResult {
            record("Site::show");
            Ok(Some(json!({ "id": exchange.request.param("id") })))
        }

        fn echo_params(&mut self, exchange: &mut Exchange) -> ActionResult {
            record("Site::echo_params");
            Ok(Some(json!(exchange.request.params)))
        }

        fn fail(&mut self, _exchange: &mut Exchange) -> ActionResult {
            record("Site::fail");
            anyhow::bail!("database unavailable")
        }

        fn explode(&mut self, _exchange: &mut Exchange) -> ActionResult {
            record("Site::explode");
            panic!("exploded mid-action")
        }

        fn forbid(&mut self, _exchange: &mut Exchange) -> ActionResult {
            record("Site::forbid");
            Err(Halt::new(403)
                .with_body("forbidden")
                .with_header("X-Reason", "policy")
                .into())
        }

        fn silent(&mut self, _exchange: &mut Exchange) -> ActionResult {
            record("Site::silent");
            Ok(None)
        }

        fn no_content(&mut self, exchange: &mut Exchange) -> ActionResult {
            record("Site::no_content");
            exchange.set_status(204);
            Ok(Some(json!("ignored")))
        }

        fn remember(&mut self, exchange: &mut Exchange) -> ActionResult {
            record("Site::remember");
            let mut cookies = exchange.cookies();
            let previous = cookies.get("seen").unwrap_or("never").to_string();
            cookies.set("seen", "now");
            cookies.set("stale", None::<&str>);
            Ok(Some(json!({ "previous": previous })))
        }
    }

    impl Controller for Site {
        fn new(_exchange: &mut Exchange) -> anyhow::Result<Self> {
            record("Site::new");
            Ok(Site)
        }

        fn actions(table: &mut ActionTable<Self>) {
            table
                .add("index", Self::index)
                .add("show", Self::show)
                .add("echo_params", Self::echo_params)
                .add("fail", Self::fail)
                .add("explode", Self::explode)
                .add("forbid", Self::forbid)
                .add("silent", Self::silent)
                .add("no_content", Self::no_content)
                .add("remember", Self::remember);
        }

        fn default_body(&mut self, exchange: &mut Exchange) -> Option<Body> {
            record("Site::default_body");
            Some(json!(format!("site default {}", exchange.status())))
        }

        fn not_found(&mut self, exchange: &mut Exchange) -> ActionResult {
            record(format!("Site::not_found {}", exchange.request.path));
            Ok(Some(json!("site not found")))
        }

        fn server_error(&mut self, _exchange: &mut Exchange, fault: &Fault) -> ActionResult {
            record(format!("Site::server_error {fault}"));
            Ok(Some(json!(format!("site error: {fault}"))))
        }
    }

    /// Controller whose constructor always fails.
    pub struct Broken;

    impl Broken {
        fn index(&mut self, _exchange: &mut Exchange) -> ActionResult {
            record("Broken::index");
            Ok(Some(json!("unreachable")))
        }
    }

    impl Controller for Broken {
        fn new(_exchange: &mut Exchange) -> anyhow::Result<Self> {
            record("Broken::new");
            anyhow::bail!("missing configuration")
        }

        fn actions(table: &mut ActionTable<Self>) {
            table.add("index", Self::index);
        }

        fn server_error(&mut self, _exchange: &mut Exchange, _fault: &Fault) -> ActionResult {
            record("Broken::server_error");
            Ok(None)
        }
    }

    /// Controller relying on the default hooks.
    pub struct Plain;

    impl Plain {
        fn index(&mut self, _exchange: &mut Exchange) -> ActionResult {
            record("Plain::index");
            Ok(None)
        }

        fn fail(&mut self, _exchange: &mut Exchange) -> ActionResult {
            record("Plain::fail");
            anyhow::bail!("plain failure")
        }
    }

    impl Controller for Plain {
        fn new(_exchange: &mut Exchange) -> anyhow::Result<Self> {
            record("Plain::new");
            Ok(Plain)
        }

        fn actions(table: &mut ActionTable<Self>) {
            table.add("index", Self::index).add("fail", Self::fail);
        }
    }

    pub fn site() -> ControllerClass {
        ControllerClass::of::<Site>()
    }

    pub fn broken() -> ControllerClass {
        ControllerClass::of::<Broken>()
    }

    pub fn plain() -> ControllerClass {
        ControllerClass::of::<Plain>()
    }
}

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write `content` to a temporary file with the given extension.
    pub fn table_file(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("brrt_routes_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }
}

pub mod log_capture {
    //! Collect formatted `tracing` output for assertions.

    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` with a JSON subscriber writing into the returned buffer.
    pub fn capture<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(logs.clone())
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs)
    }
}
