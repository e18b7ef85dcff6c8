//! Bridge from `tracing` into a [`LoggingService`].
//!
//! [`ServiceLayer`] turns host-application `tracing` events into log calls:
//!
//! - level: TRACE/DEBUG/INFO/WARN/ERROR map one to one
//! - `message` field becomes the record message
//! - `category` field (string) becomes the category
//! - a `component` field on the event or an enclosing span becomes the
//!   source, else the event target
//! - every other field lands in `details`
//!
//! Events under the `makerlog` target tree are skipped; that is where the
//! service reports its own failures and where the console transport
//! prints, so forwarding them would loop.

use serde_json::{Map, Number, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

use makerlog_core::{Details, LogCategory, LogLevel, LogOptions};

use crate::service::LoggingService;

/// Map a `tracing` level onto a log level.
pub fn from_tracing(level: tracing::Level) -> LogLevel {
    match level {
        tracing::Level::TRACE => LogLevel::Trace,
        tracing::Level::DEBUG => LogLevel::Debug,
        tracing::Level::INFO => LogLevel::Info,
        tracing::Level::WARN => LogLevel::Warn,
        tracing::Level::ERROR => LogLevel::Error,
    }
}

fn is_internal(target: &str) -> bool {
    target == "makerlog" || target.starts_with("makerlog::") || target.starts_with("makerlog_")
}

/// `tracing_subscriber` layer feeding a [`LoggingService`].
pub struct ServiceLayer {
    service: LoggingService,
}

impl ServiceLayer {
    /// Forward events to `service`.
    pub fn new(service: LoggingService) -> Self {
        Self { service }
    }
}

/// Span-level `component`, stored in span extensions.
struct SpanComponent(String);

#[derive(Default)]
struct ComponentVisitor {
    component: Option<String>,
}

impl Visit for ComponentVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "component" {
            self.component = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    category: Option<String>,
    component: Option<String>,
    fields: Map<String, Value>,
}

impl EventVisitor {
    fn put(&mut self, field: &Field, value: Value) {
        let _ = self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_string()),
            "category" => self.category = Some(value.to_string()),
            "component" => self.component = Some(value.to_string()),
            _ => self.put(field, Value::String(value.to_string())),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::Number(value.into()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::Bool(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = Number::from_f64(value) {
            self.put(field, Value::Number(n));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.put(field, Value::String(format!("{value:?}")));
        }
    }
}

impl<S> Layer<S> for ServiceLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = ComponentVisitor::default();
        attrs.record(&mut visitor);
        if let (Some(component), Some(span)) = (visitor.component, ctx.span(id)) {
            span.extensions_mut().insert(SpanComponent(component));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_internal(metadata.target()) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let span_component = ctx.event_scope(event).and_then(|scope| {
            scope.from_root().fold(None, |found, span| {
                span.extensions()
                    .get::<SpanComponent>()
                    .map(|c| c.0.clone())
                    .or(found)
            })
        });
        let source = visitor
            .component
            .or(span_component)
            .unwrap_or_else(|| metadata.target().to_string());

        let mut options = LogOptions::new().with_source(source);
        if let Some(category) = visitor.category {
            options = options.with_category(LogCategory::from(category));
        }
        if !visitor.fields.is_empty() {
            options = options.with_details(Details::from(visitor.fields));
        }

        let _ = self.service.log(
            from_tracing(*metadata.level()),
            visitor.message.unwrap_or_default(),
            options,
        );
    }
}

/// Install a global subscriber: compact stderr output filtered by
/// `RUST_LOG` (else `level`), plus a [`ServiceLayer`] for `service`.
///
/// Subsequent calls are no-ops.
pub fn init_subscriber(level: &str, service: &LoggingService) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ServiceLayer::new(service.clone()))
        .try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use makerlog_settings::LoggingConfig;
    use serde_json::json;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    fn setup() -> (
        LoggingService,
        tokio::sync::broadcast::Receiver<Arc<makerlog_core::LogRecord>>,
        tracing::subscriber::DefaultGuard,
    ) {
        let service = LoggingService::new(LoggingConfig {
            flush_interval_ms: 0,
            filter: makerlog_core::FilterSettings {
                min_level: LogLevel::Trace,
                ..Default::default()
            },
            ..LoggingConfig::default()
        });
        let rx = service.stream(32);
        let guard = tracing_subscriber::registry()
            .with(ServiceLayer::new(service.clone()))
            .set_default();
        (service, rx, guard)
    }

    #[test]
    fn level_mapping() {
        assert_eq!(from_tracing(tracing::Level::TRACE), LogLevel::Trace);
        assert_eq!(from_tracing(tracing::Level::WARN), LogLevel::Warn);
        assert_eq!(from_tracing(tracing::Level::ERROR), LogLevel::Error);
    }

    #[test]
    fn event_becomes_record() {
        let (_service, mut rx, _guard) = setup();
        tracing::warn!(target: "app::auth", category = "auth", attempts = 3, "login throttled");

        let record = rx.try_recv().unwrap();
        assert_eq!(record.level, LogLevel::Warn);
        assert_eq!(record.message, "login throttled");
        assert_eq!(record.category, LogCategory::Auth);
        assert_eq!(record.source.as_deref(), Some("app::auth"));
        assert_eq!(record.detail("attempts"), Some(&json!(3)));
        assert!(record.detail("category").is_none());
    }

    #[test]
    fn span_component_sets_source() {
        let (_service, mut rx, _guard) = setup();
        let span = tracing::info_span!("render", component = "ThemeEditor");
        let _entered = span.enter();
        tracing::info!(target: "app::ui", "mounted");

        let record = rx.try_recv().unwrap();
        assert_eq!(record.source.as_deref(), Some("ThemeEditor"));
        assert_eq!(record.category, LogCategory::General);
    }

    #[test]
    fn internal_targets_are_skipped() {
        let (_service, mut rx, _guard) = setup();
        tracing::error!(target: "makerlog::service", "transport write failed");
        tracing::info!(target: "makerlog::console", "echo");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn internal_target_prefix() {
        assert!(is_internal("makerlog"));
        assert!(is_internal("makerlog::emitter"));
        assert!(is_internal("makerlog_settings::loader"));
        assert!(!is_internal("makerlogger"));
        assert!(!is_internal("app"));
    }
}
