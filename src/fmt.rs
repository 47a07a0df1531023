//! Log formatting keyed to simulated time.

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::engine::sim_clock;
use crate::types::Tick;

/// Tick stamp with underscore-grouped digits, right-aligned: `[     1_024]`.
pub struct FmtTick(pub Tick);

/// Format a u64 with underscore grouping (groups of 3 from the right).
pub(crate) fn fmt_grouped(v: u64) -> String {
    let digits = v.to_string();
    let len = digits.len();
    if len <= 3 {
        return digits;
    }
    let mut result = String::with_capacity(len + (len - 1) / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push('_');
        }
        result.push(ch);
    }
    result
}

impl fmt::Display for FmtTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>10}", fmt_grouped(self.0))
    }
}

/// Event formatter stamping each line with the simulated tick and the
/// emitting module, e.g. `[         6]  INFO mlfq: DEMOTE task=A`.
pub struct SimFormat;

fn level_color(level: Level) -> &'static str {
    match level {
        Level::ERROR => "\x1b[31m",
        Level::WARN => "\x1b[33m",
        Level::INFO => "\x1b[32m",
        Level::DEBUG => "\x1b[34m",
        Level::TRACE => "\x1b[35m",
    }
}

/// Last path segment of a tracing target: `ticksim::policy::mlfq` -> `mlfq`.
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

impl<S, N> FormatEvent<S, N> for SimFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let level = *meta.level();
        write!(writer, "[{}] ", FmtTick(sim_clock()))?;
        if writer.has_ansi_escapes() {
            write!(writer, "{}{level:>5}\x1b[0m ", level_color(level))?;
        } else {
            write!(writer, "{level:>5} ")?;
        }
        write!(writer, "{}: ", short_target(meta.target()))?;

        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        write!(writer, "{}", fields.message)?;
        for (key, value) in &fields.fields {
            write!(writer, " {key}={value}")?;
        }
        writeln!(writer)
    }
}

/// Visitor that collects the message and key-value fields from an event.
#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: Vec<(String, String)>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_grouped() {
        assert_eq!(fmt_grouped(0), "0");
        assert_eq!(fmt_grouped(999), "999");
        assert_eq!(fmt_grouped(1_000), "1_000");
        assert_eq!(fmt_grouped(1_234_567), "1_234_567");
    }

    #[test]
    fn test_short_target() {
        assert_eq!(short_target("ticksim::policy::mlfq"), "mlfq");
        assert_eq!(short_target("ticksim"), "ticksim");
    }

    #[test]
    fn test_fmt_tick() {
        assert_eq!(FmtTick(0).to_string(), "         0");
        assert_eq!(FmtTick(1_024).to_string(), "     1_024");
    }
}
