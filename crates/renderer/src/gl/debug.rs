//! Formatting for `KHR_debug` driver messages.

use std::borrow::Cow;

pub fn source_label(source: u32) -> Cow<'static, str> {
    match source {
        glow::DEBUG_SOURCE_API => "API".into(),
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "Window System".into(),
        glow::DEBUG_SOURCE_SHADER_COMPILER => "Shader Compiler".into(),
        glow::DEBUG_SOURCE_THIRD_PARTY => "Third Party".into(),
        glow::DEBUG_SOURCE_APPLICATION => "Application".into(),
        glow::DEBUG_SOURCE_OTHER => "Other".into(),
        other => format!("Unknown ({other})").into(),
    }
}

pub fn type_label(kind: u32) -> Cow<'static, str> {
    match kind {
        glow::DEBUG_TYPE_ERROR => "Error".into(),
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated Behaviour".into(),
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined Behaviour".into(),
        glow::DEBUG_TYPE_PORTABILITY => "Portability".into(),
        glow::DEBUG_TYPE_PERFORMANCE => "Performance".into(),
        glow::DEBUG_TYPE_MARKER => "Marker".into(),
        glow::DEBUG_TYPE_PUSH_GROUP => "Push Group".into(),
        glow::DEBUG_TYPE_POP_GROUP => "Pop Group".into(),
        glow::DEBUG_TYPE_OTHER => "Other".into(),
        other => format!("Unknown ({other})").into(),
    }
}

pub fn severity_label(severity: u32) -> Cow<'static, str> {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => "high".into(),
        glow::DEBUG_SEVERITY_MEDIUM => "medium".into(),
        glow::DEBUG_SEVERITY_LOW => "low".into(),
        glow::DEBUG_SEVERITY_NOTIFICATION => "notification".into(),
        other => format!("Unknown ({other})").into(),
    }
}

/// Tracing level a driver message is reported at.
pub fn severity_level(severity: u32) -> tracing::Level {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => tracing::Level::ERROR,
        glow::DEBUG_SEVERITY_MEDIUM => tracing::Level::WARN,
        glow::DEBUG_SEVERITY_LOW => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    }
}

/// Debug output callback. Observational only.
pub fn log_message(source: u32, kind: u32, id: u32, severity: u32, message: &str) {
    let source = source_label(source);
    let kind = type_label(kind);
    let severity_text = severity_label(severity);
    macro_rules! emit {
        ($level:ident) => {
            tracing::$level!(
                id,
                source = %source,
                kind = %kind,
                severity = %severity_text,
                "GL debug message: {message}"
            )
        };
    }
    match severity_level(severity) {
        tracing::Level::ERROR => emit!(error),
        tracing::Level::WARN => emit!(warn),
        tracing::Level::INFO => emit!(info),
        _ => emit!(debug),
    }
}
