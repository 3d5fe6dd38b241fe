//! Tipo de erro unificado do DEX com formatação estável.
use core::fmt;
use std::collections::BTreeMap;

use crate::amm::error_catalog::{default_locale_message, DexErrorCode};

const CONTEXT_VALUE_MAX: usize = 256;

// Valores de contexto viram uma linha só e são truncados; vão direto para UI e logs.
fn sanitize_value(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|ch| match ch {
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect();
    if cleaned.chars().count() > CONTEXT_VALUE_MAX {
        cleaned = cleaned.chars().take(CONTEXT_VALUE_MAX - 1).collect();
        cleaned.push('…');
    }
    cleaned
}

fn escape_json_into(out: &mut String, input: &str) {
    for ch in input.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if c.is_control() => {
                use core::fmt::Write as _;
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
}

fn render_template(template: &str, context: &BTreeMap<String, String>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '{' {
            rendered.push(ch);
            continue;
        }
        let mut key = String::new();
        for next in chars.by_ref() {
            if next == '}' {
                break;
            }
            key.push(next);
        }
        match context.get(&key) {
            Some(value) if !key.is_empty() => rendered.push_str(value),
            _ => {
                // placeholder desconhecido fica como está
                rendered.push('{');
                rendered.push_str(&key);
                rendered.push('}');
            }
        }
    }
    rendered
}

/// Erro do DEX com contexto estruturado.
#[derive(Debug, Clone)]
pub struct DexError {
    pub code: DexErrorCode,
    pub context: BTreeMap<String, String>,
}

impl DexError {
    /// Cria um novo erro sem contexto adicional.
    pub fn new(code: DexErrorCode) -> Self {
        Self {
            code,
            context: BTreeMap::new(),
        }
    }

    /// Adiciona um par chave/valor ao contexto.
    pub fn with_context<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        let key = key.into();
        if !key.is_empty() {
            self.context.insert(key, sanitize_value(&value.to_string()));
        }
        self
    }

    fn resolved_message(&self) -> String {
        render_template(default_locale_message(self.code), &self.context)
    }

    /// Mensagem curta para UI.
    pub fn to_user_string(&self) -> String {
        format!("[{}] {}", self.code.code(), self.resolved_message())
    }

    /// Renderiza um template arbitrário usando o contexto atual.
    pub fn render_with_template(&self, template: &str) -> String {
        render_template(template, &self.context)
    }

    /// Serialização estável em JSON para logs.
    pub fn to_log_json(&self) -> String {
        let mut json = String::from("{\"code\":\"");
        escape_json_into(&mut json, self.code.code());
        json.push_str("\",\"title\":\"");
        escape_json_into(&mut json, self.code.title());
        json.push_str("\",\"message\":\"");
        escape_json_into(&mut json, &self.resolved_message());
        json.push_str("\",\"context\":{");
        for (i, (key, value)) in self.context.iter().enumerate() {
            if i > 0 {
                json.push(',');
            }
            json.push('"');
            escape_json_into(&mut json, key);
            json.push_str("\":\"");
            escape_json_into(&mut json, value);
            json.push('"');
        }
        json.push_str("}}");
        json
    }
}

impl fmt::Display for DexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_user_string())
    }
}

impl std::error::Error for DexError {}

/// Resultado padrão para operações do DEX.
pub type Result<T> = std::result::Result<T, DexError>;

#[macro_export]
macro_rules! dex_err {
  ($code:expr) => {{
    $crate::amm::error::DexError::new($code)
  }};
  ($code:expr, $($key:ident => $value:expr),+ $(,)?) => {{
    let mut err = $crate::amm::error::DexError::new($code);
    $(
      err = err.with_context(stringify!($key), $value);
    )+
    err
  }};
  ($code:expr, $($key:expr => $value:expr),+ $(,)?) => {{
    let mut err = $crate::amm::error::DexError::new($code);
    $(
      err = err.with_context($key, $value);
    )+
    err
  }};
}

#[macro_export]
macro_rules! dex_bail {
  ($($tt:tt)*) => {
    return Err($crate::dex_err!($($tt)*));
  };
}
