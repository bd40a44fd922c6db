//! WASM bindings for the MVL compiler.
//!
//! Exposes `compile()` to JavaScript via wasm-bindgen. Returns the generated
//! code as a string, or throws an `Error` carrying `expected`, `index`,
//! `line`, and `column` properties.
//!
//! `index` and `column` are converted to UTF-16 code units so they can be
//! used directly with JavaScript string indexing. The rendered `message`
//! counts characters.

use mvl_codegen::GeneratorOptions;
use mvl_parser::ParseError;
use wasm_bindgen::prelude::*;

/// A parse failure resolved against its source, ready to hand to JavaScript.
///
/// `index` and `column` (1-based) count UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileFailure {
    pub expected: String,
    pub index: usize,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl CompileFailure {
    pub fn new(source: &str, error: &ParseError) -> Self {
        let location = error.locate(source);
        Self {
            expected: error.expected.clone(),
            index: utf16_len(source.chars().take(error.index)),
            line: location.line,
            column: utf16_len(location.snippet.chars().take(location.column - 1)) + 1,
            message: error.render(source),
        }
    }

    fn into_js(self) -> Result<JsValue, JsValue> {
        let error = js_sys::Error::new(&self.message);
        js_sys::Reflect::set(&error, &"expected".into(), &self.expected.into())?;
        js_sys::Reflect::set(&error, &"index".into(), &JsValue::from_f64(self.index as f64))?;
        js_sys::Reflect::set(&error, &"line".into(), &JsValue::from_f64(self.line as f64))?;
        js_sys::Reflect::set(&error, &"column".into(), &JsValue::from_f64(self.column as f64))?;
        Ok(error.into())
    }
}

fn utf16_len(chars: impl Iterator<Item = char>) -> usize {
    chars.map(char::len_utf16).sum()
}

/// Compile MVL source to JavaScript.
///
/// `options` is an optional `{ registry }` object. Throws when the options
/// are malformed or the source does not parse; the thrown error's `index`
/// and `column` are UTF-16 offsets into `source`.
#[wasm_bindgen]
pub fn compile(source: &str, options: JsValue) -> Result<String, JsValue> {
    let options: GeneratorOptions = if options.is_undefined() || options.is_null() {
        GeneratorOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)?
    };

    mvl_codegen::compile_with(source, &options)
        .map_err(|e| match CompileFailure::new(source, &e).into_js() {
            Ok(error) | Err(error) => error,
        })
}

/// Get the compiler version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Native tests (non-WASM): the pipeline behind compile()
    // =========================================================================

    fn failure(source: &str) -> CompileFailure {
        let err = mvl_codegen::compile(source).unwrap_err();
        CompileFailure::new(source, &err)
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(mvl_codegen::compile("").unwrap(), "");
    }

    #[test]
    fn test_view_in_module() {
        let output = mvl_codegen::compile(
            "export default () => (\n\t<div class=\"app\">{message}</div>\n);\n",
        )
        .unwrap();
        assert_eq!(
            output,
            "export default () => (\n\tMoon.view.components.div ({\"class\":\"app\",children:[Moon.view.components.text({data:message})]})\n);\n"
        );
    }

    #[test]
    fn test_failure_location() {
        let source = "\n\t\t<div test=\"></div>\n\t";
        assert_eq!(
            failure(source),
            CompileFailure {
                expected: "EOF".into(),
                index: 13,
                line: 2,
                column: 13,
                message: "Parse error at line 2, column 13: expected EOF\n\t\t<div test=\"></div>\n\t\t          ^".into(),
            }
        );
    }

    #[test]
    fn test_failure_at_start() {
        let failure = failure("\"\\");
        assert_eq!(failure.index, 0);
        assert_eq!(failure.line, 1);
        assert_eq!(failure.column, 1);
    }

    #[test]
    fn test_failure_offsets_count_utf16_units() {
        let failure = failure("😀)");
        assert_eq!(failure.index, 2);
        assert_eq!(failure.line, 1);
        assert_eq!(failure.column, 3);
        assert!(failure.message.starts_with("Parse error at line 1, column 2:"));
    }

    #[test]
    fn test_failure_offsets_on_later_line() {
        let failure = failure("'é'\n😀 é)");
        assert_eq!(failure.index, 8);
        assert_eq!(failure.line, 2);
        assert_eq!(failure.column, 5);
    }

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }

    #[test]
    fn test_multiple_compiles() {
        let out1 = mvl_codegen::compile("<a/>").unwrap();
        let out2 = mvl_codegen::compile("<b/>").unwrap();
        assert_eq!(out1, "Moon.view.components.a({})");
        assert_eq!(out2, "Moon.view.components.b({})");
    }
}
