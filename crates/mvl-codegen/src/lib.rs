//! MVL Code Generator
//!
//! Turns a parse tree back into JavaScript. Host code is written out
//! unchanged and every view node becomes a call into the component
//! registry (`Moon.view.components` unless configured otherwise).
//!
//! ```text
//! source → parse() → Expression → generate() → JavaScript
//! ```
//!
//! # Example
//!
//! ```
//! let js = mvl_codegen::compile("const view = <p>{message}</p>;").unwrap();
//! assert_eq!(
//!     js,
//!     "const view = Moon.view.components.p({children:[Moon.view.components.text({data:message})]});"
//! );
//! ```

pub mod escape;
pub mod js;

pub use js::Generator;

use mvl_parser::ast::Expression;
use mvl_parser::ParseError;
use serde::Deserialize;
use tracing::debug;

/// The registry view nodes resolve against by default.
pub const DEFAULT_REGISTRY: &str = "Moon.view.components";

/// Code generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// Expression that lowercase node names are looked up on.
    pub registry: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY.into(),
        }
    }
}

/// Generate JavaScript for a parse tree with the default registry.
pub fn generate(tree: &Expression) -> String {
    Generator::new(&GeneratorOptions::default()).generate(tree)
}

/// Parse and generate in one step with the default options.
pub fn compile(source: &str) -> Result<String, ParseError> {
    compile_with(source, &GeneratorOptions::default())
}

/// Parse and generate in one step.
pub fn compile_with(source: &str, options: &GeneratorOptions) -> Result<String, ParseError> {
    let tree = mvl_parser::parse(source)?;
    let output = Generator::new(options).generate(&tree);
    debug!(
        registry = %options.registry,
        input = source.len(),
        output = output.len(),
        "compiled source"
    );
    Ok(output)
}
