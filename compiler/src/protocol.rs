use crate::{
    config::ProtocolConfig,
    error::DtsError,
    verifier::verify_program,
    walker::{extract, Extraction},
};
use protodts_syntax::{Program, TypeOracle};
use tracing::info;

/// Wraps an extraction into the text appended after the primary declaration
/// file: inlined declarations inside the protocol namespace, and one
/// `never` alias per stubbed enum inside the stub namespace.
pub fn render_extra_declarations(extraction: &Extraction, config: &ProtocolConfig) -> String {
    let mut text = String::new();

    if !extraction.text.is_empty() {
        text.push_str(&format!(
            "declare namespace {} {{\n{}}}",
            config.protocol_namespace, extraction.text
        ));
    }

    if !extraction.stubbed.is_empty() {
        text.push_str(&format!("\ndeclare namespace {} {{\n", config.stub_namespace));
        for name in &extraction.stubbed {
            text.push_str(&format!(
                "    // {} is an empty stub for a type from services and should not be used directly\n",
                name
            ));
            text.push_str(&format!("    export type {} = never;\n", name));
        }
        text.push('}');
    }

    text
}

/// Produces the final, self-contained protocol declaration file: the root
/// file's text, every external declaration it depends on, and the module
/// export trailer.
pub fn build_protocol(program: &Program, config: &ProtocolConfig) -> Result<String, DtsError> {
    verify_program(program)?;
    let options = config.walker_options()?;

    let root = program
        .find_file(&config.root_file)
        .ok_or_else(|| DtsError::UnknownRootFile(config.root_file.clone()))?;
    let primary = program
        .file(root)
        .map(|f| f.text.as_str())
        .unwrap_or_default();

    let extraction = extract(root, program, &options)?;
    info!(
        root = %config.root_file,
        inlined_bytes = extraction.text.len(),
        stubbed = extraction.stubbed.len(),
        "protocol.extracted"
    );

    let mut protocol_dts = primary.to_string();
    protocol_dts.push_str(&render_extra_declarations(&extraction, config));
    protocol_dts.push_str(&format!(
        "\nimport {} = {};",
        config.export_alias, config.protocol_namespace
    ));
    protocol_dts.push_str(&format!("\nexport = {};", config.export_alias));
    protocol_dts.push_str(&format!("\nexport as namespace {};", config.export_alias));
    Ok(protocol_dts)
}
