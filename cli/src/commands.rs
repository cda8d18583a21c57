//! File-level wrappers around the compiler. Everything that touches the
//! filesystem lives here so the compiler crate stays pure.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use protodts_compiler::diagnostics::{self, INFO_MAP_FILE_NAME, MESSAGES_FILE_NAME};
use protodts_compiler::verifier::verify_program;
use protodts_compiler::{build_protocol, extract, DtsError, ProtocolConfig};
use protodts_syntax::Program;

pub fn load_config(path: Option<&Path>, root: Option<&str>) -> Result<ProtocolConfig, DtsError> {
    let mut config = match path {
        Some(path) => ProtocolConfig::from_json(&fs::read_to_string(path)?)?,
        None => ProtocolConfig::default(),
    };
    if let Some(root) = root {
        config.root_file = root.to_string();
    }
    Ok(config)
}

pub fn load_program(path: &Path) -> Result<Program, DtsError> {
    let text = fs::read_to_string(path)?;
    let program: Program = serde_json::from_str(&text)?;
    info!(
        path = %path.display(),
        files = program.files.len(),
        nodes = program.nodes.len(),
        "program.loaded"
    );
    Ok(program)
}

/// Builds the protocol file. Writes it to `output` when given, otherwise
/// hands the text back for printing.
pub fn build_protocol_file(
    program_path: &Path,
    config: &ProtocolConfig,
    output: Option<&Path>,
) -> Result<Option<String>, DtsError> {
    let program = load_program(program_path)?;
    let text = build_protocol(&program, config)?;
    match output {
        Some(out_path) => {
            fs::write(out_path, &text)?;
            info!(path = %out_path.display(), "output.written");
            Ok(None)
        }
        None => Ok(Some(text)),
    }
}

pub fn extract_to_json(program_path: &Path, config: &ProtocolConfig) -> Result<String, DtsError> {
    let program = load_program(program_path)?;
    verify_program(&program)?;
    let root = program
        .find_file(&config.root_file)
        .ok_or_else(|| DtsError::UnknownRootFile(config.root_file.clone()))?;
    let extraction = extract(root, &program, &config.walker_options()?)?;
    Ok(serde_json::to_string_pretty(&extraction)?)
}

/// Reads a diagnostic table and writes both generated files into the
/// table's directory. Returns the paths written.
pub fn process_diagnostic_messages(input: &Path, cwd: &Path) -> Result<(PathBuf, PathBuf), DtsError> {
    info!(path = %input.display(), "Reading diagnostics");
    let table = diagnostics::parse_table(&fs::read_to_string(input)?)?;

    let output_dir = input.parent().unwrap_or_else(|| Path::new(""));
    let input_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let this_dir_rel = relative_to(output_dir, cwd);

    let generated = diagnostics::generate(
        &table,
        &format!("./{}", input_name),
        &this_dir_rel.to_string_lossy(),
    )?;

    let info_path = output_dir.join(INFO_MAP_FILE_NAME);
    let messages_path = output_dir.join(MESSAGES_FILE_NAME);
    fs::write(&info_path, generated.info_map)?;
    fs::write(&messages_path, generated.messages_json)?;
    info!(
        messages = table.len(),
        info_map = %info_path.display(),
        lookup = %messages_path.display(),
        "diagnostics.written"
    );
    Ok((info_path, messages_path))
}

fn relative_to(dir: &Path, base: &Path) -> PathBuf {
    dir.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| dir.to_path_buf())
}
