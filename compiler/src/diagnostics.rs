//! Diagnostic message table conversion.
//!
//! The table is a JSON object mapping each message text to its code and
//! category. From it we generate a source file declaring one `diag(...)`
//! entry per message, and a JSON lookup from message key to message text
//! used by localization tooling.

use crate::{error::DtsError, utils::quote};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const INFO_MAP_FILE_NAME: &str = "diagnosticInformationMap.generated.ts";
pub const MESSAGES_FILE_NAME: &str = "diagnosticMessages.generated.json";

/// Longest property-name prefix that goes into a message key.
const MAX_KEY_NAME_LEN: usize = 100;

lazy_static! {
    static ref MULTI_UNDERSCORE:    Regex = Regex::new(r"_+").unwrap();
    static ref LEADING_UNDERSCORE:  Regex = Regex::new(r"^_([^\d])").unwrap();
    static ref TRAILING_UNDERSCORE: Regex = Regex::new(r"_$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticCategory::Warning    => "Warning",
            DiagnosticCategory::Error      => "Error",
            DiagnosticCategory::Suggestion => "Suggestion",
            DiagnosticCategory::Message    => "Message",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticMessage {
    pub category:                        DiagnosticCategory,
    pub code:                            u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_unnecessary:             Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elided_in_compatability_pyramid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_deprecated:              Option<bool>,
}

/// Message text to message details, in document order.
pub type DiagnosticTable = IndexMap<String, DiagnosticMessage>;

/// The two generated artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDiagnostics {
    pub info_map:      String,
    pub messages_json: String,
}

pub fn parse_table(text: &str) -> Result<DiagnosticTable, DtsError> {
    Ok(serde_json::from_str(text)?)
}

pub fn check_for_unique_codes(table: &DiagnosticTable) -> Result<(), DtsError> {
    let mut seen = HashSet::new();
    for message in table.values() {
        if !seen.insert(message.code) {
            return Err(DtsError::DuplicateDiagnosticCode(message.code));
        }
    }
    Ok(())
}

/// Turns a message text into an identifier: `*`, `/` and `:` get spelled
/// out, every other non-word character becomes `_`, runs of `_` collapse,
/// and leading (unless before a digit) and trailing `_` are dropped.
pub fn convert_property_name(orig_name: &str) -> String {
    let mut result = String::with_capacity(orig_name.len());
    for c in orig_name.chars() {
        match c {
            '*' => result.push_str("_Asterisk"),
            '/' => result.push_str("_Slash"),
            ':' => result.push_str("_Colon"),
            c if c.is_ascii_alphanumeric() || c == '_' => result.push(c),
            _ => result.push('_'),
        }
    }

    let result = MULTI_UNDERSCORE.replace_all(&result, "_");
    let result = LEADING_UNDERSCORE.replace(&result, "$1");
    let result = TRAILING_UNDERSCORE.replace(&result, "");
    result.into_owned()
}

pub fn create_key(name: &str, code: u32) -> String {
    let prefix: String = name.chars().take(MAX_KEY_NAME_LEN).collect();
    format!("{}_{}", prefix, code)
}

/// Trailing optional arguments of a `diag(...)` call. Earlier positions are
/// filled with `undefined` when a later flag is set.
fn optional_arguments(message: &DiagnosticMessage) -> String {
    let reports_unnecessary = message.reports_unnecessary.unwrap_or(false);
    let elided = message.elided_in_compatability_pyramid.unwrap_or(false);
    let reports_deprecated = message.reports_deprecated.unwrap_or(false);

    let mut args = String::new();
    if reports_unnecessary {
        args.push_str(", /*reportsUnnecessary*/ true");
    }
    if elided {
        if !reports_unnecessary {
            args.push_str(", /*reportsUnnecessary*/ undefined");
        }
        args.push_str(", /*elidedInCompatabilityPyramid*/ true");
    }
    if reports_deprecated {
        if !reports_unnecessary && !elided {
            args.push_str(", /*reportsUnnecessary*/ undefined");
        }
        if !elided {
            args.push_str(", /*elidedInCompatabilityPyramid*/ undefined");
        }
        args.push_str(", /*reportsDeprecated*/ true");
    }
    args
}

pub fn build_info_file_output(table: &DiagnosticTable, input_file_path_rel: &str, this_file_path_rel: &str) -> String {
    let mut result = String::new();
    result.push_str("// <auto-generated />\r\n");
    result.push_str(&format!(
        "// generated from '{}' in '{}'\r\n",
        input_file_path_rel,
        this_file_path_rel.replace('\\', "/")
    ));
    result.push_str("/* @internal */\r\n");
    result.push_str("namespace ts {\r\n");
    result.push_str("    function diag(code: number, category: DiagnosticCategory, key: string, message: string, reportsUnnecessary?: {}, elidedInCompatabilityPyramid?: boolean, reportsDeprecated?: {}): DiagnosticMessage {\r\n");
    result.push_str("        return { code, category, key, message, reportsUnnecessary, elidedInCompatabilityPyramid, reportsDeprecated };\r\n");
    result.push_str("    }\r\n");
    result.push_str("    export const Diagnostics = {\r\n");

    for (name, message) in table {
        let prop_name = convert_property_name(name);
        result.push_str(&format!(
            "        {}: diag({}, DiagnosticCategory.{}, \"{}\", {}{}),\r\n",
            prop_name,
            message.code,
            message.category,
            create_key(&prop_name, message.code),
            quote(name),
            optional_arguments(message)
        ));
    }

    result.push_str("    };\r\n}");
    result
}

pub fn build_diagnostic_message_output(table: &DiagnosticTable) -> Result<String, DtsError> {
    let entries: Vec<String> = table
        .iter()
        .map(|(name, message)| {
            let prop_name = convert_property_name(name);
            format!("\r\n  \"{}\" : {}", create_key(&prop_name, message.code), quote(name))
        })
        .collect();
    let result = format!("{{{}\r\n}}", entries.join(","));

    // The output is consumed as JSON, so make sure that is what we produced.
    serde_json::from_str::<serde_json::Value>(&result)
        .map_err(|e| DtsError::InvalidGeneratedJson(e.to_string()))?;
    Ok(result)
}

/// Validates the table and produces both artifacts. `input_file_path_rel`
/// and `this_file_path_rel` only appear in the generated header comment.
pub fn generate(
    table: &DiagnosticTable,
    input_file_path_rel: &str,
    this_file_path_rel: &str,
) -> Result<GeneratedDiagnostics, DtsError> {
    check_for_unique_codes(table)?;
    Ok(GeneratedDiagnostics {
        info_map:      build_info_file_output(table, input_file_path_rel, this_file_path_rel),
        messages_json: build_diagnostic_message_output(table)?,
    })
}
