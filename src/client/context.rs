// ABOUTME: Typed description of the NFS-e document the user is reviewing
// ABOUTME: Serializes to the camelCase context object the proxy embeds in the system prompt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppResult};

/// Fields extracted from an NFS-e, all optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)] // Field names mirror the NFS-e layout
pub struct AuditData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_nota: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_emissao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnpj_prestador: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razao_social_prestador: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnpj_tomador: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razao_social_tomador: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_servicos: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_deducoes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_pis: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_cofins: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_inss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_ir: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_csll: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_iss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliquota_iss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_calculo: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo_servico: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipio_prestacao: Option<String>,
}

/// Document the session is attached to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopilotContext {
    /// Identifier of the uploaded file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    /// Field the user is currently inspecting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    /// Extracted invoice data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_data: Option<AuditData>,
}

impl CopilotContext {
    /// Load a context from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the file cannot be read and a serialization
    /// error if it is not a context object.
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::invalid_input(format!("Cannot read context file {}: {e}", path.display()))
                .with_source(e)
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Render as the opaque JSON object sent to the proxy
    ///
    /// # Errors
    ///
    /// Returns a serialization error if a numeric field is not finite.
    pub fn to_value(&self) -> AppResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_absent_fields_are_omitted() {
        let context = CopilotContext {
            file_id: Some("1".into()),
            ..CopilotContext::default()
        };
        assert_eq!(context.to_value().unwrap(), json!({ "fileId": "1" }));
    }

    #[test]
    fn test_audit_data_uses_camel_case() {
        let context = CopilotContext {
            field_name: Some("valorIss".into()),
            audit_data: Some(AuditData {
                cnpj_prestador: Some("12.345.678/0001-90".into()),
                valor_iss: Some(50.0),
                ..AuditData::default()
            }),
            ..CopilotContext::default()
        };
        assert_eq!(
            context.to_value().unwrap(),
            json!({
                "fieldName": "valorIss",
                "auditData": { "cnpjPrestador": "12.345.678/0001-90", "valorIss": 50.0 }
            })
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fileId":"abc","auditData":{{"numeroNota":"42"}}}}"#).unwrap();

        let context = CopilotContext::from_json_file(file.path()).unwrap();
        assert_eq!(context.file_id.as_deref(), Some("abc"));
        assert_eq!(
            context.audit_data.and_then(|data| data.numero_nota).as_deref(),
            Some("42")
        );
    }

    #[test]
    fn test_missing_file_is_invalid_input() {
        let error = CopilotContext::from_json_file("/nonexistent/context.json").unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidInput);
    }
}
